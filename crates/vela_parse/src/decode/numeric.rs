//! Numeric literal decoding: turn a lexeme into the narrowest
//! exact-width representation that fits, falling back to preserving the raw
//! lexeme for arbitrary-precision values (no bigint crate is in this
//! codebase's dependency graph, so "arbitrary" means "downstream AST decides
//! what to do with the lexeme", matching the CST's own policy of keeping
//! bigint/bigfloat literals as plain literal nodes).

/// A decoded integer literal, narrowed to the smallest representation that
/// holds the value exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntValue {
    Machine(isize),
    I64(i64),
    I128(i128),
    /// Preserves the decimal digits verbatim; too large for `i128`.
    Big(String),
}

/// A decoded unsigned integer literal (hex/octal/binary), narrowed by digit
/// count rather than by successive parse attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UIntValue {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Big(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FloatValue {
    F32(f32),
    F64(f64),
}

/// Strips `_` digit-separators. The lexer absorbs `_` into the numeric
/// lexeme but never interprets it; this is the one place that happens.
fn strip_separators(lexeme: &str) -> String {
    lexeme.chars().filter(|c| *c != '_').collect()
}

/// Decodes a decimal integer lexeme (`Kind::INTEGER`), trying
/// `isize` (machine word size) before widening to `i64`, `i128`, and finally
/// falling back to the verbatim digit string.
pub fn decode_integer(lexeme: &str) -> IntValue {
    let digits = strip_separators(lexeme);
    if let Ok(v) = digits.parse::<isize>() {
        return IntValue::Machine(v);
    }
    if let Ok(v) = digits.parse::<i64>() {
        return IntValue::I64(v);
    }
    if let Ok(v) = digits.parse::<i128>() {
        return IntValue::I128(v);
    }
    IntValue::Big(digits)
}

/// Decodes a `Kind::HEX_INT` lexeme (leading `0x`/`0X`), choosing width by
/// digit count: `<=2` digits is `u8`, `<=4` is `u16`, `<=8` is `u32`, `<=16`
/// is `u64`, `<=32` is `u128`, otherwise arbitrary.
pub fn decode_hex(lexeme: &str) -> UIntValue {
    let digits = strip_separators(strip_radix_prefix(lexeme, 2));
    decode_radix_by_width(&digits, 16, &[2, 4, 8, 16, 32])
}

/// Decodes a `Kind::BIN_INT` lexeme (leading `0b`/`0B`), choosing width by
/// digit count: `<=8` digits is `u8`, `<=16` is `u16`, `<=32` is `u32`,
/// `<=64` is `u64`, `<=128` is `u128`, otherwise arbitrary.
pub fn decode_bin(lexeme: &str) -> UIntValue {
    let digits = strip_separators(strip_radix_prefix(lexeme, 2));
    decode_radix_by_width(&digits, 2, &[8, 16, 32, 64, 128])
}

/// Decodes a `Kind::OCT_INT` lexeme (leading `0o`/`0O`): parsed as `u64`
/// then demoted to the narrowest unsigned type the value actually fits.
pub fn decode_oct(lexeme: &str) -> UIntValue {
    let digits = strip_separators(strip_radix_prefix(lexeme, 2));
    match u64::from_str_radix(&digits, 8) {
        Ok(v) if v <= u8::MAX as u64 => UIntValue::U8(v as u8),
        Ok(v) if v <= u16::MAX as u64 => UIntValue::U16(v as u16),
        Ok(v) if v <= u32::MAX as u64 => UIntValue::U32(v as u32),
        Ok(v) => UIntValue::U64(v),
        Err(_) => match u128::from_str_radix(&digits, 8) {
            Ok(v) => UIntValue::U128(v),
            Err(_) => UIntValue::Big(digits),
        },
    }
}

fn strip_radix_prefix(lexeme: &str, prefix_len: usize) -> &str {
    &lexeme[prefix_len.min(lexeme.len())..]
}

fn decode_radix_by_width(digits: &str, radix: u32, width_breaks: &[usize; 5]) -> UIntValue {
    let len = digits.len();
    if len <= width_breaks[0] {
        if let Ok(v) = u8::from_str_radix(digits, radix) {
            return UIntValue::U8(v);
        }
    }
    if len <= width_breaks[1] {
        if let Ok(v) = u16::from_str_radix(digits, radix) {
            return UIntValue::U16(v);
        }
    }
    if len <= width_breaks[2] {
        if let Ok(v) = u32::from_str_radix(digits, radix) {
            return UIntValue::U32(v);
        }
    }
    if len <= width_breaks[3] {
        if let Ok(v) = u64::from_str_radix(digits, radix) {
            return UIntValue::U64(v);
        }
    }
    if len <= width_breaks[4] {
        if let Ok(v) = u128::from_str_radix(digits, radix) {
            return UIntValue::U128(v);
        }
    }
    UIntValue::Big(digits.to_string())
}

/// Decodes a `Kind::FLOAT` lexeme. A trailing `f`/`F` suffix (e.g. `1.5f0`)
/// selects `f32` and is replaced with `e` before parsing, since Rust's float
/// parser understands `e`-exponents but not the language's `f`-suffix
/// spelling of the same thing.
pub fn decode_float(lexeme: &str) -> Option<FloatValue> {
    let digits = strip_separators(lexeme);
    if let Some(f_pos) = digits.find(['f', 'F']) {
        let mut rewritten = digits.clone();
        rewritten.replace_range(f_pos..f_pos + 1, "e");
        return rewritten.parse::<f32>().ok().map(FloatValue::F32);
    }
    digits.parse::<f64>().ok().map(FloatValue::F64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("42", IntValue::Machine(42))]
    #[test_case("1_000_000", IntValue::Machine(1_000_000))]
    fn decodes_plain_integers(lexeme: &str, expected: IntValue) {
        assert_eq!(decode_integer(lexeme), expected);
    }

    #[test]
    fn widens_beyond_i128() {
        let huge = "9".repeat(40);
        assert_eq!(decode_integer(&huge), IntValue::Big(huge));
    }

    #[test_case("0xff", UIntValue::U8(0xff))]
    #[test_case("0x0e", UIntValue::U8(0x0e))]
    #[test_case("0xffff", UIntValue::U16(0xffff))]
    fn decodes_hex_by_width(lexeme: &str, expected: UIntValue) {
        assert_eq!(decode_hex(lexeme), expected);
    }

    #[test_case("0b1010", UIntValue::U8(0b1010))]
    #[test_case("0b1111_1111_1", UIntValue::U16(0b111111111))]
    fn decodes_bin_by_width(lexeme: &str, expected: UIntValue) {
        assert_eq!(decode_bin(lexeme), expected);
    }

    #[test]
    fn decodes_oct_demoted_to_narrowest() {
        assert_eq!(decode_oct("0o377"), UIntValue::U8(0o377));
        assert_eq!(decode_oct("0o400"), UIntValue::U16(0o400));
    }

    #[test]
    fn decodes_float_suffix_as_f32() {
        assert_eq!(decode_float("1.5f0"), Some(FloatValue::F32(1.5f32)));
        assert_eq!(decode_float("1.5"), Some(FloatValue::F64(1.5f64)));
    }
}
