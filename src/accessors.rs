//! Typed reads of the values published by the last good block.
//!
//! Every reader goes through [`VeDirect::field_status`] first, so nothing is
//! returned while the session holds no valid data.

use crate::{
    field::{FieldDescriptor, FieldKind},
    parser::VeDirect,
};

/// Why a field can or cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    /// The last block failed its checksum, or none has been received yet.
    DataNotValid,
    /// The name is not in the session's field table.
    NameNotFound,
    /// The field had no value in the published data.
    ValueEmpty,
    /// The field has a value at this table index.
    Ok(usize),
}

impl<'a> VeDirect<'a> {
    pub fn field_status(&self, name: &str) -> FieldStatus {
        if !self.valid {
            return FieldStatus::DataNotValid;
        }
        let Some(index) = self.table.find(name) else {
            return FieldStatus::NameNotFound;
        };
        match self.store.committed(index) {
            Some(value) if !value.is_empty() => FieldStatus::Ok(index),
            _ => FieldStatus::ValueEmpty,
        }
    }

    /// Table index of `name` if it can be read.
    pub fn has_field(&self, name: &str) -> Option<usize> {
        match self.field_status(name) {
            FieldStatus::Ok(index) => Some(index),
            _ => None,
        }
    }

    fn readable(&self, name: &str) -> Option<(&'a FieldDescriptor, &str)> {
        let index = self.has_field(name)?;
        Some((self.table.get(index)?, self.store.committed(index)?))
    }

    /// Raw text of any field. Empty if there is nothing to read.
    pub fn as_text(&self, name: &str) -> &str {
        self.readable(name).map_or("", |(_, raw)| raw)
    }

    /// Value of an integer field, decimal or `0x` prefixed hex.
    ///
    /// Returns 0 for fields of another kind or with nothing to read.
    pub fn as_integer(&self, name: &str) -> i32 {
        match self.readable(name) {
            Some((descriptor, raw)) if descriptor.kind == FieldKind::Integer => {
                parse_integer(raw)
            }
            _ => 0,
        }
    }

    /// Like [`VeDirect::as_integer`], widened for large hex identifiers such as
    /// `0x3DF56AC8`.
    pub fn as_unsigned(&self, name: &str) -> u32 {
        match self.readable(name) {
            Some((descriptor, raw)) if descriptor.kind == FieldKind::Integer => {
                parse_unsigned(raw)
            }
            _ => 0,
        }
    }

    /// Value of a decimal field with its scaling applied.
    ///
    /// Returns NaN for fields of another kind or with nothing to read.
    pub fn as_decimal(&self, name: &str) -> f32 {
        match self.readable(name) {
            Some((descriptor, raw)) => match descriptor.digits() {
                Some(digits) => scale_decimal(raw, digits),
                None => f32::NAN,
            },
            None => f32::NAN,
        }
    }
}

/// Decode integer text, `0x` prefixed hex or decimal.
pub(crate) fn parse_integer(raw: &str) -> i32 {
    match raw.strip_prefix("0x") {
        Some(hex) => clamp_i32(leading_number(hex, 16)),
        None => clamp_i32(leading_number(raw, 10)),
    }
}

pub(crate) fn parse_unsigned(raw: &str) -> u32 {
    match raw.strip_prefix("0x") {
        Some(hex) => leading_number(hex, 16).clamp(0, u32::MAX as i64) as u32,
        None => match leading_number(raw, 10) {
            // Negatives wrap like the signed value cast to u32.
            value if value < 0 => clamp_i32(value) as u32,
            value => value.min(u32::MAX as i64) as u32,
        },
    }
}

/// Divide the raw integer by ten once per fractional digit.
///
/// Repeated division rounds differently from a single division by 10^n, and
/// callers compare against values produced this way.
pub(crate) fn scale_decimal(raw: &str, digits: u8) -> f32 {
    let mut value = parse_decimal_digits(raw) as f32;
    for _ in 0..digits {
        value /= 10.0;
    }
    value
}

fn parse_decimal_digits(raw: &str) -> i32 {
    clamp_i32(leading_number(raw, 10))
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Parse the number at the start of `text` the way C's `strtol` does.
///
/// Leading whitespace and a sign are accepted, parsing stops at the first
/// character that is not a digit in `radix`, and no digits at all gives 0.
/// The result saturates instead of overflowing.
fn leading_number(text: &str, radix: u32) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let magnitude = digits
        .chars()
        .map_while(|c| c.to_digit(radix))
        .fold(0i64, |acc, digit| {
            acc.saturating_mul(radix as i64)
                .saturating_add(digit as i64)
        });

    if negative { -magnitude } else { magnitude }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tests::{SMART_SOLAR_BLOCK, block};

    const TABLE: [FieldDescriptor; 7] = [
        FieldDescriptor::integer("PID"),
        FieldDescriptor::decimal("V", 3),
        FieldDescriptor::decimal("I", 3),
        FieldDescriptor::integer("OR"),
        FieldDescriptor::text("LOAD"),
        FieldDescriptor::integer("ERR"),
        FieldDescriptor::terminator(),
    ];

    fn session_with(records: &[(&str, &str)]) -> VeDirect<'static> {
        let mut session = VeDirect::new(&TABLE, false);
        assert!(session.parse_bytes(&block(records)).is_some());
        assert!(session.is_valid());
        session
    }

    #[test]
    fn test_field_status() {
        let mut session = VeDirect::new(&TABLE, false);
        assert_eq!(session.field_status("V"), FieldStatus::DataNotValid);

        session.parse_bytes(&block(&[("V", "13260")]));
        assert_eq!(session.field_status("V"), FieldStatus::Ok(1));
        assert_eq!(session.field_status("I"), FieldStatus::ValueEmpty);
        assert_eq!(session.field_status("VPV"), FieldStatus::NameNotFound);
        assert_eq!(session.field_status("Checksum"), FieldStatus::NameNotFound);
        assert_eq!(session.has_field("V"), Some(1));
        assert_eq!(session.has_field("I"), None);
    }

    #[test]
    fn test_hex_integer() {
        let session = session_with(&[("PID", "0xA053")]);
        assert_eq!(session.as_integer("PID"), 41043);
        assert_eq!(session.as_unsigned("PID"), 0xA053);
        assert_eq!(session.as_text("PID"), "0xA053");
    }

    #[test]
    fn test_large_hex_unsigned() {
        let session = session_with(&[("OR", "0x3DF56AC8"), ("ERR", "0xFFFFFFFF")]);
        assert_eq!(session.as_unsigned("OR"), 0x3DF5_6AC8);
        assert_eq!(session.as_unsigned("ERR"), u32::MAX);
        assert_eq!(session.as_integer("ERR"), i32::MAX);
    }

    #[test]
    fn test_decimal_integer() {
        let session = session_with(&[("ERR", "-12"), ("OR", "0x00000000")]);
        assert_eq!(session.as_integer("ERR"), -12);
        assert_eq!(session.as_unsigned("ERR"), -12i32 as u32);
        assert_eq!(session.as_integer("OR"), 0);
    }

    #[test]
    fn test_large_decimal_unsigned() {
        let session = session_with(&[("OR", "3000000000"), ("ERR", "99999999999")]);
        assert_eq!(session.as_unsigned("OR"), 3_000_000_000);
        assert_eq!(session.as_integer("OR"), i32::MAX);
        assert_eq!(session.as_unsigned("ERR"), u32::MAX);
    }

    #[test]
    fn test_integer_accessors_reject_other_kinds() {
        let session = session_with(&[("V", "13260"), ("LOAD", "ON")]);
        assert_eq!(session.as_integer("V"), 0);
        assert_eq!(session.as_unsigned("LOAD"), 0);
        assert_eq!(session.as_integer("missing"), 0);
    }

    #[test]
    fn test_decimal() {
        let session = session_with(&[("V", "13260"), ("I", "-1830")]);
        assert_eq!(session.as_decimal("V"), 13260.0f32 / 10.0 / 10.0 / 10.0);
        assert!((session.as_decimal("V") - 13.260).abs() < 1e-4);
        assert!((session.as_decimal("I") + 1.830).abs() < 1e-4);
    }

    #[test]
    fn test_decimal_on_integer_field_is_nan() {
        let session = session_with(&[("PID", "0xA053"), ("LOAD", "ON")]);
        assert!(session.as_decimal("PID").is_nan());
        assert!(session.as_decimal("LOAD").is_nan());
        assert!(session.as_decimal("V").is_nan());
        assert!(session.as_decimal("nope").is_nan());
    }

    #[test]
    fn test_reads_empty_when_invalid() {
        let mut session = session_with(&[("V", "13260")]);
        let mut bad = block(&[("V", "13260")]);
        *bad.last_mut().unwrap() = bad.last().unwrap().wrapping_add(1);
        session.parse_bytes(&bad);

        assert_eq!(session.field_status("V"), FieldStatus::DataNotValid);
        assert_eq!(session.as_text("V"), "");
        assert!(session.as_decimal("V").is_nan());
    }

    #[test]
    fn test_smart_solar_reads() {
        let mut session = VeDirect::new(&crate::devices::SMART_SOLAR_MPPT, true);
        session.parse_bytes(SMART_SOLAR_BLOCK);
        assert!((session.as_decimal("FW") - 1.63).abs() < 1e-4);
        assert!((session.as_decimal("VPV") - 33.65).abs() < 1e-4);
        assert!((session.as_decimal("H19") - 25.52).abs() < 1e-4);
        assert_eq!(session.as_integer("HSDS"), 50);
        assert_eq!(session.as_unsigned("OR"), 0);
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("163", 10), 163);
        assert_eq!(leading_number("0124", 10), 124);
        assert_eq!(leading_number("  42abc", 10), 42);
        assert_eq!(leading_number("-7", 10), -7);
        assert_eq!(leading_number("ON", 10), 0);
        assert_eq!(leading_number("", 10), 0);
        assert_eq!(leading_number("a053", 16), 0xA053);
        assert_eq!(leading_number("99999999999999999999999", 10), i64::MAX);
    }

    #[test]
    fn test_hex_text_as_decimal_is_zero() {
        assert_eq!(scale_decimal("0xA053", 2), 0.0);
        assert_eq!(parse_integer("0x"), 0);
    }
}
