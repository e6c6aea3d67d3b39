//! Rendering published values as JSON or as a plain `name = value` dump.

use core::fmt::{self, Write};

use crate::{
    accessors::{parse_integer, parse_unsigned, scale_decimal},
    field::FieldKind,
    parser::VeDirect,
};

/// How fields without a value are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonMode {
    /// Leave them out.
    #[default]
    Compact,
    /// Emit them as `"name":null`.
    AllFields,
}

impl VeDirect<'_> {
    /// Write the published values as a JSON object, one field per line, in table
    /// order.
    ///
    /// Text fields are quoted, integer fields are written as numbers (hex text is
    /// converted) and decimal fields get exactly their number of fractional
    /// digits.
    pub fn write_json<W: Write>(&self, out: &mut W, mode: JsonMode) -> fmt::Result {
        out.write_str("{\n")?;
        let mut first = true;

        for (index, descriptor) in self.table.iter().enumerate() {
            let raw = self.store.committed(index).unwrap_or("");
            if raw.is_empty() && mode == JsonMode::Compact {
                continue;
            }

            if !first {
                out.write_str(",\n")?;
            }
            first = false;

            write_string(out, descriptor.name)?;
            out.write_char(':')?;

            if raw.is_empty() {
                out.write_str("null")?;
                continue;
            }

            match descriptor.kind {
                FieldKind::Text | FieldKind::Terminator => write_string(out, raw)?,
                FieldKind::Integer if raw.starts_with("0x") => {
                    write!(out, "{}", parse_unsigned(raw))?
                }
                FieldKind::Integer => write!(out, "{}", parse_integer(raw))?,
                FieldKind::Decimal(digits) => {
                    let digits = digits.get();
                    write!(out, "{:.*}", digits as usize, scale_decimal(raw, digits))?
                }
            }
        }

        out.write_str("\n}")
    }

    #[cfg(not(feature = "no_std"))]
    pub fn to_json(&self, mode: JsonMode) -> std::string::String {
        let mut json = std::string::String::new();
        // Writing to a String cannot fail.
        let _ = self.write_json(&mut json, mode);
        json
    }

    /// Write every field as `name = value` on its own line.
    ///
    /// Nothing is written unless the session holds valid data. Returns whether
    /// anything was written.
    pub fn print_raw<W: embedded_io::Write>(&self, out: &mut W) -> Result<bool, W::Error> {
        if !self.valid {
            return Ok(false);
        }

        for (index, descriptor) in self.table.iter().enumerate() {
            out.write_all(descriptor.name.as_bytes())?;
            out.write_all(b" = ")?;
            out.write_all(self.store.committed(index).unwrap_or("").as_bytes())?;
            out.write_all(b"\r\n")?;
        }

        Ok(true)
    }
}

/// Quote `text`, escaping the characters JSON requires.
fn write_string<W: Write>(out: &mut W, text: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in text.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            c if c.is_control() => write!(out, "\\u{:04x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}
