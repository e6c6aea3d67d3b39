//! Field descriptors and the table the parser resolves names against.

use core::num::NonZeroU8;

use crate::{
    error::ConfigError,
    parser::{BINARY_START, MAX_NAME_LEN, is_printable},
};

/// Most descriptors scanned while looking for the terminator.
///
/// VE.Direct allows 22 records per block, but a device may spread its fields over
/// several blocks, so the table can hold more than that.
pub const MAX_DESCRIPTORS: usize = 50;

/// Most data fields a table can hold, the terminator excluded.
pub const MAX_FIELDS: usize = MAX_DESCRIPTORS - 1;

/// Name of the record that closes every block.
pub const TERMINATOR_NAME: &str = "Checksum";

/// How the raw text of a field is meant to be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, e.g. a serial number or `ON`/`OFF`.
    Text,
    /// Decimal or `0x` prefixed hexadecimal integer.
    Integer,
    /// Integer implicitly scaled by 10^-n. E.g. `13260` with 3 digits => `13.260`.
    Decimal(NonZeroU8),
    /// End of block marker, must be named `Checksum`.
    Terminator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Case sensitive name as sent by the device.
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }

    pub const fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    /// Field holding an integer scaled by 10^-`digits`.
    ///
    /// # Panics
    ///
    /// If `digits` is zero. Use [`FieldDescriptor::integer`] for unscaled values.
    pub const fn decimal(name: &'static str, digits: u8) -> Self {
        match NonZeroU8::new(digits) {
            Some(digits) => Self::new(name, FieldKind::Decimal(digits)),
            None => panic!("decimal fields need at least one fractional digit"),
        }
    }

    /// The `Checksum` descriptor closing a table.
    pub const fn terminator() -> Self {
        Self::new(TERMINATOR_NAME, FieldKind::Terminator)
    }

    /// Number of fractional digits for decimal fields.
    pub const fn digits(&self) -> Option<u8> {
        match self.kind {
            FieldKind::Decimal(digits) => Some(digits.get()),
            _ => None,
        }
    }
}

/// Validated, read-only view over a caller supplied descriptor list.
#[derive(Debug, Clone, Copy)]
pub struct FieldTable<'a> {
    fields: &'a [FieldDescriptor],
    terminator: &'a FieldDescriptor,
}

impl<'a> FieldTable<'a> {
    /// Check `descriptors` and find the terminator.
    ///
    /// Entries after the terminator are ignored, but a second terminator is
    /// rejected.
    pub fn new(descriptors: &'a [FieldDescriptor]) -> Result<Self, ConfigError> {
        let end = descriptors
            .iter()
            .take(MAX_DESCRIPTORS)
            .position(|d| d.kind == FieldKind::Terminator)
            .ok_or(ConfigError::MissingTerminator {
                max: MAX_DESCRIPTORS,
            })?;

        let terminator = &descriptors[end];
        if terminator.name != TERMINATOR_NAME {
            return Err(ConfigError::TerminatorName);
        }

        if let Some(offset) = descriptors[end + 1..]
            .iter()
            .position(|d| d.kind == FieldKind::Terminator)
        {
            return Err(ConfigError::DuplicateTerminator {
                index: end + 1 + offset,
            });
        }

        let fields = &descriptors[..end];
        for (index, descriptor) in fields.iter().enumerate() {
            check_name(index, descriptor.name)?;
        }

        Ok(Self { fields, terminator })
    }

    /// Table with no fields at all. Used by disabled sessions.
    pub(crate) fn empty() -> Self {
        const TERMINATOR: FieldDescriptor = FieldDescriptor::terminator();
        Self {
            fields: &[],
            terminator: &TERMINATOR,
        }
    }

    /// Number of data fields, the terminator excluded.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a FieldDescriptor> {
        self.fields.get(index)
    }

    /// Index of the first field called `name`.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|d| d.name == name)
    }

    pub fn is_terminator(&self, name: &str) -> bool {
        self.terminator.name == name
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a FieldDescriptor> + 'a {
        self.fields.iter()
    }
}

/// A name the parser could actually collect from the line.
fn check_name(index: usize, name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::EmptyName { index });
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ConfigError::NameTooLong {
            index,
            max: MAX_NAME_LEN,
        });
    }
    if name
        .bytes()
        .any(|byte| !is_printable(byte) || byte == BINARY_START)
    {
        return Err(ConfigError::NameCharacters { index });
    }
    Ok(())
}
