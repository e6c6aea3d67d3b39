//! Our error types for VE.Direct text parsing.

use thiserror::Error;

pub type Result<T, I> = core::result::Result<T, Error<I>>;

/// Error raised by operations that talk to an injected byte source or sink.
#[derive(Error, Debug)]
pub enum Error<I: embedded_io::Error> {
    #[error("Serial communication error")]
    SerialError(I),
    #[error("Byte source reported end of stream")]
    EndOfStream,
}

impl<I: embedded_io::Error> From<I> for Error<I> {
    fn from(err: I) -> Self {
        Error::SerialError(err)
    }
}

/// A recoverable problem found while parsing a block.
///
/// These are never handed back from [`VeDirect::parse`](crate::parser::VeDirect::parse).
/// The session counts them, logs them and resynchronises on the next `\r`.
/// The most recent one is available from
/// [`VeDirect::last_error`](crate::parser::VeDirect::last_error).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// A carriage return was not followed by a line feed.
    #[error("CR followed by 0x{found:02X} instead of LF")]
    Framing { found: u8 },
    /// A field name held a control character or exceeded the name buffer.
    #[error("name with invalid characters")]
    Name,
    /// A field value held a control character or exceeded the value buffer.
    #[error("value with invalid characters")]
    Value,
    /// The block's bytes did not sum to zero.
    #[error("checksum error, block sums to 0x{sum:02X}")]
    Checksum { sum: u8 },
}

/// A field table that cannot be used for parsing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no terminator descriptor within the first {max} entries")]
    MissingTerminator { max: usize },
    #[error("terminator descriptor must be named \"Checksum\"")]
    TerminatorName,
    #[error("descriptor {index} has an empty name")]
    EmptyName { index: usize },
    #[error("descriptor {index} has a name longer than {max} bytes")]
    NameTooLong { index: usize, max: usize },
    #[error("descriptor {index} has a name with a control, tab or ':' character")]
    NameCharacters { index: usize },
    #[error("descriptor {index} is a second terminator")]
    DuplicateTerminator { index: usize },
}
