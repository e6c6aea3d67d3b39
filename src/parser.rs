//! The VE.Direct text protocol state machine.
//!
//! A device sends blocks of `\r\n`-prefixed `name\tvalue` records closed by a
//! `Checksum\t` record carrying one checksum byte:
//!
//! ```text
//! block  := CR LF record* "Checksum" TAB checksumByte
//! record := name TAB value CR LF
//! ```
//!
//! At any point the device may also emit a line of its binary (HEX) protocol,
//! which starts with `:` and runs through the next `\n`. Those lines are skipped.

use heapless::String;
use log::{debug, error, trace, warn};

use crate::{
    checksum::Checksum,
    error::{self, ConfigError, Error, FrameError},
    field::{FieldDescriptor, FieldTable},
    store::{Value, ValueStore},
};

/// Longest field name accepted. Victron names are at most 9 characters.
pub const MAX_NAME_LEN: usize = 16;

/// Byte that introduces a binary protocol line.
pub(crate) const BINARY_START: u8 = b':';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Waiting for the `\r` opening a block.
    WaitSof,
    /// A `\r` was seen, `\n` must follow.
    WaitLf,
    ReadName,
    /// Collecting the value of a field listed in the table.
    ReadValue,
    /// Checksumming the value of a field not listed in the table.
    SkipValue,
    /// The next byte is the block's checksum.
    ReadChecksum,
    /// Discarding a binary protocol line up to `\n`.
    BinaryInterlude,
}

/// A parser session for one VE.Direct link.
///
/// Feed it bytes with [`VeDirect::parse`] or [`VeDirect::parse_from`], then read
/// the values of the last good block through the typed accessors.
///
/// `parse` returns `true` whenever a block ends, whether or not it was intact.
/// Use [`VeDirect::is_valid`] to find out if the data can be used.
#[derive(Debug, Clone)]
pub struct VeDirect<'a> {
    pub(crate) table: FieldTable<'a>,
    enabled: bool,
    pub(crate) retain: bool,
    state: State,
    name: String<MAX_NAME_LEN>,
    value: Value,
    checksum: Checksum,
    /// Table index of the field whose value is being read.
    index: usize,
    pub(crate) store: ValueStore,
    frame_errors: u32,
    frames_ok: u32,
    pub(crate) valid: bool,
    last_error: Option<FrameError>,
}

impl<'a> VeDirect<'a> {
    /// Create a session that records the fields listed in `descriptors`.
    ///
    /// With `retain` set, a field missing from a block keeps the value from an
    /// earlier block. Otherwise it is cleared.
    ///
    /// A malformed table leaves the session disabled: nothing is ever parsed and
    /// every read reports no data. Use [`VeDirect::try_new`] to get the reason.
    pub fn new(descriptors: &'a [FieldDescriptor], retain: bool) -> Self {
        match Self::try_new(descriptors, retain) {
            Ok(session) => session,
            Err(err) => {
                error!("field table not usable, parser disabled: {err}");
                Self::with_table(FieldTable::empty(), retain, false)
            }
        }
    }

    pub fn try_new(
        descriptors: &'a [FieldDescriptor],
        retain: bool,
    ) -> Result<Self, ConfigError> {
        let table = FieldTable::new(descriptors)?;
        debug!("VE.Direct watching for {} fields", table.len());
        Ok(Self::with_table(table, retain, true))
    }

    fn with_table(table: FieldTable<'a>, retain: bool, enabled: bool) -> Self {
        Self {
            store: ValueStore::new(table.len()),
            table,
            enabled,
            retain,
            state: State::WaitSof,
            name: String::new(),
            value: Value::new(),
            checksum: Checksum::default(),
            index: 0,
            frame_errors: 0,
            frames_ok: 0,
            valid: false,
            last_error: None,
        }
    }

    pub fn set_retain(&mut self, retain: bool) {
        self.retain = retain;
    }

    pub fn retain(&self) -> bool {
        self.retain
    }

    /// `false` if the session was built from a malformed table.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of blocks dropped for framing, name, value or checksum errors.
    pub fn frame_errors(&self) -> u32 {
        self.frame_errors
    }

    /// Number of blocks received with a good checksum.
    pub fn frames_ok(&self) -> u32 {
        self.frames_ok
    }

    /// Whether the last completed block passed its checksum.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn last_error(&self) -> Option<FrameError> {
        self.last_error
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The fields this session records.
    pub fn table(&self) -> &FieldTable<'a> {
        &self.table
    }

    /// Abandon any block in progress. Counters and published values are kept.
    pub fn reset(&mut self) {
        self.state = State::WaitSof;
        self.name.clear();
        self.value.clear();
        self.store.clear_pending();
    }

    /// Advance the state machine by one byte.
    ///
    /// Returns `true` when this byte ended a block, good or bad.
    pub fn parse(&mut self, byte: u8) -> bool {
        if !self.enabled {
            return false;
        }

        // The checksum byte may be any value, `:` included.
        if byte == BINARY_START
            && !matches!(self.state, State::BinaryInterlude | State::ReadChecksum)
        {
            debug!("binary message, skipping to end of line");
            self.state = State::BinaryInterlude;
            return false;
        }

        match self.state {
            State::BinaryInterlude => {
                if byte == b'\n' {
                    self.state = State::WaitSof;
                }
            }
            State::WaitSof => {
                if byte == b'\r' {
                    trace!("starting block");
                    self.store.clear_pending();
                    self.checksum = Checksum::seed(byte);
                    self.state = State::WaitLf;
                }
            }
            State::WaitLf => {
                self.checksum.add(byte);
                if byte == b'\n' {
                    self.name.clear();
                    self.state = State::ReadName;
                } else {
                    self.fail(FrameError::Framing { found: byte });
                }
            }
            State::ReadName => {
                self.checksum.add(byte);
                if byte == b'\t' {
                    self.end_of_name();
                } else if !is_printable(byte) || self.name.push(byte as char).is_err() {
                    self.fail(FrameError::Name);
                }
            }
            State::ReadValue => {
                self.checksum.add(byte);
                if byte == b'\r' {
                    trace!("{} = {}", self.name, self.value);
                    self.store.set_pending(self.index, &self.value);
                    self.state = State::WaitLf;
                } else if !is_printable(byte) || self.value.push(byte as char).is_err() {
                    self.fail(FrameError::Value);
                }
            }
            State::SkipValue => {
                self.checksum.add(byte);
                if byte == b'\r' {
                    self.state = State::WaitLf;
                } else if !is_printable(byte) {
                    self.fail(FrameError::Value);
                }
            }
            State::ReadChecksum => {
                self.checksum.add(byte);
                self.end_of_block();
                return true;
            }
        }

        false
    }

    /// Feed `bytes` until a block ends.
    ///
    /// Returns how many bytes were used, including the one ending the block, or
    /// `None` if all of `bytes` went in without reaching the end of a block.
    pub fn parse_bytes(&mut self, bytes: &[u8]) -> Option<usize> {
        bytes
            .iter()
            .position(|&byte| self.parse(byte))
            .map(|position| position + 1)
    }

    /// Consume whatever `source` has available without blocking.
    ///
    /// Bytes are read one at a time and reading stops as soon as a block ends, so
    /// at most one block is handled per call and nothing past it is taken from
    /// `source`. Returns `Ok(true)` if a block ended.
    pub fn parse_from<S>(&mut self, source: &mut S) -> error::Result<bool, S::Error>
    where
        S: embedded_io::Read + embedded_io::ReadReady,
    {
        if !self.enabled {
            return Ok(false);
        }

        while source.read_ready()? {
            let mut byte = [0u8; 1];
            if source.read(&mut byte)? == 0 {
                return Err(Error::EndOfStream);
            }
            if self.parse(byte[0]) {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn end_of_name(&mut self) {
        if self.table.is_terminator(&self.name) {
            self.state = State::ReadChecksum;
            return;
        }

        match self.table.find(&self.name) {
            Some(index) => {
                self.index = index;
                self.value.clear();
                self.state = State::ReadValue;
            }
            None => {
                debug!("{}: ignored", self.name);
                self.state = State::SkipValue;
            }
        }
    }

    fn end_of_block(&mut self) {
        trace!("checksum calculated 0x{:02X}", self.checksum.value());
        self.state = State::WaitSof;

        if self.checksum.is_valid() {
            self.frames_ok = self.frames_ok.wrapping_add(1);
            self.store.commit(self.retain);
            self.valid = true;
        } else {
            self.store.discard(self.retain);
            self.valid = false;
            self.fail(FrameError::Checksum {
                sum: self.checksum.value(),
            });
        }
    }

    /// Count `err` and wait for the next block.
    fn fail(&mut self, err: FrameError) {
        warn!("{err}");
        self.frame_errors = self.frame_errors.wrapping_add(1);
        self.last_error = Some(err);
        self.state = State::WaitSof;
    }
}

pub(crate) fn is_printable(byte: u8) -> bool {
    matches!(byte, 0x20..=0x7E)
}
