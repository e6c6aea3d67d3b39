//! This crate decodes the VE.Direct text protocol sent by Victron solar charge controllers,
//! inverters and battery monitors.
//!
//! It supports `no-std` environments by use of the `no_std` feature flag.
//!
//! A device sends a block of `name\tvalue` records about once a second. You tell
//! the parser which names you care about and how to decode them with a table of
//! [`FieldDescriptor`](field::FieldDescriptor)s, feed it bytes as they arrive,
//! and read the values of the last block that passed its checksum:
//!
//! ```ignore
//! use vedirect::{devices::SMART_SOLAR_MPPT, parser::VeDirect};
//!
//! let mut charger = VeDirect::new(&SMART_SOLAR_MPPT, true);
//! if charger.parse_from(&mut serial)? && charger.is_valid() {
//!     let volts = charger.as_decimal("V");
//! }
//! ```
//!
//! Lines of the binary HEX protocol interleaved with the text blocks are skipped.
//!
//! The serial port used for VE.Direct should be configured like so:
//! * Baud rate: 19200
//! * Data bits: 8
//! * Stop bits: 1
//! * Parity: None

#![cfg_attr(feature = "no_std", no_std)]

pub mod accessors;
pub mod checksum;
pub mod devices;
pub mod error;
pub mod field;
pub mod parser;
pub mod reason;
pub mod render;
mod store;

pub use store::{MAX_VALUE_LEN, Value};

#[cfg(test)]
mod mock_serial;
