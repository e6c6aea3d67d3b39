//! Field tables for Victron devices this crate has been checked against.
//!
//! Tables are plain `const` arrays, so you can copy one and trim or extend it for
//! your own device. Names not listed in a table are skipped by the parser.

use crate::field::FieldDescriptor as F;

/// SmartSolar MPPT 75/15 charge controller.
pub const SMART_SOLAR_MPPT: [F; 20] = [
    // Product ID, 16 bit hex. E.g. `0xA053`.
    F::integer("PID"),
    // Firmware version, `163` => `1.63`.
    F::decimal("FW", 2),
    // Serial number.
    F::text("SER#"),
    // Battery voltage in mV.
    F::decimal("V", 3),
    // Battery current in mA.
    F::decimal("I", 3),
    // Panel voltage in mV.
    F::decimal("VPV", 3),
    // Panel power in W.
    F::integer("PPV"),
    // State of operation.
    F::integer("CS"),
    // Tracker operation mode.
    F::integer("MPPT"),
    // Off reason, 32 bit hex. See `reason::OffReason`.
    F::integer("OR"),
    // Error code.
    F::integer("ERR"),
    // Load output state, `ON` or `OFF`.
    F::text("LOAD"),
    // Load current in mA.
    F::decimal("IL", 3),
    // Yield total in 0.01 kWh.
    F::decimal("H19", 2),
    // Yield today in 0.01 kWh.
    F::decimal("H20", 2),
    // Maximum power today in W.
    F::integer("H21"),
    // Yield yesterday in 0.01 kWh.
    F::decimal("H22", 2),
    // Maximum power yesterday in W.
    F::integer("H23"),
    // Day sequence number (0 - 364).
    F::integer("HSDS"),
    F::terminator(),
];

/// Phoenix 12/1200 inverter.
///
/// `PID`, `AR`, `WARN` and `OR` are kept as text here, which is how the inverter
/// was first logged. Switch them to [`F::integer`] to use the bitfield readers.
pub const PHOENIX_INVERTER: [F; 13] = [
    F::text("PID"),
    // Firmware version, `0124` => `1.24`.
    F::decimal("FW", 2),
    F::text("SER#"),
    // Device mode.
    F::integer("MODE"),
    // State of operation.
    F::integer("CS"),
    // AC output voltage in 0.01 V.
    F::decimal("AC_OUT_V", 2),
    // AC output current in 0.1 A.
    F::decimal("AC_OUT_I", 1),
    // AC output apparent power in VA.
    F::integer("AC_OUT_S"),
    // Battery voltage in mV.
    F::decimal("V", 3),
    // Alarm reason.
    F::text("AR"),
    // Warning reason.
    F::text("WARN"),
    // Off reason.
    F::text("OR"),
    F::terminator(),
];
