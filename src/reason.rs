//! Alarm, warning and off reason bitfields.
//!
//! Each flag is one bit of the raw field value. Bit 0 is the least significant
//! bit (value `1`), bit 1 is value `2`, and so on. The discriminant of every flag
//! variant is its mask.

use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::parser::VeDirect;

/// Flags of the `AR` (alarm reason) and `WARN` (warning reason) fields.
#[derive(Debug, EnumIter, PartialEq, Eq, Clone, Copy)]
#[repr(u16)]
pub enum AlarmFlag {
    LowVoltage = 1 << 0,
    HighVoltage = 1 << 1,
    LowSoc = 1 << 2,
    LowStarterVoltage = 1 << 3,
    HighStarterVoltage = 1 << 4,
    LowTemperature = 1 << 5,
    HighTemperature = 1 << 6,
    MidVoltage = 1 << 7,
    Overload = 1 << 8,
    DcRipple = 1 << 9,
    LowVacOut = 1 << 10,
    HighVacOut = 1 << 11,
    ShortCircuit = 1 << 12,
    BmsLockout = 1 << 13,
}

impl AlarmFlag {
    pub const fn mask(self) -> u16 {
        self as u16
    }
}

/// Flags of the `OR` (off reason) field.
#[derive(Debug, EnumIter, PartialEq, Eq, Clone, Copy)]
#[repr(u32)]
pub enum OffFlag {
    NoInputPower = 1 << 0,
    /// Switched off by the power switch.
    PowerSwitchOff = 1 << 1,
    /// Switched off by the device mode register.
    DeviceSwitchedOff = 1 << 2,
    RemoteInput = 1 << 3,
    ProtectionActive = 1 << 4,
    /// Pay-as-you-go credit exhausted.
    Paygo = 1 << 5,
    Bms = 1 << 6,
    EngineShutdownDetection = 1 << 7,
    AnalyzingInputVoltage = 1 << 8,
}

impl OffFlag {
    pub const fn mask(self) -> u32 {
        self as u32
    }
}

/// Decoded `AR` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlarmReason(pub u16);

/// Decoded `WARN` field. Uses the same flags as [`AlarmReason`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarnReason(pub u16);

/// Decoded `OR` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OffReason(pub u32);

macro_rules! alarm_bits {
    ($name:ident) => {
        impl $name {
            pub const fn contains(&self, flag: AlarmFlag) -> bool {
                self.0 & flag.mask() != 0
            }

            /// No flag set.
            pub const fn is_empty(&self) -> bool {
                self.0 == 0
            }

            /// Set flags, lowest bit first.
            pub fn active(&self) -> impl Iterator<Item = AlarmFlag> + '_ {
                AlarmFlag::iter().filter(|flag| self.contains(*flag))
            }
        }

        impl From<i16> for $name {
            fn from(value: i16) -> Self {
                Self(value as u16)
            }
        }
    };
}

alarm_bits!(AlarmReason);
alarm_bits!(WarnReason);

impl OffReason {
    pub const fn contains(&self, flag: OffFlag) -> bool {
        self.0 & flag.mask() != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Set flags, lowest bit first.
    pub fn active(&self) -> impl Iterator<Item = OffFlag> + '_ {
        OffFlag::iter().filter(|flag| self.contains(*flag))
    }
}

impl VeDirect<'_> {
    /// The `AR` field as flags. Empty if it cannot be read as an integer.
    pub fn alarm_reason(&self) -> AlarmReason {
        AlarmReason::from(self.as_integer("AR") as i16)
    }

    /// The `WARN` field as flags. Empty if it cannot be read as an integer.
    pub fn warn_reason(&self) -> WarnReason {
        WarnReason::from(self.as_integer("WARN") as i16)
    }

    /// The `OR` field as flags. Empty if it cannot be read as an integer.
    pub fn off_reason(&self) -> OffReason {
        OffReason(self.as_unsigned("OR"))
    }
}
