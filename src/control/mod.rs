//! Command scheduling and execution engine.
//!
//! ```text
//!  Request ──▶ ShutterController ──▶ per-drive Command queue
//!                     │                        │
//!                     └── execute(now) ───────▶│ tick: head command only
//!                                              ▼
//!                                    RadioPort (pulse encoder)
//! ```
//!
//! One scheduling thread, no parallelism: travel durations are tracked as
//! stored end-timestamps and polled across ticks, so a 26-second shutter
//! move never blocks the loop.  Only the radio burst itself does, and that
//! is bounded.

pub mod command;
pub mod controller;
pub mod shutter;

pub use command::{Command, CommandIds, CommandKind, CommandStatus};
pub use controller::ShutterController;
pub use shutter::Shutter;

/// Addressable shutter drives.
///
/// `All` is a wire-level group address with no scheduling support today;
/// `Unknown` is the decode sentinel.  Neither ever reaches a queue — the
/// dispatch stage filters them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    BedroomWindow,
    BedroomDoor,
    LivingWindow,
    LivingDoor,
    All,
    Unknown,
}

impl Device {
    /// The four schedulable drives, in fixed scheduling order.
    pub const DRIVES: [Device; 4] = [
        Device::BedroomWindow,
        Device::BedroomDoor,
        Device::LivingWindow,
        Device::LivingDoor,
    ];

    /// Queue slot for a schedulable drive; `None` for the pseudo-devices.
    pub fn index(self) -> Option<usize> {
        match self {
            Self::BedroomWindow => Some(0),
            Self::BedroomDoor => Some(1),
            Self::LivingWindow => Some(2),
            Self::LivingDoor => Some(3),
            Self::All | Self::Unknown => None,
        }
    }

    /// Decode the single-digit device selector used by relative and
    /// calibration requests.
    pub fn from_digit(digit: u8) -> Self {
        match digit {
            b'0' => Self::BedroomWindow,
            b'1' => Self::BedroomDoor,
            b'2' => Self::LivingWindow,
            b'3' => Self::LivingDoor,
            _ => Self::Unknown,
        }
    }

    /// Decode the long device-name flags used by absolute requests.
    pub fn from_name(name: &str) -> Self {
        match name {
            "bedroom_window" => Self::BedroomWindow,
            "bedroom_door" => Self::BedroomDoor,
            "living_room_window" => Self::LivingWindow,
            "living_room_door" => Self::LivingDoor,
            _ => Self::Unknown,
        }
    }
}
