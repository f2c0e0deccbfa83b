//! Outbound application events.
//!
//! The control core emits these through the [`EventSink`](super::ports::EventSink)
//! port.  Adapters on the other side decide what to do with them — log to
//! serial, publish over MQTT, push to a web-socket status page, etc.

use crate::control::{CommandKind, Device};
use crate::radio::Instruction;

/// Structured events emitted by the control core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic status snapshot of all four drives.
    Status(StatusSnapshot),

    /// A decoded request was accepted and queued on a drive.
    CommandQueued {
        device: Device,
        id: u32,
        kind: CommandKind,
    },

    /// A packet burst went out over the radio.
    Transmitted {
        device: Device,
        id: u32,
        instruction: Instruction,
    },

    /// A command's travel window elapsed and it left the queue.
    CommandCompleted {
        device: Device,
        id: u32,
        kind: CommandKind,
    },

    /// The position estimate of a drive changed.
    PositionUpdated { device: Device, position: u8 },

    /// A drive finished its calibration run to the top end stop.
    Calibrated { device: Device },

    /// A user stop flushed a drive's pending queue.
    QueueCleared { device: Device, dropped: usize },

    /// An inbound request failed to decode and was dropped.
    RequestDropped { reason: &'static str },
}

/// Per-drive slice of a [`StatusSnapshot`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DriveStatus {
    pub device: Option<Device>,
    /// Position estimate is only meaningful while `calibrated` is set.
    pub calibrated: bool,
    pub position: u8,
    pub queue_len: usize,
}

/// A point-in-time snapshot of all drives suitable for logging or
/// transmission.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusSnapshot {
    pub drives: [DriveStatus; 4],
}
