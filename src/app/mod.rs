//! Application boundary — ports, inbound requests, outbound events.
//!
//! The scheduling core in [`crate::control`] interacts with hardware and
//! transports exclusively through the port traits defined in [`ports`],
//! keeping the whole engine testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
