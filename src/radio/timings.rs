//! OOK pulse-duration tables.
//!
//! Modeled as a runtime value handed to the transmitter at construction
//! rather than compile-time constants, so tests can run the encoder against
//! alternate timings.
//!
//! Send-side and receive-side tables are distinct on purpose: the shutter
//! receivers tolerate a longer low phase on a "one" bit than the factory
//! remotes emit, and the sniffer measurements reflect that.

use serde::{Deserialize, Serialize};

/// Pulse timing parameters of the shutter OOK protocol.
///
/// All durations are in microseconds.  The defaults were measured off the
/// factory remote with a logic analyser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfTimings {
    /// High phase of a "zero" bit when sending.
    pub zero_high_send_us: u32,
    /// Low phase of a "zero" bit when sending.
    pub zero_low_send_us: u32,
    /// High phase of a "one" bit when sending.
    pub one_high_send_us: u32,
    /// Low phase of a "one" bit when sending.
    pub one_low_send_us: u32,

    /// High phase of a "zero" bit as seen by the receivers.
    pub zero_high_recv_us: u32,
    /// Low phase of a "zero" bit as seen by the receivers.
    pub zero_low_recv_us: u32,
    /// High phase of a "one" bit as seen by the receivers.
    pub one_high_recv_us: u32,
    /// Low phase of a "one" bit as seen by the receivers.
    pub one_low_recv_us: u32,

    /// High phase of the synchronization pulse opening every packet.
    pub sync_on_us: u32,
    /// Low phase of the synchronization pulse.
    pub sync_off_us: u32,

    /// Low gap between packet repetitions when sending.
    pub packet_gap_send_us: u32,
    /// Low gap between packet repetitions as seen by the receivers.
    pub packet_gap_recv_us: u32,

    /// Accepted deviation when classifying a received pulse duration.
    pub pulse_tolerance_us: u32,

    /// Number of times the full packet is repeated per transmission.
    pub repeats: u8,
}

impl Default for RfTimings {
    fn default() -> Self {
        Self {
            zero_high_send_us: 350,
            zero_low_send_us: 700,
            one_high_send_us: 630,
            one_low_send_us: 300,

            zero_high_recv_us: 350,
            zero_low_recv_us: 700,
            one_high_recv_us: 630,
            one_low_recv_us: 400,

            sync_on_us: 4700,
            sync_off_us: 1500,

            packet_gap_send_us: 7400,
            packet_gap_recv_us: 7800,

            pulse_tolerance_us: 200,

            repeats: 5,
        }
    }
}
