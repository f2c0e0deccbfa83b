//! System configuration parameters
//!
//! All tunable parameters for the RollerMote bridge.  Values can be
//! overridden via NVS; the defaults are the measured characteristics of the
//! four installed drives.

use serde::{Deserialize, Serialize};

use crate::radio::RfTimings;

/// Travel characteristics and radio address of one shutter drive.
///
/// The travel times were measured with a stopwatch against the physical
/// shutters; up and down differ because gravity helps one way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShutterParams {
    /// Receiver address byte on the wire.
    pub radio_address: u8,
    /// Seconds for a full-range move to the top end stop.
    pub time_up_secs: f64,
    /// Seconds for a full-range move to the bottom end stop.
    pub time_down_secs: f64,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Scheduling ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Status report interval (seconds)
    pub telemetry_interval_secs: u32,

    // --- Shutter drives ---
    pub bedroom_window: ShutterParams,
    pub bedroom_door: ShutterParams,
    pub living_window: ShutterParams,
    pub living_door: ShutterParams,

    // --- Radio ---
    /// Pulse timing table for the OOK wire protocol.
    pub radio: RfTimings,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Scheduling
            control_loop_interval_ms: 20, // 50 Hz
            telemetry_interval_secs: 60,  // 1/min

            // Drives
            bedroom_window: ShutterParams {
                radio_address: 0b0000_0001,
                time_up_secs: 26.695,
                time_down_secs: 26.1,
            },
            bedroom_door: ShutterParams {
                radio_address: 0b0000_0010,
                time_up_secs: 26.457,
                time_down_secs: 25.06,
            },
            living_window: ShutterParams {
                radio_address: 0b0000_0011,
                time_up_secs: 24.5,
                time_down_secs: 25.06,
            },
            living_door: ShutterParams {
                radio_address: 0b0000_0100,
                time_up_secs: 26.1,
                time_down_secs: 24.76,
            },

            // Radio
            radio: RfTimings::default(),
        }
    }
}
