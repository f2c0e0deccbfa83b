//! Inbound requests to the control core.
//!
//! These carry the raw payloads exactly as the (out-of-scope) transport
//! layer delivers them; the [`ShutterController`] decodes them into queued
//! shutter commands.  Malformed payloads are dropped without an error by
//! design — the radio link is open-loop and has nobody to report to.
//!
//! [`ShutterController`]: crate::control::ShutterController

/// Raw request payloads accepted from external adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Relative motion command string, e.g. `"3,up"`.
    Relative(String),

    /// Absolute positioning: a device-name flag plus the target value on
    /// the 0–100 scale (both still strings at this point).
    Absolute { device: String, position: String },

    /// Calibration run for a device index string (`"0"`–`"3"`).
    Calibrate(String),
}
