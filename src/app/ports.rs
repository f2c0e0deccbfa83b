//! Port traits — the hexagonal boundary between the scheduling core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ control core (domain)
//! ```
//!
//! Driven adapters (the GPIO line, the NVS store, the log sink, the request
//! transport) implement these traits.  The controller and shutters consume
//! them via generics, so the domain core never touches hardware directly.

use crate::app::commands::Request;
use crate::app::events::AppEvent;
use crate::config::SystemConfig;
use crate::radio::Instruction;

// ───────────────────────────────────────────────────────────────
// Transmit line port (driven adapter: radio encoder → hardware)
// ───────────────────────────────────────────────────────────────

/// The single physical output feeding the RF transmit stage.
///
/// Implementations must be synchronous and hold microsecond-level timing
/// fidelity — the pulse encoder bit-bangs the protocol through these two
/// calls and the receivers decode on durations alone.
pub trait TxLinePort {
    /// Drive the line high or low.
    fn set_line(&mut self, high: bool);

    /// Hold the line at its current level for `us` microseconds.
    fn wait_micros(&mut self, us: u32);
}

// ───────────────────────────────────────────────────────────────
// Radio port (driven adapter: scheduler → pulse encoder)
// ───────────────────────────────────────────────────────────────

/// Transmit one instruction packet burst to a receiver.
///
/// Returns `false` without touching the line when `instruction` has no wire
/// payload yet; the scheduler uses this probe to drive the two-phase
/// resolution of absolute moves.  A successful call blocks the calling
/// thread for the full burst (sync + 5 bytes, repeated — on the order of
/// several hundred milliseconds).  That latency is a deliberate, bounded
/// cost: handing the pulse train to a cooperative scheduler would jitter it
/// beyond what the receivers decode.
pub trait RadioPort {
    fn transmit(&mut self, device_address: u8, instruction: Instruction) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Request port (driven adapter: transport → domain)
// ───────────────────────────────────────────────────────────────

/// Inbound transport seam.
///
/// The web/serial glue pushes raw request payloads through this port; the
/// control core never parses network traffic itself.
pub trait RequestPort {
    /// Next pending request, `None` when idle.  Non-blocking.
    fn poll(&mut self) -> Option<Request>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`AppEvent`]s through this port.  Adapters
/// decide where they go (serial log, MQTT, a web-socket feed, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate before persisting.  Invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped —
/// a mistyped travel time would otherwise drive a motor against its end
/// stop for minutes.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
