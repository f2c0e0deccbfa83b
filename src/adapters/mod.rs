//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements      | Connects to               |
//! |-------------|-----------------|---------------------------|
//! | `log_sink`  | EventSink       | Serial log output         |
//! | `nvs`       | ConfigPort      | NVS / in-memory store     |
//! | `time`      | —               | ESP32 system timer        |
//! | `transport` | RequestPort     | Web/serial glue (external)|

pub mod log_sink;
pub mod nvs;
pub mod time;
pub mod transport;
