//! RollerMote Firmware — Main Entry Point
//!
//! The caller-owned control loop around the scheduling engine:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  NullRequestSource   LogEventSink   NvsAdapter   GpioTxLine  │
//! │  (RequestPort)       (EventSink)    (ConfigPort) (TxLinePort)│
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ───────────────────    │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │  ShutterController (4 drive queues, position model)    │  │
//! │  │  Transmitter (OOK pulse encoder)                       │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop ticks every `control_loop_interval_ms` (20 ms by default).
//! Shutter travel never blocks it — only a radio burst does, bounded at a
//! few hundred milliseconds per sending drive.

#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use rollermote::adapters::log_sink::LogEventSink;
use rollermote::adapters::nvs::NvsAdapter;
use rollermote::adapters::time::MonotonicClock;
use rollermote::adapters::transport::NullRequestSource;
use rollermote::app::events::AppEvent;
use rollermote::app::ports::{ConfigPort, EventSink, RequestPort};
use rollermote::config::SystemConfig;
use rollermote::control::ShutterController;
use rollermote::drivers::hw_init;
use rollermote::drivers::tx_line::GpioTxLine;
use rollermote::drivers::watchdog::Watchdog;
use rollermote::radio::Transmitter;

fn main() -> Result<()> {
    // ── 1. Platform bootstrap ─────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    info!("RollerMote v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Hardware ───────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Without the TX GPIO there is nothing this firmware can do;
        // halt and let the watchdog reset us.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let watchdog = Watchdog::new();

    // ── 3. Config from NVS (or defaults) ──────────────────────
    let nvs = match NvsAdapter::new() {
        Ok(n) => n,
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults and no persistence", e);
            NvsAdapter::default()
        }
    };
    let config = match nvs.load() {
        Ok(cfg) => {
            info!("Config loaded from NVS");
            cfg
        }
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            SystemConfig::default()
        }
    };

    // ── 4. Core + adapters ────────────────────────────────────
    let mut radio = Transmitter::new(GpioTxLine::new(), config.radio.clone());
    let mut controller = ShutterController::new(&config);
    let mut sink = LogEventSink::new();
    // The web front end is glue outside this crate; it wires in here.
    let mut requests = NullRequestSource;
    let clock = MonotonicClock::new();

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    let tick_ms = u64::from(config.control_loop_interval_ms.max(1));
    let ticks_per_status = (u64::from(config.telemetry_interval_secs) * 1000 / tick_ms).max(1);
    let mut status_counter: u64 = 0;

    loop {
        std::thread::sleep(std::time::Duration::from_millis(tick_ms));

        while let Some(request) = requests.poll() {
            controller.handle_request(&request, &mut sink);
        }

        controller.execute(clock.now_ms(), &mut radio, &mut sink);

        status_counter += 1;
        if status_counter >= ticks_per_status {
            sink.emit(&AppEvent::Status(controller.status()));
            status_counter = 0;
        }

        watchdog.feed();
    }
}
