//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! A future MQTT or web-socket adapter would implement the same trait.

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Status(snapshot) => {
                for d in &snapshot.drives {
                    let Some(device) = d.device else { continue };
                    info!(
                        "STATUS | {:?} | pos={}{} | queued={}",
                        device,
                        d.position,
                        if d.calibrated { "" } else { " (uncalibrated)" },
                        d.queue_len,
                    );
                }
            }
            AppEvent::CommandQueued { device, id, kind } => {
                info!("QUEUE | {:?} | cmd {} {:?}", device, id, kind);
            }
            AppEvent::Transmitted {
                device,
                id,
                instruction,
            } => {
                info!("SEND  | {:?} | cmd {} {:?}", device, id, instruction);
            }
            AppEvent::CommandCompleted { device, id, kind } => {
                info!("DONE  | {:?} | cmd {} {:?}", device, id, kind);
            }
            AppEvent::PositionUpdated { device, position } => {
                info!("POS   | {:?} | {}", device, position);
            }
            AppEvent::Calibrated { device } => {
                info!("CAL   | {:?} | anchored at top end stop", device);
            }
            AppEvent::QueueCleared { device, dropped } => {
                info!("STOP  | {:?} | {} pending command(s) dropped", device, dropped);
            }
            AppEvent::RequestDropped { reason } => {
                debug!("DROP  | {}", reason);
            }
        }
    }
}
