//! Fuzz the request decoder: arbitrary transport payloads must never
//! panic the controller, and malformed ones must never queue work.

#![no_main]

use libfuzzer_sys::fuzz_target;

use rollermote::app::commands::Request;
use rollermote::app::events::AppEvent;
use rollermote::app::ports::EventSink;
use rollermote::config::SystemConfig;
use rollermote::control::shutter::QUEUE_CAP;
use rollermote::control::{Device, ShutterController};

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let Ok(payload) = core::str::from_utf8(data) else {
        return;
    };

    let mut controller = ShutterController::new(&SystemConfig::default());
    let mut sink = NullSink;

    // Feed the same bytes through every decode path.
    controller.handle_request(&Request::Relative(payload.to_string()), &mut sink);
    controller.handle_request(&Request::Calibrate(payload.to_string()), &mut sink);
    if let Some((device, position)) = payload.split_once(' ') {
        controller.handle_request(
            &Request::Absolute {
                device: device.to_string(),
                position: position.to_string(),
            },
            &mut sink,
        );
    }

    // Queues stay bounded no matter what came in.
    for device in Device::DRIVES {
        assert!(controller.shutter(device).unwrap().queue_len() <= QUEUE_CAP);
    }
});
