//! Controller — decodes external requests and multiplexes the four drive
//! schedulers over the single radio.
//!
//! Owns the drives and the process-wide command id counter.  The radio is
//! lent in per call as `&mut impl RadioPort` — there is exactly one thread,
//! so no command's burst can overlap another's and the line needs no lock.

use log::debug;

use crate::app::commands::Request;
use crate::app::events::{AppEvent, DriveStatus, StatusSnapshot};
use crate::app::ports::{EventSink, RadioPort};
use crate::config::SystemConfig;
use crate::radio::Instruction;

use super::command::{Command, CommandIds};
use super::shutter::Shutter;
use super::Device;

/// The shutter controller: four drives, one id counter.
pub struct ShutterController {
    shutters: [Shutter; 4],
    ids: CommandIds,
}

impl ShutterController {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            shutters: [
                Shutter::new(Device::BedroomWindow, &config.bedroom_window),
                Shutter::new(Device::BedroomDoor, &config.bedroom_door),
                Shutter::new(Device::LivingWindow, &config.living_window),
                Shutter::new(Device::LivingDoor, &config.living_door),
            ],
            ids: CommandIds::default(),
        }
    }

    /// One scheduling tick: advance every drive's head command in fixed
    /// device order.
    ///
    /// Transmit costs are serial — one thread, one output line — so a tick
    /// in which several drives send packets stretches by the sum of their
    /// burst durations, not the maximum.
    pub fn execute(&mut self, now_ms: u64, radio: &mut impl RadioPort, sink: &mut impl EventSink) {
        for shutter in &mut self.shutters {
            shutter.tick(now_ms, radio, &mut self.ids, sink);
        }
    }

    /// Decode and enqueue one inbound request.
    ///
    /// Malformed payloads are dropped without an error: the link is
    /// open-loop, exactly like the factory remote ignoring a mispressed
    /// button.
    pub fn handle_request(&mut self, request: &Request, sink: &mut impl EventSink) {
        match request {
            Request::Relative(payload) => self.decode_relative(payload, sink),
            Request::Absolute { device, position } => {
                self.decode_absolute(device, position, sink);
            }
            Request::Calibrate(index) => self.decode_calibrate(index, sink),
        }
    }

    /// `"<device digit>,<up|stop|down>"`, e.g. `"3,up"`.
    fn decode_relative(&mut self, payload: &str, sink: &mut impl EventSink) {
        let bytes = payload.as_bytes();
        if bytes.len() < 3 || bytes[1] != b',' {
            drop_request("relative: bad separator", sink);
            return;
        }

        let device = Device::from_digit(bytes[0]);
        let Some(slot) = device.index() else {
            drop_request("relative: unknown device", sink);
            return;
        };

        let instruction = match &payload[2..] {
            "up" => Instruction::Up,
            "stop" => Instruction::Stop,
            "down" => Instruction::Down,
            _ => {
                drop_request("relative: unknown direction", sink);
                return;
            }
        };

        if instruction == Instruction::Stop {
            // A user stop cancels everything in flight before it is
            // queued, so the halt goes out this tick rather than after the
            // current travel window elapses.
            self.shutters[slot].clear_queue(sink);
        }
        let command = Command::relative(self.ids.next(), instruction);
        self.shutters[slot].enqueue(command, sink);
    }

    /// Absolute positioning: a device-name flag plus a 0–100 scale value.
    fn decode_absolute(&mut self, device_name: &str, position_str: &str, sink: &mut impl EventSink) {
        let device = Device::from_name(device_name);
        let Some(slot) = device.index() else {
            drop_request("absolute: unknown device", sink);
            return;
        };

        // The previous firmware generation parsed with Arduino's toInt(),
        // which reads garbage as zero; kept for request compatibility.
        let requested = position_str.trim().parse::<i32>().unwrap_or(0);
        let target = requested.clamp(0, 100) as u8;

        if !self.shutters[slot].is_calibrated() {
            // Without an anchored estimate the delta math is meaningless;
            // prepend a calibration run.
            let cal = Command::calibrate(self.ids.next());
            self.shutters[slot].enqueue(cal, sink);
        }

        let command = Command::absolute(self.ids.next(), target);
        self.shutters[slot].enqueue(command, sink);
    }

    /// Calibration run for a device index string (`"0"`–`"3"`).
    fn decode_calibrate(&mut self, index: &str, sink: &mut impl EventSink) {
        let device = match index.as_bytes() {
            [digit] => Device::from_digit(*digit),
            _ => Device::Unknown,
        };
        let Some(slot) = device.index() else {
            drop_request("calibrate: unknown device", sink);
            return;
        };

        let command = Command::calibrate(self.ids.next());
        self.shutters[slot].enqueue(command, sink);
    }

    /// Telemetry snapshot across all drives.
    pub fn status(&self) -> StatusSnapshot {
        let mut snapshot = StatusSnapshot::default();
        for (slot, shutter) in self.shutters.iter().enumerate() {
            snapshot.drives[slot] = DriveStatus {
                device: Some(shutter.device()),
                calibrated: shutter.is_calibrated(),
                position: shutter.position(),
                queue_len: shutter.queue_len(),
            };
        }
        snapshot
    }

    /// Read access to one drive (introspection and tests).
    pub fn shutter(&self, device: Device) -> Option<&Shutter> {
        device.index().map(|slot| &self.shutters[slot])
    }
}

fn drop_request(reason: &'static str, sink: &mut impl EventSink) {
    debug!("request dropped: {}", reason);
    sink.emit(&AppEvent::RequestDropped { reason });
}
