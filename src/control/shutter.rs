//! Per-drive scheduling and the time-based position model.
//!
//! Each [`Shutter`] owns a FIFO of commands and advances at most the head
//! element per tick, so a 26-second travel on one drive never starves
//! another.  There is no position sensor: the estimate comes from the
//! measured full-range travel times, anchored by a calibration run to the
//! top end stop.

use heapless::Deque;
use log::{debug, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, RadioPort};
use crate::config::ShutterParams;
use crate::radio::Instruction;

use super::command::{Command, CommandIds, CommandKind, CommandStatus};
use super::Device;

/// Pending commands per drive.  Bounded: a user clicking faster than
/// travel completes gets the overflow dropped, not an allocation.
pub const QUEUE_CAP: usize = 8;

/// What the head command asked for, applied once its borrow ends.
enum Outcome {
    Idle,
    Sent {
        id: u32,
        instruction: Instruction,
        append_stop: bool,
    },
    Completed {
        id: u32,
        kind: CommandKind,
        target: u8,
    },
}

/// One physical drive: radio address, calibration state, position estimate
/// and its private command queue.
pub struct Shutter {
    device: Device,
    radio_address: u8,
    calibrated: bool,
    /// Estimated position, 0 = fully up, 100 = fully down.  Only
    /// meaningful while `calibrated` is set.
    position: u8,
    time_up_secs: f64,
    time_down_secs: f64,
    queue: Deque<Command, QUEUE_CAP>,
}

impl Shutter {
    pub fn new(device: Device, params: &ShutterParams) -> Self {
        Self {
            device,
            radio_address: params.radio_address,
            calibrated: false,
            position: 0,
            time_up_secs: params.time_up_secs,
            time_down_secs: params.time_down_secs,
            queue: Deque::new(),
        }
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn radio_address(&self) -> u8 {
        self.radio_address
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// The command currently at the head of the queue, if any.
    pub fn head(&self) -> Option<&Command> {
        self.queue.front()
    }

    /// The `index`-th queued command (0 = head), if any.
    pub fn queued(&self, index: usize) -> Option<&Command> {
        self.queue.iter().nth(index)
    }

    /// Append a command.  On overflow the command is dropped with a
    /// warning; the link is open-loop and has nobody to report to.
    pub fn enqueue(&mut self, command: Command, sink: &mut impl EventSink) {
        let id = command.id();
        let kind = command.kind();
        if self.queue.push_back(command).is_err() {
            warn!("{:?}: queue full, dropping command {}", self.device, id);
            return;
        }
        sink.emit(&AppEvent::CommandQueued {
            device: self.device,
            id,
            kind,
        });
    }

    /// Drop every pending command immediately.
    ///
    /// An in-flight absolute or calibration run loses its completion
    /// bookkeeping, so the position estimate is abandoned mid-travel until
    /// the next calibration anchors it again.
    pub fn clear_queue(&mut self, sink: &mut impl EventSink) {
        let dropped = self.queue.len();
        if dropped == 0 {
            return;
        }
        self.queue.clear();
        sink.emit(&AppEvent::QueueCleared {
            device: self.device,
            dropped,
        });
    }

    /// Advance the head command by one scheduling step.
    ///
    /// `ToBeSent` triggers a send attempt, `Executing` waits on the stored
    /// end timestamp, `Done` runs the completion side effect and pops.  At
    /// most one command advances per tick, which keeps per-tick work
    /// bounded and the queue strictly FIFO.
    pub fn tick(
        &mut self,
        now_ms: u64,
        radio: &mut impl RadioPort,
        ids: &mut CommandIds,
        sink: &mut impl EventSink,
    ) {
        let position = self.position;
        let radio_address = self.radio_address;
        let time_up = self.time_up_secs;
        let time_down = self.time_down_secs;

        let Some(head) = self.queue.front_mut() else {
            return;
        };
        head.update(now_ms);

        let outcome = match head.status() {
            CommandStatus::Executing => Outcome::Idle,
            CommandStatus::Done => Outcome::Completed {
                id: head.id(),
                kind: head.kind(),
                target: head.target_position(),
            },
            CommandStatus::ToBeSent => match head.kind() {
                CommandKind::Relative => {
                    if radio.transmit(radio_address, head.instruction()) {
                        let travel_ms = match head.instruction() {
                            Instruction::Up => secs_to_ms(time_up),
                            Instruction::Down => secs_to_ms(time_down),
                            // A stop has no travel window; it completes on
                            // the next tick.
                            _ => 0,
                        };
                        head.begin_execution(now_ms + travel_ms);
                        Outcome::Sent {
                            id: head.id(),
                            instruction: head.instruction(),
                            append_stop: false,
                        }
                    } else {
                        Outcome::Idle
                    }
                }
                CommandKind::Calibrate => {
                    if radio.transmit(radio_address, head.instruction()) {
                        head.begin_execution(now_ms + secs_to_ms(time_up));
                        Outcome::Sent {
                            id: head.id(),
                            instruction: head.instruction(),
                            append_stop: false,
                        }
                    } else {
                        Outcome::Idle
                    }
                }
                CommandKind::Absolute => {
                    if radio.transmit(radio_address, head.instruction()) {
                        // Second attempt: the direction is resolved, so the
                        // packet went out.  Scale the travel window to the
                        // portion of the range actually covered.
                        let delta = i32::from(head.target_position()) - i32::from(position);
                        let full_range = match head.instruction() {
                            Instruction::Down => time_down,
                            _ => time_up,
                        };
                        let travel_ms = (f64::from(delta.unsigned_abs()) / 100.0
                            * full_range
                            * 1000.0)
                            .round() as u64;
                        head.begin_execution(now_ms + travel_ms);
                        Outcome::Sent {
                            id: head.id(),
                            instruction: head.instruction(),
                            append_stop: true,
                        }
                    } else {
                        // The encoder refused the unresolved instruction;
                        // derive the direction from the estimate and try
                        // again next tick.
                        let delta = i32::from(head.target_position()) - i32::from(position);
                        let direction = if delta > 0 {
                            Instruction::Down
                        } else {
                            Instruction::Up
                        };
                        head.set_instruction(direction);
                        debug!(
                            "{:?}: absolute {} resolved {:?} (delta {})",
                            self.device,
                            head.id(),
                            direction,
                            delta
                        );
                        Outcome::Idle
                    }
                }
            },
        };

        match outcome {
            Outcome::Idle => {}
            Outcome::Sent {
                id,
                instruction,
                append_stop,
            } => {
                sink.emit(&AppEvent::Transmitted {
                    device: self.device,
                    id,
                    instruction,
                });
                if append_stop {
                    // The receivers run until told otherwise; a trailing
                    // stop halts the motor once the window elapses.
                    self.enqueue(Command::relative(ids.next(), Instruction::Stop), sink);
                }
            }
            Outcome::Completed { id, kind, target } => {
                match kind {
                    CommandKind::Relative => {
                        // Manual moves leave the estimate untouched; only a
                        // calibration re-anchors it.
                    }
                    CommandKind::Calibrate => {
                        self.calibrated = true;
                        self.set_position(0, sink);
                        sink.emit(&AppEvent::Calibrated {
                            device: self.device,
                        });
                    }
                    CommandKind::Absolute => {
                        self.set_position(target, sink);
                    }
                }
                self.queue.pop_front();
                sink.emit(&AppEvent::CommandCompleted {
                    device: self.device,
                    id,
                    kind,
                });
            }
        }
    }

    fn set_position(&mut self, position: u8, sink: &mut impl EventSink) {
        if self.position != position {
            self.position = position;
            sink.emit(&AppEvent::PositionUpdated {
                device: self.device,
                position,
            });
        }
    }
}

fn secs_to_ms(secs: f64) -> u64 {
    (secs * 1000.0).round() as u64
}
