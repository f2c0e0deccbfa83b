//! OOK pulse encoder — owns the single transmit line.
//!
//! Turns a receiver address and an instruction into the timed pulse train
//! described in [`crate::radio`].  The encoder is generic over
//! [`TxLinePort`] so the packet-assembly logic runs unmodified against a
//! recording fake in tests and against the real GPIO on the bridge.
//!
//! A transmission is fully synchronous: sync + 5 bytes × 8 bits × 5
//! repetitions plus inter-packet gaps comes to several hundred
//! milliseconds of busy-holding the thread.  See
//! [`RadioPort`](crate::app::ports::RadioPort) for why that is accepted.

use log::debug;

use crate::app::ports::{RadioPort, TxLinePort};

use super::timings::RfTimings;
use super::{HEADER, Instruction};

/// Pulse encoder bound to one transmit line.
pub struct Transmitter<L> {
    line: L,
    timings: RfTimings,
}

impl<L: TxLinePort> Transmitter<L> {
    pub fn new(line: L, timings: RfTimings) -> Self {
        Self { line, timings }
    }

    /// The timing table this encoder emits with.
    pub fn timings(&self) -> &RfTimings {
        &self.timings
    }

    /// Access the underlying line (used by tests to inspect a fake).
    pub fn line(&self) -> &L {
        &self.line
    }

    /// One HIGH/LOW pulse pair.
    fn pulse(&mut self, high_us: u32, low_us: u32) {
        self.line.set_line(true);
        self.line.wait_micros(high_us);
        self.line.set_line(false);
        self.line.wait_micros(low_us);
    }

    /// Emit one byte, most-significant bit first.
    fn send_byte(&mut self, byte: u8) {
        for k in 0..8 {
            if (byte >> (7 - k)) & 1 == 1 {
                self.pulse(self.timings.one_high_send_us, self.timings.one_low_send_us);
            } else {
                self.pulse(self.timings.zero_high_send_us, self.timings.zero_low_send_us);
            }
        }
    }

    /// Synchronization pulse opening every packet repetition.
    fn send_sync(&mut self) {
        self.pulse(self.timings.sync_on_us, self.timings.sync_off_us);
    }
}

impl<L: TxLinePort> RadioPort for Transmitter<L> {
    fn transmit(&mut self, device_address: u8, instruction: Instruction) -> bool {
        // Unresolved instructions never reach the bit emitter; the failed
        // probe is how the scheduler notices an absolute move still needs
        // its direction derived.
        let Some(payload) = instruction.payload() else {
            return false;
        };

        for _ in 0..self.timings.repeats {
            self.send_sync();
            for byte in HEADER {
                self.send_byte(byte);
            }
            self.send_byte(device_address);
            self.send_byte(payload);
            self.line.wait_micros(self.timings.packet_gap_send_us);
        }

        debug!(
            "radio: sent {:?} to 0x{:02X} ({} repetitions)",
            instruction, device_address, self.timings.repeats
        );
        true
    }
}
