//! Receive-side pulse-train decoder.
//!
//! The bridge hardware is transmit-only, but the protocol carries a second
//! duration table for the receive direction (sniffed off the factory
//! remote).  This decoder classifies pulse trains against that table; the
//! test suite and the fuzz harness use it to prove the encoder's output is
//! decodable, and a future sniffer build starts here.

use super::timings::RfTimings;
use super::HEADER;

/// A single on/off pulse pair: HIGH for `high_us`, then LOW for `low_us`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub high_us: u32,
    pub low_us: u32,
}

/// Duration-based classifier for received pulse trains.
pub struct PulseDecoder {
    timings: RfTimings,
}

impl PulseDecoder {
    pub fn new(timings: RfTimings) -> Self {
        Self { timings }
    }

    fn within(&self, actual: u32, nominal: u32) -> bool {
        actual.abs_diff(nominal) <= self.timings.pulse_tolerance_us
    }

    /// Classify one pulse pair as a bit value.
    ///
    /// `None` when neither table row matches — noise, or a sync pulse.
    pub fn classify(&self, pulse: Pulse) -> Option<bool> {
        let t = &self.timings;
        if self.within(pulse.high_us, t.one_high_recv_us) && self.within(pulse.low_us, t.one_low_recv_us) {
            Some(true)
        } else if self.within(pulse.high_us, t.zero_high_recv_us)
            && self.within(pulse.low_us, t.zero_low_recv_us)
        {
            Some(false)
        } else {
            None
        }
    }

    /// Is this pulse pair the synchronization pattern?
    pub fn is_sync(&self, pulse: Pulse) -> bool {
        self.within(pulse.high_us, self.timings.sync_on_us)
            && self.within(pulse.low_us, self.timings.sync_off_us)
    }

    /// Decode eight consecutive pulse pairs into a byte, MSB first.
    pub fn decode_byte(&self, pulses: &[Pulse]) -> Option<u8> {
        if pulses.len() < 8 {
            return None;
        }
        let mut byte = 0u8;
        for pulse in &pulses[..8] {
            byte = (byte << 1) | u8::from(self.classify(*pulse)?);
        }
        Some(byte)
    }

    /// Decode one full packet: sync pair followed by 40 bit pairs.
    ///
    /// Validates the header and returns `(device_address, payload)`.
    pub fn decode_packet(&self, pulses: &[Pulse]) -> Option<(u8, u8)> {
        if pulses.len() < 41 || !self.is_sync(pulses[0]) {
            return None;
        }
        let mut bytes = [0u8; 5];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = self.decode_byte(&pulses[1 + i * 8..])?;
        }
        if bytes[..3] != HEADER {
            return None;
        }
        Some((bytes[3], bytes[4]))
    }
}
