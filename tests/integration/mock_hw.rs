//! Mock hardware for integration tests.
//!
//! Records every transmit-line hold and every emitted event so tests can
//! assert on full histories without touching real GPIO registers.

use rollermote::app::events::AppEvent;
use rollermote::app::ports::{EventSink, RadioPort, TxLinePort};
use rollermote::radio::{Instruction, Pulse};

// ── Recording transmit line ───────────────────────────────────

/// Line fake that records the level held during every wait.
pub struct RecordingLine {
    pub level: bool,
    /// `(level, duration_us)` for each `wait_micros` call.
    pub segments: Vec<(bool, u32)>,
}

#[allow(dead_code)]
impl RecordingLine {
    pub fn new() -> Self {
        Self {
            level: false,
            segments: Vec::new(),
        }
    }

    /// Pair HIGH holds with the LOW hold that follows them.
    ///
    /// Extra LOW segments (inter-packet gaps) are skipped, so the result
    /// is exactly the pulse train a receiver's edge detector would see.
    pub fn pulses(&self) -> Vec<Pulse> {
        let mut pulses = Vec::new();
        let mut iter = self.segments.iter().peekable();
        while let Some(&(level, high_us)) = iter.next() {
            if !level {
                continue;
            }
            if let Some(&&(false, low_us)) = iter.peek() {
                iter.next();
                pulses.push(Pulse { high_us, low_us });
            }
        }
        pulses
    }
}

impl Default for RecordingLine {
    fn default() -> Self {
        Self::new()
    }
}

impl TxLinePort for RecordingLine {
    fn set_line(&mut self, high: bool) {
        self.level = high;
    }

    fn wait_micros(&mut self, us: u32) {
        self.segments.push((self.level, us));
    }
}

// ── Scripted radio ────────────────────────────────────────────

/// Radio fake with the real encoder's refusal behaviour: it records what
/// would have gone on the air and rejects unresolved instructions.
pub struct WireLog {
    pub sent: Vec<(u8, Instruction)>,
}

#[allow(dead_code)]
impl WireLog {
    pub fn new() -> Self {
        Self { sent: Vec::new() }
    }

    pub fn last(&self) -> Option<&(u8, Instruction)> {
        self.sent.last()
    }
}

impl Default for WireLog {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioPort for WireLog {
    fn transmit(&mut self, device_address: u8, instruction: Instruction) -> bool {
        if instruction.payload().is_none() {
            return false;
        }
        self.sent.push((device_address, instruction));
        true
    }
}

// ── Collecting event sink ─────────────────────────────────────

/// Sink that keeps every event for later inspection.
pub struct CollectingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl CollectingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, predicate: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(e)).count()
    }
}

impl Default for CollectingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for CollectingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
