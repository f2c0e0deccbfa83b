//! Fuzz the pulse decoder: arbitrary duration trains must never panic and
//! a packet must only decode when its header is intact.

#![no_main]

use libfuzzer_sys::fuzz_target;

use rollermote::radio::{Pulse, PulseDecoder, RfTimings, HEADER};

fuzz_target!(|data: &[u8]| {
    let decoder = PulseDecoder::new(RfTimings::default());

    // Reinterpret the input as little-endian u16 duration pairs.
    let mut pulses = Vec::with_capacity(data.len() / 4);
    for chunk in data.chunks_exact(4) {
        pulses.push(Pulse {
            high_us: u32::from(u16::from_le_bytes([chunk[0], chunk[1]])),
            low_us: u32::from(u16::from_le_bytes([chunk[2], chunk[3]])),
        });
    }

    let _ = decoder.decode_byte(&pulses);

    if let Some((_, _)) = decoder.decode_packet(&pulses) {
        // A successful decode implies the header really was present.
        for (i, expected) in HEADER.into_iter().enumerate() {
            assert_eq!(
                decoder.decode_byte(&pulses[1 + i * 8..]),
                Some(expected)
            );
        }
    }
});
