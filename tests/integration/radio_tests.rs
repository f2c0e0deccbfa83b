//! Wire-format tests: the encoder's output, decoded back with the
//! receive-side duration table, must be the bit-exact sniffed protocol.

use crate::mock_hw::RecordingLine;

use rollermote::app::ports::RadioPort;
use rollermote::radio::{Instruction, Pulse, PulseDecoder, RfTimings, Transmitter};

fn transmit(instruction: Instruction, address: u8) -> (bool, Vec<Pulse>) {
    let mut tx = Transmitter::new(RecordingLine::new(), RfTimings::default());
    let sent = tx.transmit(address, instruction);
    let pulses = tx.line().pulses();
    (sent, pulses)
}

/// Pulses per packet repetition: one sync pair plus 5 bytes × 8 bits.
const PULSES_PER_PACKET: usize = 1 + 40;

#[test]
fn burst_contains_five_decodable_packets() {
    let (sent, pulses) = transmit(Instruction::Stop, 0x04);
    assert!(sent);
    assert_eq!(pulses.len(), PULSES_PER_PACKET * 5);

    let decoder = PulseDecoder::new(RfTimings::default());
    for packet in pulses.chunks(PULSES_PER_PACKET) {
        assert_eq!(decoder.decode_packet(packet), Some((0x04, 0x55)));
    }
}

#[test]
fn each_instruction_maps_to_its_sniffed_payload() {
    let decoder = PulseDecoder::new(RfTimings::default());
    for (instruction, payload) in [
        (Instruction::Up, 0x11),
        (Instruction::Down, 0x33),
        (Instruction::Stop, 0x55),
    ] {
        let (sent, pulses) = transmit(instruction, 0x02);
        assert!(sent);
        assert_eq!(
            decoder.decode_packet(&pulses[..PULSES_PER_PACKET]),
            Some((0x02, payload))
        );
    }
}

#[test]
fn unresolved_instruction_emits_nothing() {
    let (sent, pulses) = transmit(Instruction::Unknown, 0x01);
    assert!(!sent);
    assert!(pulses.is_empty());
}

#[test]
fn stop_payload_round_trips_through_the_bit_emitter() {
    // The stop byte 0x55 alternates zero/one; decoding the emitted
    // durations against the receive table must recover it exactly.
    let (_, pulses) = transmit(Instruction::Stop, 0x04);
    let decoder = PulseDecoder::new(RfTimings::default());

    // Byte 5 of the first packet (after sync + 3 header bytes + address).
    let payload_pulses = &pulses[1 + 4 * 8..1 + 5 * 8];
    assert_eq!(decoder.decode_byte(payload_pulses), Some(0x55));
}

#[test]
fn header_bytes_survive_the_round_trip() {
    let (_, pulses) = transmit(Instruction::Up, 0x03);
    let decoder = PulseDecoder::new(RfTimings::default());

    for (i, expected) in [0xCB_u8, 0x7A, 0x51].into_iter().enumerate() {
        let byte_pulses = &pulses[1 + i * 8..1 + (i + 1) * 8];
        assert_eq!(decoder.decode_byte(byte_pulses), Some(expected));
    }
}

#[test]
fn custom_timings_flow_through_the_encoder() {
    // The timing table is injected, not baked in; halving the sync pulse
    // must show up on the line verbatim.
    let timings = RfTimings {
        sync_on_us: 2350,
        ..RfTimings::default()
    };
    let mut tx = Transmitter::new(RecordingLine::new(), timings);
    assert!(tx.transmit(0x01, Instruction::Up));
    assert_eq!(tx.line().segments[0], (true, 2350));
}
