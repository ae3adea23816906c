//! Drives every protocol parser (and its polarity-inverted twin) against
//! the same run-length stream, returning the first decoded [`Key`].

use crate::decode;
use crate::key::{Key, ProtocolId};
use crate::protocol::{self, Protocol, ParserState, StepOutcome};
use crate::protocol_tables;

struct Slot {
    id: ProtocolId,
    protocol: Protocol,
    positive: ParserState,
    inverted: ParserState,
}

/// Owns one parser instance (plus its polarity-inverted twin) per
/// protocol and multiplexes incoming run-length values across all of
/// them, returning the first protocol to complete a frame.
///
/// Matches the source behavior of returning on the first match without
/// replaying the consumed value into the protocols that did not win this
/// round — they simply continue from wherever their own state machine
/// had gotten to.
pub struct Runner {
    slots: Vec<Slot>,
    last_rc5_toggle: Option<u32>,
}

impl Runner {
    pub fn new() -> Self {
        let slots = protocol_tables::all()
            .into_iter()
            .map(|(id, protocol)| Slot {
                id,
                protocol,
                positive: ParserState::new(),
                inverted: ParserState::new(),
            })
            .collect();
        Runner { slots, last_rc5_toggle: None }
    }

    /// Feed one run-length value (signed, 10µs units) to every protocol.
    /// Returns the first protocol to report a complete frame, if any.
    pub fn feed(&mut self, value: i32) -> Option<Key> {
        for index in 0..self.slots.len() {
            let Slot { id, protocol, positive, inverted } = &mut self.slots[index];
            let id = *id;
            if let Some(encoding) = drive(protocol, positive, value) {
                return Some(key_from_encoding(id, encoding, &mut self.last_rc5_toggle));
            }
            if let Some(encoding) = drive(protocol, inverted, -value) {
                return Some(key_from_encoding(id, encoding, &mut self.last_rc5_toggle));
            }
        }
        None
    }
}

fn key_from_encoding(id: ProtocolId, encoding: u32, last_rc5_toggle: &mut Option<u32>) -> Key {
    match id {
        ProtocolId::Nec => decode::nec_key(encoding),
        ProtocolId::Nec2 => decode::nec2_key(encoding),
        ProtocolId::NecRepeat | ProtocolId::Nec2Repeat => decode::nec_repeat_key(id, -1, -1),
        ProtocolId::Sharp => decode::sharp_key(encoding),
        ProtocolId::Sony12 => decode::sony12_key(encoding),
        ProtocolId::Sony20 => decode::sony20_key(encoding),
        ProtocolId::Rc5 => {
            let toggle = decode::rc5_toggle(encoding);
            let mut key = decode::rc5_key(encoding);
            key.repeat = *last_rc5_toggle == Some(toggle);
            *last_rc5_toggle = Some(toggle);
            key
        }
    }
}

impl Default for Runner {
    fn default() -> Self {
        Runner::new()
    }
}

/// `protocol_value`'s driver loop: feed `value` to the parser; on a
/// failure that happened after some prior progress had already been made
/// (`main_pos != 0` at entry), retry the original value once from the
/// reset state, since it may be legal as the start of a fresh sequence.
fn drive(protocol: &Protocol, state: &mut ParserState, value: i32) -> Option<u32> {
    let had_progress = state.has_progress();
    let mut current = value;
    loop {
        match protocol::step(protocol, state, current) {
            StepOutcome::Complete { encoding, remainder } => {
                // The frame is done, but any leftover time is real signal
                // too — most often the lead-in of the very next frame in a
                // repeat train — so it gets one fresh attempt against the
                // now-reset state rather than being thrown away.
                if remainder != 0 {
                    let _ = protocol::step(protocol, state, remainder);
                }
                return Some(encoding);
            }
            StepOutcome::Progress => return None,
            StepOutcome::Over { remainder } => {
                current = remainder;
                continue;
            }
            StepOutcome::Fail => {
                if had_progress {
                    // retry the original value once, from a clean state
                    return match protocol::step(protocol, state, value) {
                        StepOutcome::Complete { encoding, remainder } => {
                            if remainder != 0 {
                                let _ = protocol::step(protocol, state, remainder);
                            }
                            Some(encoding)
                        }
                        _ => None,
                    };
                }
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Slot as TableSlot;

    fn toy_protocol() -> Protocol {
        Protocol {
            name: "toy",
            main: vec![
                TableSlot::Interval(100, 110),
                TableSlot::Bit,
                TableSlot::Interval(5, 6),
                TableSlot::End,
            ],
            zero: vec![TableSlot::Interval(10, 20), TableSlot::Interval(-10, -20), TableSlot::End],
            one: vec![TableSlot::Interval(10, 20), TableSlot::Interval(-40, -50), TableSlot::End],
            max: 110,
        }
    }

    #[test]
    fn drive_completes_a_full_frame() {
        let protocol = toy_protocol();
        let mut state = ParserState::new();
        assert_eq!(drive(&protocol, &mut state, 105), None);
        assert_eq!(drive(&protocol, &mut state, 15), None);
        assert_eq!(drive(&protocol, &mut state, -15), None);
        assert_eq!(drive(&protocol, &mut state, 5), Some(0));
    }

    #[test]
    fn runner_decodes_a_real_nec_frame() {
        let mut runner = Runner::new();
        let device = 0x04i32;
        let function = 0x08i32;
        let mut sequence = vec![400, -200];
        for bit_index in 0..8 {
            push_nec_bit(&mut sequence, (device >> bit_index) & 1 == 1);
        }
        for bit_index in 0..8 {
            push_nec_bit(&mut sequence, (!device >> bit_index) & 1 == 1);
        }
        for bit_index in 0..8 {
            push_nec_bit(&mut sequence, (function >> bit_index) & 1 == 1);
        }
        for bit_index in 0..8 {
            push_nec_bit(&mut sequence, (!function >> bit_index) & 1 == 1);
        }
        sequence.push(25);

        let mut decoded = None;
        for value in sequence {
            if let Some(key) = runner.feed(value) {
                decoded = Some(key);
                break;
            }
        }
        let key = decoded.expect("expected a decoded NEC key");
        assert_eq!(key.protocol, ProtocolId::Nec);
    }

    fn push_nec_bit(sequence: &mut Vec<i32>, bit: bool) {
        sequence.push(25);
        sequence.push(if bit { -75 } else { -25 });
    }
}
