//! Interval tables for the six protocols this crate decodes, in units of
//! 10 microseconds. Values are cross-checked against the static C
//! initializers this project's parser is grounded on.

use crate::protocol::{Protocol, Slot};
use crate::key::ProtocolId;

fn bits(n: usize) -> Vec<Slot> {
    vec![Slot::Bit; n]
}

fn nec_like(lead: (i32, i32), separator: (i32, i32), max: i32) -> Protocol {
    let mut main = vec![Slot::Interval(lead.0, lead.1), Slot::Interval(separator.0, separator.1)];
    main.extend(bits(32));
    main.push(Slot::Interval(20, 30));
    main.push(Slot::End);
    Protocol {
        name: "nec-like",
        main,
        zero: vec![Slot::Interval(20, 30), Slot::Interval(-20, -30), Slot::End],
        one: vec![Slot::Interval(20, 30), Slot::Interval(-70, -80), Slot::End],
        max,
    }
}

fn nec_repeat_like(lead: (i32, i32), max: i32) -> Protocol {
    Protocol {
        name: "nec-repeat-like",
        main: vec![
            Slot::Interval(lead.0, lead.1),
            Slot::Interval(-90, -110),
            Slot::Interval(20, 30),
            Slot::End,
        ],
        zero: vec![Slot::End],
        one: vec![Slot::End],
        max,
    }
}

fn nec() -> Protocol {
    Protocol { name: "nec", ..nec_like((380, 430), (-180, -220), 430) }
}

fn nec_repeat() -> Protocol {
    Protocol { name: "necrepeat", ..nec_repeat_like((380, 430), 430) }
}

fn nec2() -> Protocol {
    Protocol { name: "nec2", ..nec_like((180, 220), (-180, -220), 220) }
}

fn nec2_repeat() -> Protocol {
    Protocol { name: "nec2repeat", ..nec_repeat_like((180, 220), 220) }
}

fn sharp() -> Protocol {
    let mut main = bits(14);
    main.push(Slot::Interval(8, 18));
    main.push(Slot::End);
    Protocol {
        name: "sharp",
        main,
        zero: vec![Slot::Interval(8, 18), Slot::Interval(-28, -38), Slot::End],
        one: vec![Slot::Interval(8, 18), Slot::Interval(-73, -82), Slot::End],
        max: 73,
    }
}

fn sony(bit_count: usize, max: i32) -> Protocol {
    let mut main = vec![Slot::Interval(90, 120)];
    main.extend(bits(bit_count));
    main.push(Slot::End);
    Protocol {
        name: "sony",
        main,
        zero: vec![Slot::Interval(-20, -32), Slot::Interval(20, 32), Slot::End],
        one: vec![Slot::Interval(-20, -32), Slot::Interval(48, 58), Slot::End],
        max,
    }
}

fn sony12() -> Protocol {
    Protocol { name: "sony12", ..sony(12, 120) }
}

fn sony20() -> Protocol {
    Protocol { name: "sony20", ..sony(20, 120) }
}

fn rc5() -> Protocol {
    let mut main = vec![Slot::Interval(35, 45)];
    main.extend(bits(13));
    main.push(Slot::End);
    Protocol {
        name: "rc5",
        main,
        zero: vec![Slot::Interval(35, 45), Slot::Interval(-35, -45), Slot::End],
        one: vec![Slot::Interval(-35, -45), Slot::Interval(35, 45), Slot::End],
        max: 90,
    }
}

/// Build the (protocol id, table) pairs in the dispatch order the
/// multi-protocol runner tries them.
pub fn all() -> Vec<(ProtocolId, Protocol)> {
    vec![
        (ProtocolId::Nec, nec()),
        (ProtocolId::NecRepeat, nec_repeat()),
        (ProtocolId::Nec2, nec2()),
        (ProtocolId::Nec2Repeat, nec2_repeat()),
        (ProtocolId::Sharp, sharp()),
        (ProtocolId::Sony12, sony12()),
        (ProtocolId::Sony20, sony20()),
        (ProtocolId::Rc5, rc5()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_protocol_table_ends_with_end() {
        for (_, protocol) in all() {
            assert_eq!(*protocol.main.last().unwrap(), Slot::End);
            assert_eq!(*protocol.zero.last().unwrap(), Slot::End);
            assert_eq!(*protocol.one.last().unwrap(), Slot::End);
        }
    }

    #[test]
    fn nec_has_thirty_two_bit_slots() {
        let protocol = nec();
        let bit_slots = protocol.main.iter().filter(|s| **s == Slot::Bit).count();
        assert_eq!(bit_slots, 32);
    }

    #[test]
    fn rc5_has_thirteen_bit_slots() {
        let protocol = rc5();
        let bit_slots = protocol.main.iter().filter(|s| **s == Slot::Bit).count();
        assert_eq!(bit_slots, 13);
    }
}
