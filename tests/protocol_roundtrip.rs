//! Black-box round-trip coverage: a hand-built run-length sequence for
//! each protocol, matching the encoder's own pulse shapes and the wire
//! bit order [`decode`] expects, fed straight through [`Runner`] as the
//! real receive pipeline would deliver it.

use irsound::key::ProtocolId;
use irsound::runner::Runner;

fn push_nec_bit(seq: &mut Vec<i32>, bit: bool) {
    seq.push(25);
    seq.push(if bit { -75 } else { -25 });
}

fn push_sharp_bit(seq: &mut Vec<i32>, bit: bool) {
    seq.push(13);
    seq.push(if bit { -78 } else { -33 });
}

fn push_sony_bit(seq: &mut Vec<i32>, bit: bool) {
    seq.push(-25);
    seq.push(if bit { 53 } else { 25 });
}

fn push_rc5_bit(seq: &mut Vec<i32>, bit: bool) {
    if bit {
        seq.push(-40);
        seq.push(40);
    } else {
        seq.push(40);
        seq.push(-40);
    }
}

fn decode_first(sequence: Vec<i32>) -> Option<irsound::Key> {
    let mut runner = Runner::new();
    for value in sequence {
        if let Some(key) = runner.feed(value) {
            return Some(key);
        }
    }
    None
}

#[test]
fn nec_frame_decodes_device_and_function() {
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

    let key = decode_first(sequence).expect("expected a decoded NEC key");
    assert_eq!(key.protocol, ProtocolId::Nec);
    assert_eq!(key.device, 0x04);
    assert_eq!(key.subdevice, -1);
    assert_eq!(key.function, 0x08);
    assert_eq!(key.subfunction, -1);
    assert!(!key.repeat);
}

#[test]
fn nec_repeat_frame_decodes_as_a_repeat_with_no_payload() {
    let sequence = vec![400, -100, 25];
    let key = decode_first(sequence).expect("expected a decoded NEC repeat key");
    assert_eq!(key.protocol, ProtocolId::NecRepeat);
    assert!(key.repeat);
}

#[test]
fn sharp_frame_decodes_device_and_function() {
    let device = 0x03i32;
    let function = 0x10i32;
    let mut sequence = Vec::new();
    for bit_index in 0..5 {
        push_sharp_bit(&mut sequence, (device >> bit_index) & 1 == 1);
    }
    for bit_index in 0..8 {
        push_sharp_bit(&mut sequence, (function >> bit_index) & 1 == 1);
    }
    // The 14th bit is the fresh/complemented-repeat marker; 1 means this
    // is the plain (non-complemented) frame.
    push_sharp_bit(&mut sequence, true);
    sequence.push(13); // trailing mark that closes the frame

    let key = decode_first(sequence).expect("expected a decoded Sharp key");
    assert_eq!(key.protocol, ProtocolId::Sharp);
    assert_eq!(key.device, 0x03);
    assert_eq!(key.function, 0x10);
    assert!(!key.repeat);
}

#[test]
fn sharp_complemented_frame_decodes_as_a_repeat_and_uncomplements_the_function() {
    let device = 0x03i32;
    let function = 0x10i32;
    let complemented = !function & 0xFF;
    let mut sequence = Vec::new();
    for bit_index in 0..5 {
        push_sharp_bit(&mut sequence, (device >> bit_index) & 1 == 1);
    }
    for bit_index in 0..8 {
        push_sharp_bit(&mut sequence, (complemented >> bit_index) & 1 == 1);
    }
    // Marker 0 means this frame carries the complemented function.
    push_sharp_bit(&mut sequence, false);
    sequence.push(13);

    let key = decode_first(sequence).expect("expected a decoded Sharp key");
    assert_eq!(key.protocol, ProtocolId::Sharp);
    assert_eq!(key.device, 0x03);
    assert_eq!(key.function, 0x10);
    assert!(key.repeat);
}

#[test]
fn sony20_frame_decodes_device_subdevice_and_function() {
    let device = 0x1Fi32;
    let subdevice = 0x00i32;
    let function = 0x15i32;
    let mut sequence = vec![100];
    for bit_index in 0..7 {
        push_sony_bit(&mut sequence, (function >> bit_index) & 1 == 1);
    }
    for bit_index in 0..5 {
        push_sony_bit(&mut sequence, (device >> bit_index) & 1 == 1);
    }
    for bit_index in 0..8 {
        push_sony_bit(&mut sequence, (subdevice >> bit_index) & 1 == 1);
    }

    let key = decode_first(sequence).expect("expected a decoded Sony20 key");
    assert_eq!(key.protocol, ProtocolId::Sony20);
    assert_eq!(key.device, 0x1F);
    assert_eq!(key.subdevice, 0x00);
    assert_eq!(key.function, 0x15);
}

#[test]
fn sony12_frame_decodes_device_and_function_with_no_subdevice() {
    let device = 0x05i32;
    let function = 0x15i32;
    let mut sequence = vec![100];
    for bit_index in 0..7 {
        push_sony_bit(&mut sequence, (function >> bit_index) & 1 == 1);
    }
    for bit_index in 0..5 {
        push_sony_bit(&mut sequence, (device >> bit_index) & 1 == 1);
    }

    let key = decode_first(sequence).expect("expected a decoded Sony12 key");
    assert_eq!(key.protocol, ProtocolId::Sony12);
    assert_eq!(key.device, 0x05);
    assert_eq!(key.subdevice, -1);
    assert_eq!(key.function, 0x15);
}

#[test]
fn rc5_frame_decodes_device_and_function() {
    let device = 0x05i32;
    let function = 0x36i32;
    let mut sequence = vec![40];
    for bit_index in 0..6 {
        push_rc5_bit(&mut sequence, (function >> bit_index) & 1 == 1);
    }
    for bit_index in 0..5 {
        push_rc5_bit(&mut sequence, (device >> bit_index) & 1 == 1);
    }
    push_rc5_bit(&mut sequence, false); // toggle
    push_rc5_bit(&mut sequence, false); // unread trailing bit

    let key = decode_first(sequence).expect("expected a decoded RC5 key");
    assert_eq!(key.protocol, ProtocolId::Rc5);
    assert_eq!(key.device, 0x05);
    assert_eq!(key.function, 0x36);
}
