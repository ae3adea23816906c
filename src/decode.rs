//! Turns a protocol's raw accumulated `encoding` bits into a [`Key`].
//!
//! Each protocol packs device/function into the bit stream differently;
//! these functions mirror the per-protocol `*key` extraction this project
//! is grounded on, one per protocol.

use crate::key::{Key, ProtocolId};

fn reverse32(encoding: u32) -> u32 {
    encoding.reverse_bits()
}

/// NEC and NEC2 both transmit device, ~device, function, ~function as four
/// LSB-first bytes; subdevice is omitted (-1) when it is exactly the
/// complement of device.
fn nec_like_key(protocol: ProtocolId, encoding: u32) -> Key {
    let reversed = reverse32(encoding);
    let device = (reversed & 0xFF) as i32;
    let subdevice_raw = ((reversed >> 8) & 0xFF) as i32;
    let function = ((reversed >> 16) & 0xFF) as i32;
    let subfunction_raw = ((reversed >> 24) & 0xFF) as i32;

    let subdevice = if subdevice_raw == (!device & 0xFF) { -1 } else { subdevice_raw };
    let subfunction = if subfunction_raw == (!function & 0xFF) { -1 } else { subfunction_raw };

    Key { protocol, device, subdevice, function, subfunction, repeat: false }
}

pub fn nec_key(encoding: u32) -> Key {
    nec_like_key(ProtocolId::Nec, encoding)
}

pub fn nec2_key(encoding: u32) -> Key {
    nec_like_key(ProtocolId::Nec2, encoding)
}

/// NEC's dedicated repeat frame carries no payload; the caller supplies
/// the device/function of the frame it is repeating.
pub fn nec_repeat_key(protocol: ProtocolId, device: i32, function: i32) -> Key {
    Key { protocol, device, subdevice: -1, function, subfunction: -1, repeat: true }
}

/// Sharp packs a 5-bit device and 8-bit function first-bit-first; the
/// marker distinguishing a fresh frame from its complemented repeat is
/// the raw (unreversed) stream's very first bit.
pub fn sharp_key(encoding: u32) -> Key {
    let reversed = encoding.reverse_bits() >> (32 - 14);
    let device = (reversed & 0x1F) as i32;
    let mut function = ((reversed >> 5) & 0xFF) as i32;
    let marker = encoding & 0x1;
    let repeat = marker == 0;
    if repeat {
        function = !function & 0xFF;
    }
    Key { protocol: ProtocolId::Sharp, device, subdevice: -1, function, subfunction: -1, repeat }
}

fn sony_key(protocol: ProtocolId, encoding: u32, bits: u32) -> Key {
    let reversed = encoding.reverse_bits() >> (32 - bits);
    let function = (reversed & 0x7F) as i32;
    let device = ((reversed >> 7) & 0x1F) as i32;
    let subdevice = if bits >= 20 { ((reversed >> 12) & 0xFF) as i32 } else { -1 };
    Key { protocol, device, subdevice, function, subfunction: -1, repeat: false }
}

pub fn sony12_key(encoding: u32) -> Key {
    sony_key(ProtocolId::Sony12, encoding, 12)
}

pub fn sony20_key(encoding: u32) -> Key {
    sony_key(ProtocolId::Sony20, encoding, 20)
}

/// RC5 is biphase-coded: two leading "1" start bits, a toggle bit, a
/// 5-bit device and a 6-bit function.
pub fn rc5_key(encoding: u32) -> Key {
    let reversed = encoding.reverse_bits() >> (32 - 13);
    let function = (reversed & 0x3F) as i32;
    let device = ((reversed >> 6) & 0x1F) as i32;
    let toggle = (reversed >> 11) & 0x1;
    // The toggle bit distinguishes a fresh press from the auto-repeat of
    // a held button; whether a given frame is a "repeat" depends on
    // whether the toggle matches the previous frame's, which is session
    // state the parser does not have. The runner decides `repeat` by
    // comparing against the last RC5 toggle it saw (see DESIGN.md).
    let _ = toggle;
    Key { protocol: ProtocolId::Rc5, device, subdevice: -1, function, subfunction: -1, repeat: false }
}

/// Extract the toggle bit alone, used by the runner's RC5 repeat
/// tracking.
pub fn rc5_toggle(encoding: u32) -> u32 {
    let reversed = encoding.reverse_bits() >> (32 - 13);
    (reversed >> 11) & 0x1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nec_key_recovers_device_and_function() {
        let device = 0x04u32;
        let function = 0x08u32;
        let encoding_lsb_first =
            device | ((!device & 0xFF) << 8) | (function << 16) | ((!function & 0xFF) << 24);
        let encoding = encoding_lsb_first.reverse_bits();
        let key = nec_key(encoding);
        assert_eq!(key.device, 0x04);
        assert_eq!(key.subdevice, -1);
        assert_eq!(key.function, 0x08);
        assert_eq!(key.subfunction, -1);
    }

    #[test]
    fn nec_key_keeps_subdevice_when_not_a_complement() {
        let device = 0x04u32;
        let subdevice = 0x99u32;
        let function = 0x08u32;
        let encoding_lsb_first = device | (subdevice << 8) | (function << 16) | (0x00 << 24);
        let encoding = encoding_lsb_first.reverse_bits();
        let key = nec_key(encoding);
        assert_eq!(key.subdevice, 0x99);
    }
}
