//! Decoded remote-control button identifier and its textual form.

use std::fmt;
use std::str::FromStr;

/// One of the six protocols this crate understands, plus the repeat-frame
/// variants of the two NEC flavors (Sharp, Sony and RC5 fold their repeat
/// semantics into the ordinary frame instead of a distinct wire format).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolId {
    Nec,
    NecRepeat,
    Nec2,
    Nec2Repeat,
    Sharp,
    Sony12,
    Sony20,
    Rc5,
}

impl ProtocolId {
    pub const ALL: [ProtocolId; 8] = [
        ProtocolId::Nec,
        ProtocolId::NecRepeat,
        ProtocolId::Nec2,
        ProtocolId::Nec2Repeat,
        ProtocolId::Sharp,
        ProtocolId::Sony12,
        ProtocolId::Sony20,
        ProtocolId::Rc5,
    ];

    pub fn token(self) -> &'static str {
        match self {
            ProtocolId::Nec => "nec",
            ProtocolId::NecRepeat => "necrepeat",
            ProtocolId::Nec2 => "nec2",
            ProtocolId::Nec2Repeat => "nec2repeat",
            ProtocolId::Sharp => "sharp",
            ProtocolId::Sony12 => "sony12",
            ProtocolId::Sony20 => "sony20",
            ProtocolId::Rc5 => "rc5",
        }
    }
}

impl fmt::Display for ProtocolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ProtocolId {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProtocolId::ALL
            .into_iter()
            .find(|p| p.token() == s)
            .ok_or_else(|| KeyParseError::UnknownProtocol(s.to_string()))
    }
}

/// A decoded (or to-be-encoded) remote button: protocol plus the device /
/// function numbers it addresses. `-1` in any numeric field means "not
/// present" (e.g. NEC's subdevice when it is just the complement of
/// device, or Sony12's absent subdevice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub protocol: ProtocolId,
    pub device: i32,
    pub subdevice: i32,
    pub function: i32,
    pub subfunction: i32,
    pub repeat: bool,
}

impl Key {
    pub fn new(protocol: ProtocolId, device: i32, function: i32) -> Self {
        Key { protocol, device, subdevice: -1, function, subfunction: -1, repeat: false }
    }

    /// Equality that optionally ignores the `repeat` flag, matching the
    /// two comparison modes the layout tool and the decoder both need.
    pub fn equals(&self, other: &Key, compare_repeat: bool) -> bool {
        self.protocol == other.protocol
            && self.device == other.device
            && self.subdevice == other.subdevice
            && self.function == other.function
            && self.subfunction == other.subfunction
            && (!compare_repeat || self.repeat == other.repeat)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyParseError {
    #[error("unknown protocol: {0}")]
    UnknownProtocol(String),
    #[error("missing field in key string: {0}")]
    MissingField(&'static str),
    #[error("invalid number: {0}")]
    InvalidNumber(String),
}

fn parse_number(s: &str) -> Result<i32, KeyParseError> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        i32::from_str_radix(hex, 16).map_err(|_| KeyParseError::InvalidNumber(s.to_string()))
    } else {
        s.parse::<i32>().map_err(|_| KeyParseError::InvalidNumber(s.to_string()))
    }
}

/// Parse `protocol,device[-subdevice],function[-subfunction][,[repeat]]`
/// using the given field separator and device/function sub-separator.
pub fn string_to_key(s: &str, sep: char, subsep: char) -> Result<Key, KeyParseError> {
    let mut fields = s.split(sep);
    let protocol: ProtocolId = fields
        .next()
        .ok_or(KeyParseError::MissingField("protocol"))?
        .trim()
        .parse()?;
    let device_field = fields.next().ok_or(KeyParseError::MissingField("device"))?.trim();
    let (device, subdevice) = split_sub(device_field, subsep)?;
    let function_field = fields.next().ok_or(KeyParseError::MissingField("function"))?.trim();
    let (function, subfunction) = split_sub(function_field, subsep)?;
    let repeat = matches!(fields.next(), Some(tail) if !tail.trim().is_empty());

    Ok(Key { protocol, device, subdevice, function, subfunction, repeat })
}

fn split_sub(field: &str, subsep: char) -> Result<(i32, i32), KeyParseError> {
    match field.split_once(subsep) {
        Some((main, sub)) => Ok((parse_number(main)?, parse_number(sub)?)),
        None => Ok((parse_number(field)?, -1)),
    }
}

fn append_code(out: &mut String, code: i32, sub: i32, subsep: char) {
    if code <= 0xFF {
        out.push_str(&format!("0x{:02X}", code));
    } else {
        out.push_str(&format!("0x{:04X}", code));
    }
    if sub >= 0 {
        out.push(subsep);
        if sub <= 0xFF {
            out.push_str(&format!("0x{:02X}", sub));
        } else {
            out.push_str(&format!("0x{:04X}", sub));
        }
    }
}

/// Format a key back to its textual form; the inverse of [`string_to_key`].
pub fn key_to_string(key: &Key, sep: char, subsep: char) -> String {
    let mut out = String::new();
    out.push_str(key.protocol.token());
    out.push(sep);
    append_code(&mut out, key.device, key.subdevice, subsep);
    out.push(sep);
    append_code(&mut out, key.function, key.subfunction, subsep);
    if key.repeat {
        out.push(sep);
        out.push_str("repeat");
    }
    out
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&key_to_string(self, ',', '-'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_simple_nec_key() {
        let key = string_to_key("nec,0x04,0x08", ',', '-').unwrap();
        assert_eq!(key.protocol, ProtocolId::Nec);
        assert_eq!(key.device, 0x04);
        assert_eq!(key.subdevice, -1);
        assert_eq!(key.function, 0x08);
        assert!(!key.repeat);
    }

    #[test]
    fn parses_device_and_function_subfields() {
        let key = string_to_key("sony20,0x1f-0x00,0x15", ',', '-').unwrap();
        assert_eq!(key.device, 0x1f);
        assert_eq!(key.subdevice, 0x00);
        assert_eq!(key.function, 0x15);
    }

    #[test]
    fn parses_trailing_repeat_marker() {
        let key = string_to_key("nec,0x04,0x08,repeat", ',', '-').unwrap();
        assert!(key.repeat);
    }

    #[test]
    fn round_trips_through_format_and_parse() {
        let key = Key::new(ProtocolId::Rc5, 0x05, 0x36);
        let formatted = key_to_string(&key, ',', '-');
        let parsed = string_to_key(&formatted, ',', '-').unwrap();
        assert!(parsed.equals(&key, true));
    }

    #[test]
    fn rejects_unknown_protocol() {
        assert!(matches!(
            string_to_key("xyz,1,2", ',', '-'),
            Err(KeyParseError::UnknownProtocol(_))
        ));
    }

    #[test]
    fn equals_can_ignore_repeat() {
        let a = Key { repeat: true, ..Key::new(ProtocolId::Nec, 1, 2) };
        let b = Key { repeat: false, ..Key::new(ProtocolId::Nec, 1, 2) };
        assert!(a.equals(&b, false));
        assert!(!a.equals(&b, true));
    }
}
