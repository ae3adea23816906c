//! The remote layout: a free-form text file mapping human-readable names
//! to decoded keys. A *word* is a maximal run of non-whitespace
//! characters, either `NAME` alone or `NAME|CODE`. Runs of spaces and
//! single newlines between words are filler, preserved verbatim on
//! write so hand-edited layouts keep their formatting.

use std::fmt::Write as _;

use crate::key::{key_to_string, string_to_key, Key, KeyParseError};

/// One element of a layout file, in file order.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// A run of whitespace (spaces or a single newline) exactly as read.
    Filler(String),
    /// A named key, with or without a decoded code attached yet.
    Named { name: String, key: Option<Key> },
}

#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub entries: Vec<Entry>,
}

impl Layout {
    pub fn new() -> Self {
        Layout::default()
    }

    /// Parse a layout file's full text.
    pub fn parse(text: &str) -> Result<Self, KeyParseError> {
        let mut entries = Vec::new();
        let mut chars = text.chars().peekable();
        let mut filler = String::new();

        while let Some(&c) = chars.peek() {
            if c == ' ' || c == '\n' {
                // Collapse nothing: keep exact runs, but a run mixing
                // spaces and newlines still counts as one filler token.
                filler.push(c);
                chars.next();
                continue;
            }
            if !filler.is_empty() {
                entries.push(Entry::Filler(std::mem::take(&mut filler)));
            }
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if c == ' ' || c == '\n' {
                    break;
                }
                word.push(c);
                chars.next();
            }
            entries.push(parse_word(&word)?);
        }
        if !filler.is_empty() {
            entries.push(Entry::Filler(filler));
        }
        Ok(Layout { entries })
    }

    /// Render the layout back to text, byte-for-byte reproducible for an
    /// unmodified layout.
    pub fn write(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            match entry {
                Entry::Filler(s) => out.push_str(s),
                Entry::Named { name, key } => {
                    out.push_str(name);
                    if let Some(key) = key {
                        out.push('|');
                        out.push_str(&key_to_string(key, ',', '-'));
                    }
                }
            }
        }
        out
    }

    /// Look up a named key by name.
    pub fn get(&self, name: &str) -> Option<&Key> {
        self.entries.iter().find_map(|e| match e {
            Entry::Named { name: n, key: Some(k) } if n == name => Some(k),
            _ => None,
        })
    }

    /// Set (or replace) the key bound to `name`. Returns `false` if no
    /// such name exists in the layout.
    pub fn set(&mut self, name: &str, key: Key) -> bool {
        for entry in &mut self.entries {
            if let Entry::Named { name: n, key: k } = entry {
                if n == name {
                    *k = Some(key);
                    return true;
                }
            }
        }
        false
    }

    /// Find the name bound to a key, comparing with the given repeat
    /// sensitivity — the lookup the decoder uses to turn a `Key` back
    /// into a button name.
    pub fn name_for(&self, key: &Key, compare_repeat: bool) -> Option<&str> {
        self.entries.iter().find_map(|e| match e {
            Entry::Named { name, key: Some(k) } if k.equals(key, compare_repeat) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Render a CSV summary (`name,protocol,device,subdevice,function,subfunction`)
    /// of every named key that already has a code, one per line.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            if let Entry::Named { name, key: Some(key) } = entry {
                let _ = writeln!(
                    out,
                    "{},{},{},{},{},{}",
                    name, key.protocol, key.device, key.subdevice, key.function, key.subfunction
                );
            }
        }
        out
    }
}

fn parse_word(word: &str) -> Result<Entry, KeyParseError> {
    match word.split_once('|') {
        Some((name, code)) => {
            let key = string_to_key(code, ',', '-')?;
            Ok(Entry::Named { name: name.to_string(), key: Some(key) })
        }
        None => Ok(Entry::Named { name: word.to_string(), key: None }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::ProtocolId;

    #[test]
    fn parses_names_without_codes() {
        let layout = Layout::parse("power\nvolup voldown\n").unwrap();
        assert_eq!(layout.get("power"), None);
        assert!(layout.entries.iter().any(
            |e| matches!(e, Entry::Named { name, key: None } if name == "power")
        ));
    }

    #[test]
    fn parses_names_with_codes_and_looks_them_up() {
        let layout = Layout::parse("power|nec,0x04,0x08\n").unwrap();
        let key = layout.get("power").unwrap();
        assert_eq!(key.protocol, ProtocolId::Nec);
        assert_eq!(key.device, 0x04);
        assert_eq!(key.function, 0x08);
    }

    #[test]
    fn write_reproduces_the_original_text_byte_for_byte() {
        let text = "power|nec,0x04,0x08\n\nvolup  voldown\n";
        let layout = Layout::parse(text).unwrap();
        assert_eq!(layout.write(), text);
    }

    #[test]
    fn set_replaces_an_existing_names_key() {
        let mut layout = Layout::parse("power\n").unwrap();
        let key = Key::new(ProtocolId::Rc5, 5, 9);
        assert!(layout.set("power", key));
        assert!(layout.get("power").unwrap().equals(&key, true));
    }

    #[test]
    fn set_on_an_unknown_name_fails() {
        let mut layout = Layout::parse("power\n").unwrap();
        let key = Key::new(ProtocolId::Rc5, 5, 9);
        assert!(!layout.set("missing", key));
    }

    #[test]
    fn name_for_finds_the_button_a_key_belongs_to() {
        let layout = Layout::parse("power|nec,0x04,0x08\n").unwrap();
        let key = Key::new(ProtocolId::Nec, 0x04, 0x08);
        assert_eq!(layout.name_for(&key, false), Some("power"));
    }

    #[test]
    fn csv_export_includes_only_bound_keys() {
        let layout = Layout::parse("power|nec,0x04,0x08\nmystery\n").unwrap();
        let csv = layout.to_csv();
        assert!(csv.contains("power,nec"));
        assert!(!csv.contains("mystery"));
    }
}
