//! Flat key/value reader for skin `pad.ini` files
//!
//! ```text
//! [INFO]
//! name=Classic
//!
//! [MASK_COLOR]
//! a=16711680
//! scancode_9=123456
//!
//! [Buttons]
//! info=buttons
//! x=80
//! y=50
//! ```
//!
//! Sections and keys keep file order. Keys that appear before the first
//! header land in the sectionless pseudo-section. A repeated key replaces
//! the earlier value in place; a repeated header continues the existing
//! section. Lines that are neither a header nor `key=value` are ignored.

use std::path::Path;

/// Name under which keys appearing before any `[section]` header are stored
pub const SECTIONLESS: &str = "";

/// One `[section]` of an ini file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniSection {
    entries: Vec<(String, String)>,
}

impl IniSection {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Entries in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parsed ini document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PadIni {
    sections: Vec<(String, IniSection)>,
}

impl PadIni {
    /// Parse ini text. Parsing never fails; malformed lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut ini = PadIni::default();
        let mut current = SECTIONLESS.to_string();

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                current = name.trim().to_string();
                ini.section_mut(&current);
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                ini.section_mut(&current).set(key, value.trim());
            }
        }

        ini
    }

    /// Read and parse an ini file
    pub fn read(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    pub fn section_mut(&mut self, name: &str) -> &mut IniSection {
        let index = match self.sections.iter().position(|(n, _)| n == name) {
            Some(index) => index,
            None => {
                self.sections.push((name.to_string(), IniSection::default()));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index].1
    }

    /// Look up a single value
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    /// Sections in file order
    pub fn sections(&self) -> impl Iterator<Item = (&str, &IniSection)> {
        self.sections.iter().map(|(n, s)| (n.as_str(), s))
    }
}
