//! Section/key layout of `.osu` text documents
//!
//! A document is a list of bracketed sections (`[Metadata]`), each holding
//! `Key: Value` entries or bare lines (hit objects, timing points, events).
//! Lines before the first header (the `osu file format vN` line) belong to an
//! unnamed top-level section.
//!
//! `//` starts a comment only at the start of a line or after whitespace, so
//! `Source: https://example.com` keeps its URL while `Creator: abc // note`
//! drops the note. `abc//def` is kept as is.

use std::io::BufRead;

use crate::error::Result;

/// Marker that starts a comment running to the end of the line
const COMMENT_MARKER: &str = "//";

/// One non-empty line of a section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Text before the first `:`, or the whole line for bare entries
    pub key: String,
    /// Text after the first `:`; `None` for bare entries
    pub value: Option<String>,
    /// The trimmed line with comments removed
    pub raw: String,
}

/// A bracketed section and its entries in file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub entries: Vec<Entry>,
}

impl Section {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Value of the first entry with this key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .and_then(|e| e.value.as_deref())
    }
}

/// A parsed `.osu` document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsuDocument {
    sections: Vec<Section>,
}

impl OsuDocument {
    /// Parse a document from a complete string
    pub fn parse(text: &str) -> Self {
        let mut document = Self {
            sections: vec![Section::new("")],
        };
        for line in text.lines() {
            document.push_line(line);
        }
        document
    }

    /// Parse a document line by line from a buffered reader.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD.
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut document = Self {
            sections: vec![Section::new("")],
        };
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            document.push_line(&String::from_utf8_lossy(&line));
        }
        Ok(document)
    }

    fn push_line(&mut self, line: &str) {
        let line = strip_comment(line.trim_start_matches('\u{feff}')).trim();
        if line.is_empty() {
            return;
        }

        if line.starts_with('[') && line.ends_with(']') && line.len() >= 2 {
            let name = line[1..line.len() - 1].trim();
            self.sections.push(Section::new(name));
            return;
        }

        let entry = match line.split_once(':') {
            Some((key, value)) => Entry {
                key: key.trim().to_string(),
                value: Some(value.trim().to_string()),
                raw: line.to_string(),
            },
            None => Entry {
                key: line.to_string(),
                value: None,
                raw: line.to_string(),
            },
        };

        // The top-level section is always present, so there is a last section
        if let Some(section) = self.sections.last_mut() {
            section.entries.push(entry);
        }
    }

    /// All sections, including the unnamed top-level one
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// First section with the given name
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Value of `key` inside section `section`
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    /// Entries of every section named `section`, in file order
    pub fn entries<'a>(&'a self, section: &'a str) -> impl Iterator<Item = &'a Entry> + 'a {
        self.sections
            .iter()
            .filter(move |s| s.name == section)
            .flat_map(|s| s.entries.iter())
    }
}

/// Cut a line at its comment marker.
///
/// The marker only counts at the start of the line or after whitespace, so
/// values such as `Source:http://example.com` survive.
fn strip_comment(line: &str) -> &str {
    let mut search_from = 0;
    while let Some(offset) = line[search_from..].find(COMMENT_MARKER) {
        let index = search_from + offset;
        let at_boundary = line[..index]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace);
        if at_boundary {
            return &line[..index];
        }
        search_from = index + COMMENT_MARKER.len();
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\u{feff}osu file format v14

[General]
AudioFilename: audio.mp3
// full line comment
Mode: 0 // trailing comment

[Metadata]
Source:http://example.com
Title:  Padded

[HitObjects]
256,192,1000,1,0,0:0:0:0:
  64,64,1500,5,0
";

    #[test]
    fn test_top_level_section() {
        let doc = OsuDocument::parse(SAMPLE);
        let top = &doc.sections()[0];
        assert_eq!(top.name, "");
        assert_eq!(top.entries.len(), 1);
        assert_eq!(top.entries[0].key, "osu file format v14");
        assert_eq!(top.entries[0].value, None);
    }

    #[test]
    fn test_key_values_and_comments() {
        let doc = OsuDocument::parse(SAMPLE);
        assert_eq!(doc.get("General", "AudioFilename"), Some("audio.mp3"));
        assert_eq!(doc.get("General", "Mode"), Some("0"));
        assert_eq!(doc.section("General").map(|s| s.entries.len()), Some(2));
        assert_eq!(doc.get("Metadata", "Source"), Some("http://example.com"));
        assert_eq!(doc.get("Metadata", "Title"), Some("Padded"));
        assert_eq!(doc.get("Metadata", "Missing"), None);
        assert_eq!(doc.get("Missing", "Title"), None);
    }

    #[test]
    fn test_bare_entries_keep_raw_line() {
        let doc = OsuDocument::parse(SAMPLE);
        let raws: Vec<&str> = doc.entries("HitObjects").map(|e| e.raw.as_str()).collect();
        assert_eq!(raws, vec!["256,192,1000,1,0,0:0:0:0:", "64,64,1500,5,0"]);
    }

    #[test]
    fn test_from_reader_matches_parse() {
        let doc = OsuDocument::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(doc, OsuDocument::parse(SAMPLE));
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("// all"), "");
        assert_eq!(strip_comment("a: b // c"), "a: b ");
        assert_eq!(strip_comment("a:http://x"), "a:http://x");
        assert_eq!(strip_comment("a:http://x //c"), "a:http://x ");
    }

    #[test]
    fn test_comment_needs_leading_whitespace() {
        let doc = OsuDocument::parse("[Metadata]\nCreator:abc//def\nVersion:Hard // old name\n");
        assert_eq!(doc.get("Metadata", "Creator"), Some("abc//def"));
        assert_eq!(doc.get("Metadata", "Version"), Some("Hard"));
    }

    #[test]
    fn test_from_reader_replaces_invalid_utf8() {
        let doc = OsuDocument::from_reader(&b"[Metadata]\r\nArtist:\xE9t\xE9\r\n"[..]).unwrap();
        assert_eq!(doc.get("Metadata", "Artist"), Some("\u{fffd}t\u{fffd}"));
    }
}
