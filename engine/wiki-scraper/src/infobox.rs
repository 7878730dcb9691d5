//! Key/value extraction from the infobox section of a player page
//!
//! Grammar, applied line by line:
//!
//! ```text
//! field := '|' ws* key ws* '=' value
//! key   := [A-Za-z0-9_]+
//! value := everything up to the end of the line
//! ```
//!
//! The first occurrence of a key wins. Once a field is recognised the rest
//! of its line belongs to the value, so a line holds at most one field.

use crate::dates::parse_birth_date;
use player_roster::PlayerRecord;

/// Infobox key holding the player's handle
pub const HANDLE_KEY: &str = "id";
/// Infobox key holding the player's real name
pub const NAME_KEY: &str = "name";
/// Infobox key holding the date of birth
pub const BIRTH_DATE_KEY: &str = "birth_date";

const INLINE_WS: &[char] = &[' ', '\t'];

/// The three fields the collector cares about, as raw text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoboxFields {
    pub id: Option<String>,
    pub name: Option<String>,
    pub birth_date: Option<String>,
}

impl InfoboxFields {
    /// Build a roster record; `None` if neither handle nor name is declared
    pub fn into_record(self) -> Option<PlayerRecord> {
        let date_of_birth = self.birth_date.as_deref().and_then(parse_birth_date);
        let record = PlayerRecord::new(self.id, self.name, date_of_birth);
        record.is_identifiable().then_some(record)
    }
}

/// Every `key = value` field in document order
pub fn parse_fields(content: &str) -> Vec<(&str, &str)> {
    content.lines().filter_map(parse_line).collect()
}

/// Extract handle, name and birth date from page wikitext
pub fn extract_fields(content: &str) -> InfoboxFields {
    let mut fields = InfoboxFields::default();
    let mut seen = [false; 3];

    for (key, value) in parse_fields(content) {
        let (index, slot) = match key {
            HANDLE_KEY => (0, &mut fields.id),
            NAME_KEY => (1, &mut fields.name),
            BIRTH_DATE_KEY => (2, &mut fields.birth_date),
            _ => continue,
        };
        // An empty first occurrence still shadows later ones
        if !seen[index] {
            seen[index] = true;
            *slot = (!value.is_empty()).then(|| value.to_string());
        }
    }

    fields
}

fn parse_line(line: &str) -> Option<(&str, &str)> {
    let mut rest = line;
    while let Some(pipe) = rest.find('|') {
        rest = &rest[pipe + 1..];
        if let Some(field) = parse_assignment(rest) {
            return Some(field);
        }
    }
    None
}

fn parse_assignment(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start_matches(INLINE_WS);
    let key_len =
        input.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_')).unwrap_or(input.len());
    if key_len == 0 {
        return None;
    }
    let (key, after_key) = input.split_at(key_len);
    let value = after_key.trim_start_matches(INLINE_WS).strip_prefix('=')?;
    Some((key, value.trim()))
}
