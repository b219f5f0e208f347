//! Deck file loader (.dck format)
//!
//! One `<count> <Card Name>` entry per line. `#` comments and `[section]`
//! headers are skipped.

use crate::{DuelError, Result};
use std::fs;
use std::path::Path;

/// Deck loader for .dck files
pub struct DeckLoader;

impl DeckLoader {
    pub fn load_from_file(path: &Path) -> Result<DeckList> {
        let content = fs::read_to_string(path)?;
        let mut deck = Self::parse(&content)?;
        if deck.name.is_none() {
            deck.name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned());
        }
        Ok(deck)
    }

    /// Parse a deck from its text content
    pub fn parse(content: &str) -> Result<DeckList> {
        let mut name = None;
        let mut entries = Vec::new();

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            if let Some(deck_name) = line.strip_prefix("Name=") {
                name = Some(deck_name.trim().to_string());
                continue;
            }

            let parsed = line
                .split_once(' ')
                .and_then(|(count, rest)| Some((count.parse::<u8>().ok()?, rest.trim())));
            match parsed {
                Some((count, card_name)) if count > 0 && !card_name.is_empty() => {
                    entries.push(DeckEntry {
                        card_name: card_name.to_string(),
                        count,
                    });
                }
                _ => {
                    return Err(DuelError::InvalidDeckFormat(format!(
                        "line {}: expected '<count> <card name>', got '{line}'",
                        line_no + 1
                    )))
                }
            }
        }

        if entries.is_empty() {
            return Err(DuelError::InvalidDeckFormat("Empty deck".to_string()));
        }

        Ok(DeckList { name, entries })
    }
}

/// Represents a deck entry (card name and count)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub card_name: String,
    pub count: u8,
}

/// Represents a complete deck list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckList {
    pub name: Option<String>,
    pub entries: Vec<DeckEntry>,
}

impl DeckList {
    pub fn total_cards(&self) -> usize {
        self.entries.iter().map(|e| e.count as usize).sum()
    }

    /// Unique card names in deck order
    pub fn unique_card_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !names.contains(&entry.card_name.as_str()) {
                names.push(&entry.card_name);
            }
        }
        names
    }
}
