//! Card database for looking up card definitions by name

use crate::loader::card::{CardDefinition, CardLoader};
use crate::{DuelError, Result};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

/// Database of card definitions loaded from a card folder
#[derive(Debug, Default)]
pub struct CardDatabase {
    /// Lowercased name -> definition
    cards: FxHashMap<String, CardDefinition>,
    /// Files that failed to parse, with the reason
    load_errors: Vec<(PathBuf, String)>,
}

impl CardDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `.txt` card file under `cardsfolder_path`, recursively
    ///
    /// Files that fail to parse are skipped and recorded in
    /// [`load_errors`](CardDatabase::load_errors).
    pub fn load_from_cardsfolder(cardsfolder_path: &Path) -> Result<Self> {
        if !cardsfolder_path.is_dir() {
            return Err(DuelError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Cardsfolder not found: {}", cardsfolder_path.display()),
            )));
        }
        let mut db = CardDatabase::new();
        db.load_directory(cardsfolder_path)?;
        Ok(db)
    }

    fn load_directory(&mut self, dir: &Path) -> Result<()> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        // Deterministic load order, so duplicate names resolve the same way
        paths.sort();

        for path in paths {
            if path.is_dir() {
                self.load_directory(&path)?;
            } else if path.extension().and_then(|s| s.to_str()) == Some("txt") {
                match CardLoader::load_from_file(&path) {
                    Ok(card_def) => self.add_card(card_def),
                    Err(err) => self.load_errors.push((path, err.to_string())),
                }
            }
        }
        Ok(())
    }

    pub fn add_card(&mut self, card_def: CardDefinition) {
        self.cards.insert(card_def.name.to_lowercase(), card_def);
    }

    /// Look up a card by name (case-insensitive)
    pub fn get_card(&self, name: &str) -> Option<&CardDefinition> {
        self.cards.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cards.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// All definitions, sorted by name
    pub fn sorted(&self) -> Vec<&CardDefinition> {
        let mut defs: Vec<_> = self.cards.values().collect();
        defs.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        defs
    }

    pub fn load_errors(&self) -> &[(PathBuf, String)] {
        &self.load_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_database() {
        let db = CardDatabase::new();
        assert_eq!(db.len(), 0);
        assert!(db.is_empty());
        assert!(db.get_card("Thornback Toad").is_none());
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let mut db = CardDatabase::new();
        db.add_card(CardLoader::parse("Name:Ember Whelp\nTypes:Creature\nPT:3/2").unwrap());

        assert!(db.contains("ember whelp"));
        assert_eq!(db.get_card("EMBER WHELP").map(|d| d.attack), Some(3));
    }

    #[test]
    fn test_load_from_cardsfolder() {
        let cardsfolder = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("cardsfolder");
        let db = CardDatabase::load_from_cardsfolder(&cardsfolder).unwrap();

        assert!(db.contains("Thornback Toad"));
        assert!(db.load_errors().is_empty(), "{:?}", db.load_errors());
        let names: Vec<_> = db.sorted().iter().map(|d| d.name.to_string()).collect();
        let mut expected = names.clone();
        expected.sort();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_missing_folder() {
        assert!(CardDatabase::load_from_cardsfolder(Path::new("no/such/folder")).is_err());
    }
}
