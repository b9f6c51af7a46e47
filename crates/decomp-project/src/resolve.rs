//! Identifier tables used to resolve cross-references while loading.

use std::collections::HashMap;

use crate::error::{ProjectError, Result};

/// Identifier -> value map for one kind of entity in one database.
///
/// Built while the owning database loads; dependent databases resolve the
/// identifier strings they read against it.
#[derive(Debug, Clone)]
pub struct RefTable<T> {
    database: &'static str,
    kind: &'static str,
    entries: HashMap<String, T>,
}

impl<T> RefTable<T> {
    pub fn new(database: &'static str, kind: &'static str) -> Self {
        Self {
            database,
            kind,
            entries: HashMap::new(),
        }
    }

    /// Register `identifier`; identifiers are unique per table.
    pub fn insert(&mut self, identifier: impl Into<String>, value: T) -> Result<()> {
        let identifier = identifier.into();
        if self.entries.contains_key(&identifier) {
            return Err(ProjectError::DuplicateIdentifier {
                database: self.database,
                kind: self.kind,
                identifier,
            });
        }
        self.entries.insert(identifier, value);
        Ok(())
    }

    /// Resolve `identifier`, reporting the failure against `referrer`.
    pub fn resolve(&self, identifier: &str, referrer: &'static str) -> Result<&T> {
        self.entries
            .get(identifier)
            .ok_or_else(|| ProjectError::UnresolvedReference {
                database: referrer,
                kind: self.kind,
                identifier: identifier.to_string(),
            })
    }

    pub fn get(&self, identifier: &str) -> Option<&T> {
        self.entries.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_and_unresolved_are_errors() {
        let mut table = RefTable::new("Pokemon Species Database", "species");
        table.insert("SPECIES_WURMPLE", 1).expect("first insert");
        assert!(matches!(
            table.insert("SPECIES_WURMPLE", 2),
            Err(ProjectError::DuplicateIdentifier { .. })
        ));
        assert_eq!(table.resolve("SPECIES_WURMPLE", "Trainer Database").ok(), Some(&1));
        match table.resolve("SPECIES_MISSINGNO", "Trainer Database") {
            Err(ProjectError::UnresolvedReference {
                database,
                kind,
                identifier,
            }) => {
                assert_eq!(database, "Trainer Database");
                assert_eq!(kind, "species");
                assert_eq!(identifier, "SPECIES_MISSINGNO");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
