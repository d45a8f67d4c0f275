//! Ordered model catalog

use serde::{Deserialize, Serialize};

use super::artifact::ArtifactReference;

/// One named entry in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub reference: ArtifactReference,
}

/// Ordered name -> ArtifactReference map.
///
/// Iteration order is insertion order. Inserting an existing name overwrites
/// the reference in place, keeping the entry's original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, reference: ArtifactReference) {
        let name = name.into();
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(existing) => existing.reference = reference,
            None => self.entries.push(CatalogEntry { name, reference }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ArtifactReference> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.reference)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
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

    fn reference(path: &str) -> ArtifactReference {
        ArtifactReference::single(path)
    }

    #[test]
    fn test_insert_preserves_insertion_order() {
        let mut catalog = Catalog::new();
        catalog.insert("B_model", reference("B_model.h5"));
        catalog.insert("A_model", reference("A_model.h5"));
        assert_eq!(catalog.names(), vec!["B_model", "A_model"]);
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut catalog = Catalog::new();
        catalog.insert("A_model", reference("first.h5"));
        catalog.insert("B_model", reference("B_model.h5"));
        catalog.insert("A_model", reference("second.h5"));

        assert_eq!(catalog.names(), vec!["A_model", "B_model"]);
        assert_eq!(catalog.get("A_model"), Some(&reference("second.h5")));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_get_unknown_name() {
        let catalog = Catalog::new();
        assert!(catalog.get("missing").is_none());
        assert!(!catalog.contains("missing"));
        assert!(catalog.is_empty());
    }
}
