//! Model artifact catalog: discovery, classification, pairing

mod artifact;
mod builder;
mod entry;
mod lister;
mod selector;
mod warning;

pub use artifact::{
    classify, derive_entry_name, derive_pairing_name, ArtifactFile, ArtifactKind,
    ArtifactReference,
};
pub use builder::{CatalogBuild, CatalogBuilder};
pub use entry::{Catalog, CatalogEntry};
pub use lister::DirectoryLister;
pub use selector::{validate_model_selector, SelectorError, MAX_SELECTOR_LENGTH};
pub use warning::CatalogWarning;

#[cfg(test)]
pub use lister::mock::MockDirectoryLister;
