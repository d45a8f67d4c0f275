//! Catalog construction: scan, classify, pair, merge

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::artifact::{
    classify, derive_entry_name, derive_pairing_name, ArtifactFile, ArtifactKind,
    ArtifactReference,
};
use super::entry::Catalog;
use super::lister::DirectoryLister;
use super::warning::CatalogWarning;
use crate::domain::error::DomainError;

/// Result of one catalog build: the catalog plus everything that was dropped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogBuild {
    pub catalog: Catalog,
    pub warnings: Vec<CatalogWarning>,
}

/// Builds a catalog from a model directory.
///
/// The catalog is ephemeral. Every call re-lists the directory; nothing is
/// cached between calls.
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    lister: Arc<dyn DirectoryLister>,
}

impl CatalogBuilder {
    pub fn new(lister: Arc<dyn DirectoryLister>) -> Self {
        Self { lister }
    }

    pub fn build(&self, dir: &Path) -> Result<CatalogBuild, DomainError> {
        let entries = self.lister.list(dir)?;

        let mut warnings: Vec<CatalogWarning> = Vec::new();
        let mut files: Vec<ArtifactFile> = Vec::new();
        for file_name in &entries {
            match classify(file_name) {
                Some(kind) => files.push(ArtifactFile::new(dir.join(file_name), kind)),
                None => warnings.push(CatalogWarning::Unclassified {
                    file: file_name.clone(),
                }),
            }
        }

        let mut architectures: Vec<PathBuf> = Vec::new();
        let mut weights: Vec<PathBuf> = Vec::new();
        let mut self_contained: Vec<PathBuf> = Vec::new();
        for file in files {
            match file.kind {
                ArtifactKind::Architecture => architectures.push(file.path),
                ArtifactKind::Weights => weights.push(file.path),
                ArtifactKind::SelfContained => self_contained.push(file.path),
            }
        }

        let paired = pair_artifacts(architectures, weights, &mut warnings);

        let mut catalog = Catalog::new();
        if self_contained.is_empty() {
            for (name, reference) in paired {
                catalog.insert(name, reference);
            }
        } else {
            // Self-contained models replace the paired group wholesale. This is
            // not a key-wise merge; paired entries vanish even when their names
            // do not collide.
            if !paired.is_empty() {
                warnings.push(CatalogWarning::PairedShadowedBySingle {
                    names: paired.iter().map(|(name, _)| name.clone()).collect(),
                });
            }
            for path in self_contained {
                let name = derive_entry_name(&path);
                catalog.insert(name, ArtifactReference::single(path));
            }
        }

        Ok(CatalogBuild { catalog, warnings })
    }
}

/// Pair architectures with weights.
///
/// Architectures are sorted descending and consumed from the end; weights are
/// visited ascending. Each weight consumes exactly one architecture whether or
/// not it matches, so insertions into the directory can shift every pairing
/// after them. Order semantics are load-bearing; do not replace them with a
/// name-keyed join.
fn pair_artifacts(
    mut architectures: Vec<PathBuf>,
    mut weights: Vec<PathBuf>,
    warnings: &mut Vec<CatalogWarning>,
) -> Vec<(String, ArtifactReference)> {
    architectures.sort_by(|a, b| b.as_os_str().cmp(a.as_os_str()));
    weights.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

    let mut pairs = Vec::new();
    for weight in weights {
        let Some(architecture) = architectures.pop() else {
            warnings.push(CatalogWarning::UnmatchedWeights { path: weight });
            continue;
        };

        // Match on the basename; the directory prefix must not participate.
        let pairing_name = derive_pairing_name(&architecture);
        let weight_matches = weight
            .file_name()
            .is_some_and(|name| name.to_string_lossy().contains(&pairing_name));
        if weight_matches {
            let name = derive_entry_name(&architecture);
            pairs.push((name, ArtifactReference::paired(architecture, weight)));
        } else {
            warnings.push(CatalogWarning::PairMismatch {
                architecture,
                weights: weight,
            });
        }
    }

    for path in architectures {
        warnings.push(CatalogWarning::UnmatchedArchitecture { path });
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::lister::mock::MockDirectoryLister;

    fn build_from(entries: &[&str]) -> CatalogBuild {
        let lister = MockDirectoryLister::new().with_entries(entries.iter().copied());
        CatalogBuilder::new(Arc::new(lister))
            .build(Path::new("m"))
            .unwrap()
    }

    #[test]
    fn test_split_pair_produces_paired_entry() {
        let build = build_from(&["VGG19_model.json", "VGG19_weights.h5"]);

        assert_eq!(build.catalog.names(), vec!["VGG19_model"]);
        assert_eq!(
            build.catalog.get("VGG19_model"),
            Some(&ArtifactReference::paired(
                "m/VGG19_model.json",
                "m/VGG19_weights.h5"
            ))
        );
        assert!(build.warnings.is_empty());
    }

    #[test]
    fn test_self_contained_produces_single_entry() {
        let build = build_from(&["RESNET_model.h5"]);

        assert_eq!(build.catalog.names(), vec!["RESNET_model"]);
        assert_eq!(
            build.catalog.get("RESNET_model"),
            Some(&ArtifactReference::single("m/RESNET_model.h5"))
        );
        assert!(build.warnings.is_empty());
    }

    #[test]
    fn test_single_group_shadows_paired_group() {
        let build = build_from(&["VGG19_model.json", "VGG19_weights.h5", "RESNET_model.h5"]);

        // wholesale replacement, not a merge: the paired entry is gone
        assert_eq!(build.catalog.names(), vec!["RESNET_model"]);
        assert_eq!(
            build.warnings,
            vec![CatalogWarning::PairedShadowedBySingle {
                names: vec!["VGG19_model".to_string()],
            }]
        );
    }

    #[test]
    fn test_multiple_pairs_cosort() {
        let build = build_from(&[
            "ALPHA_model.json",
            "BETA_weights.h5",
            "BETA_model.json",
            "ALPHA_weights.h5",
        ]);

        // weights ascend, architectures pop from the descending tail, so the
        // pairs come out in weight order
        assert_eq!(build.catalog.names(), vec!["ALPHA_model", "BETA_model"]);
        assert!(build.warnings.is_empty());
    }

    #[test]
    fn test_stray_weight_consumes_an_architecture() {
        // BETA has a weight but no architecture; its weight pops CHARLIE's
        // architecture and both are dropped
        let build = build_from(&[
            "ALPHA_model.json",
            "CHARLIE_model.json",
            "ALPHA_weights.h5",
            "BETA_weights.h5",
            "CHARLIE_weights.h5",
        ]);

        assert_eq!(build.catalog.names(), vec!["ALPHA_model"]);
        assert_eq!(
            build.warnings,
            vec![
                CatalogWarning::PairMismatch {
                    architecture: PathBuf::from("m/CHARLIE_model.json"),
                    weights: PathBuf::from("m/BETA_weights.h5"),
                },
                CatalogWarning::UnmatchedWeights {
                    path: PathBuf::from("m/CHARLIE_weights.h5"),
                },
            ]
        );
    }

    #[test]
    fn test_leftover_architecture_is_reported() {
        let build = build_from(&["ALPHA_model.json", "BETA_model.json", "ALPHA_weights.h5"]);

        assert_eq!(build.catalog.names(), vec!["ALPHA_model"]);
        assert_eq!(
            build.warnings,
            vec![CatalogWarning::UnmatchedArchitecture {
                path: PathBuf::from("m/BETA_model.json"),
            }]
        );
    }

    #[test]
    fn test_unclassified_files_become_warnings() {
        let build = build_from(&["notes.txt", "VGG19_weight.h5", "RESNET_model.h5"]);

        assert_eq!(build.catalog.names(), vec!["RESNET_model"]);
        assert_eq!(
            build.warnings,
            vec![
                CatalogWarning::Unclassified {
                    file: "notes.txt".to_string(),
                },
                CatalogWarning::Unclassified {
                    file: "VGG19_weight.h5".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_entry_names_last_wins_in_place() {
        let build = build_from(&["A_model.h5", "B_model.h5", "A_model.hdf5"]);

        assert_eq!(build.catalog.names(), vec!["A_model", "B_model"]);
        assert_eq!(
            build.catalog.get("A_model"),
            Some(&ArtifactReference::single("m/A_model.hdf5"))
        );
    }

    #[test]
    fn test_empty_directory() {
        let build = build_from(&[]);
        assert!(build.catalog.is_empty());
        assert!(build.warnings.is_empty());
    }

    #[test]
    fn test_listing_error_propagates() {
        let lister = MockDirectoryLister::new().with_error("permission denied");
        let err = CatalogBuilder::new(Arc::new(lister))
            .build(Path::new("static/model"))
            .unwrap_err();
        assert!(matches!(err, DomainError::CatalogIo { .. }));
    }

    #[test]
    fn test_every_build_relists_the_directory() {
        let lister = Arc::new(MockDirectoryLister::new().with_entries(["A_model.h5"]));
        let builder = CatalogBuilder::new(lister.clone());

        builder.build(Path::new("m")).unwrap();
        builder.build(Path::new("m")).unwrap();

        assert_eq!(lister.calls(), 2);
    }
}
