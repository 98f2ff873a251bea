//! Design spec YAML consumed by `boltzgen run`.
//!
//! Layout:
//! ```yaml
//! entities:
//! - protein:
//!     id: B
//!     sequence: 8..16
//!     cyclic: true
//! - file:
//!     path: target.pdb
//!     include:
//!     - chain:
//!         id: A
//!     binding_types:
//!     - chain:
//!         id: A
//!       binding: 12,14,61
//! ```

use crate::utils::error::DesignError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Chain id of the designed binder
pub const BINDER_CHAIN_ID: &str = "B";

/// Binder and target description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetParams {
    pub chain: String,
    /// Comma separated residue numbers; blank means no hotspots
    pub hotspots: Option<String>,
    pub binder_min: u32,
    pub binder_max: u32,
    pub cyclic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignSpec {
    pub entities: Vec<Entity>,
}

/// One entry of `entities`; exactly one of the fields is set
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<ProteinEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileEntity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinEntity {
    pub id: String,
    /// Length range, `min..max`
    pub sequence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cyclic: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntity {
    /// Relative to the spec file
    pub path: String,
    pub include: Vec<ChainSelection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub binding_types: Vec<BindingSite>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSelection {
    pub chain: ChainId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainId {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingSite {
    pub chain: ChainId,
    pub binding: String,
}

impl DesignSpec {
    /// Build the spec for a binder against `structure_name` (a file name in
    /// the same directory as the spec)
    pub fn build(structure_name: &str, params: &TargetParams) -> Result<Self, DesignError> {
        validate_params(params)?;

        let binder = ProteinEntity {
            id: BINDER_CHAIN_ID.to_string(),
            sequence: format!("{}..{}", params.binder_min, params.binder_max),
            cyclic: params.cyclic.then_some(true),
        };

        let chain = ChainId {
            id: params.chain.clone(),
        };

        let binding_types = match normalize_hotspots(params.hotspots.as_deref()) {
            Some(binding) => vec![BindingSite {
                chain: chain.clone(),
                binding,
            }],
            None => Vec::new(),
        };

        let target = FileEntity {
            path: structure_name.to_string(),
            include: vec![ChainSelection { chain }],
            binding_types,
        };

        Ok(Self {
            entities: vec![
                Entity {
                    protein: Some(binder),
                    ..Default::default()
                },
                Entity {
                    file: Some(target),
                    ..Default::default()
                },
            ],
        })
    }

    pub fn to_yaml(&self) -> Result<String, DesignError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), DesignError> {
        let path = path.as_ref();
        let yaml = self.to_yaml()?;
        std::fs::write(path, &yaml)?;
        debug!("Design spec written to {} ({} bytes)", path.display(), yaml.len());
        Ok(())
    }
}

fn validate_params(params: &TargetParams) -> Result<(), DesignError> {
    if params.binder_min == 0 || params.binder_min > params.binder_max {
        return Err(DesignError::InvalidBinderLength {
            min: params.binder_min,
            max: params.binder_max,
        });
    }

    if params.chain.is_empty() || params.chain.chars().any(char::is_whitespace) {
        return Err(DesignError::InvalidChain(params.chain.clone()));
    }

    Ok(())
}

/// Strip all spaces; blank input means no hotspots
fn normalize_hotspots(hotspots: Option<&str>) -> Option<String> {
    let hotspots = hotspots?;
    if hotspots.trim().is_empty() {
        return None;
    }
    Some(hotspots.replace(' ', ""))
}
