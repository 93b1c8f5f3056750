//! Column feature descriptors and their persisted document form.
//!
//! A [`ColumnFeatureDescriptor`] is the inferred metadata for one column:
//! name, the mask of kinds still plausible after a scan, and the chosen
//! kind/scale pair. Descriptors are immutable apart from
//! [`ColumnFeatureDescriptor::set_possible_kinds`], which re-validates the
//! chosen pair against the new mask.
//!
//! A [`FeatureSet`] collects the descriptors of one table and round-trips
//! through YAML; the mask is stored as its raw integer, which is the
//! persisted contract for bit assignments.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::kind::{DataKind, ScaleKind, TypeMask};

pub const CURRENT_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFeatureDescriptor {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    possible: TypeMask,
    kind: DataKind,
    scale: ScaleKind,
}

impl ColumnFeatureDescriptor {
    /// Build a descriptor from a final possible-kind mask, applying the
    /// default selection rule: the first kind in catalog order becomes the
    /// chosen kind, and its first allowed scale becomes the chosen scale.
    pub fn from_mask(name: impl Into<String>, mask: TypeMask) -> Self {
        let kind = mask.first_kind();
        let scale = default_scale_for(kind);
        Self {
            name: name.into(),
            description: None,
            possible: mask,
            kind,
            scale,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn possible_kinds(&self) -> TypeMask {
        self.possible
    }

    pub fn kind(&self) -> DataKind {
        self.kind
    }

    pub fn scale(&self) -> ScaleKind {
        self.scale
    }

    /// Replace the possible-kind mask. When the previously chosen kind or
    /// scale is no longer valid, the default selection rule picks again.
    pub fn set_possible_kinds(&mut self, mask: TypeMask) {
        self.possible = mask;
        let kind_still_possible = self
            .kind
            .flag()
            .is_some_and(|flag| mask.contains_all(flag));
        if !kind_still_possible {
            self.kind = mask.first_kind();
        }
        if !self.kind.allowed_scales().contains(&self.scale) {
            self.scale = default_scale_for(self.kind);
        }
    }
}

fn default_scale_for(kind: DataKind) -> ScaleKind {
    kind.allowed_scales()
        .first()
        .copied()
        .unwrap_or(ScaleKind::None)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSet {
    pub columns: Vec<ColumnFeatureDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
}

impl FeatureSet {
    pub fn new(columns: Vec<ColumnFeatureDescriptor>) -> Self {
        Self {
            columns,
            schema_version: Some(CURRENT_SCHEMA_VERSION.to_string()),
        }
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Serializing feature set to YAML")
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Serializing feature set to JSON")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("Creating feature file {path:?}"))?;
        serde_yaml::to_writer(file, self).context("Writing feature YAML")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening feature file {path:?}"))?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).context("Parsing feature YAML")
    }
}
