// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical pipeline document model.
//!
//! Everything here is produced by `bbpl-document`'s loader after the
//! hyphen/camel normalization and structural lifts the document loader applies.
//! These types are read-only for the lifetime of a run.

use std::collections::BTreeMap;

/// Supported step container sizes, mapped to resource-limit table entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Size {
    #[serde(rename = "1x")]
    X1,
    #[serde(rename = "2x")]
    X2,
    #[serde(rename = "4x")]
    X4,
    #[serde(rename = "8x")]
    X8,
    #[serde(rename = "16x")]
    X16,
}

impl Size {
    pub const ALL: [Size; 5] = [Size::X1, Size::X2, Size::X4, Size::X8, Size::X16];

    pub fn as_str(&self) -> &'static str {
        match self {
            Size::X1 => "1x",
            Size::X2 => "2x",
            Size::X4 => "4x",
            Size::X8 => "8x",
            Size::X16 => "16x",
        }
    }

    pub fn parse(s: &str) -> Option<Size> {
        Self::ALL.into_iter().find(|sz| sz.as_str() == s)
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Step trigger mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    #[default]
    Automatic,
    Manual,
}

/// Image reference, either a bare string or a structured form with auth.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Image {
    Name(String),
    Detailed(DetailedImage),
}

impl Image {
    pub fn name(&self) -> &str {
        match self {
            Image::Name(n) => n,
            Image::Detailed(d) => &d.name,
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Image::Name(_) => None,
            Image::Detailed(d) => d.username.as_deref(),
        }
    }

    pub fn password(&self) -> Option<&str> {
        match self {
            Image::Name(_) => None,
            Image::Detailed(d) => d.password.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct DetailedImage {
    pub name: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub aws: Option<AwsImageAuth>,
    #[serde(default, rename = "runAsUser")]
    pub run_as_user: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct AwsImageAuth {
    #[serde(default, rename = "access-key")]
    pub access_key: Option<String>,
    #[serde(default, rename = "secret-key")]
    pub secret_key: Option<String>,
    #[serde(default, rename = "oidc-role")]
    pub oidc_role: Option<String>,
}

/// Artifact declaration on a step.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Artifacts {
    pub paths: Vec<String>,
    #[serde(default = "default_true")]
    pub download: bool,
}

fn default_true() -> bool {
    true
}

/// Changeset-based condition gating a step.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Changesets {
    #[serde(default, rename = "includePaths")]
    pub include_paths: Vec<String>,
    #[serde(default, rename = "excludePaths")]
    pub exclude_paths: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub changesets: Option<Changesets>,
}

/// A single container-backed unit of work.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Step {
    #[serde(default)]
    pub name: Option<String>,
    pub script: Vec<String>,
    #[serde(default)]
    pub image: Option<Image>,
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default, rename = "maxTime")]
    pub max_time: Option<f64>,
    #[serde(default)]
    pub caches: Vec<String>,
    #[serde(default)]
    pub artifacts: Option<Artifacts>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub trigger: Trigger,
    #[serde(default)]
    pub condition: Option<Condition>,
    #[serde(default, rename = "afterScript")]
    pub after_script: Vec<String>,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    #[serde(default)]
    pub deployment: Option<String>,
}

impl Step {
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| "(unnamed step)".into())
    }
}

/// A set of steps executed concurrently.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParallelGroup {
    #[serde(default = "default_true", rename = "failFast")]
    pub fail_fast: bool,
    pub steps: Vec<Step>,
}

/// A single entry in a pipeline: either a step or a parallel group.
///
/// Untagged because the document loader emits a plain mapping for each
/// item after unwrapping its `step`/`parallel` wrapper; `Step` and
/// `ParallelGroup` are structurally distinct (`script` vs `steps`), so the
/// shape alone disambiguates which variant matches.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
#[allow(clippy::large_enum_variant)]
pub enum PipelineItem {
    Step(Step),
    Parallel(ParallelGroup),
}

impl PipelineItem {
    pub fn is_empty_of_work(&self) -> bool {
        match self {
            PipelineItem::Step(s) => s.script.is_empty(),
            PipelineItem::Parallel(p) => p.steps.is_empty(),
        }
    }
}

/// An ordered sequence of pipeline items.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pipeline(pub Vec<PipelineItem>);

impl Pipeline {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn items(&self) -> &[PipelineItem] {
        &self.0
    }
}

/// The five keyed pipeline collections.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Pipelines {
    #[serde(default)]
    pub default: Option<Pipeline>,
    #[serde(default)]
    pub branches: BTreeMap<String, Pipeline>,
    #[serde(default)]
    pub tags: BTreeMap<String, Pipeline>,
    #[serde(default)]
    pub pullrequests: BTreeMap<String, Pipeline>,
    #[serde(default)]
    pub custom: BTreeMap<String, Pipeline>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct GlobalOptions {
    #[serde(default, rename = "maxTime")]
    pub max_time: Option<f64>,
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default)]
    pub docker: Option<bool>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CloneConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub depth: Option<u32>,
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            depth: None,
        }
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ServiceDef {
    pub image: Image,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    #[serde(default)]
    pub memory: Option<String>,
    #[serde(default)]
    pub ports: Vec<String>,
}

impl Default for Image {
    fn default() -> Self {
        Image::Name(String::new())
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Definitions {
    #[serde(default)]
    pub caches: BTreeMap<String, String>,
    #[serde(default)]
    pub services: BTreeMap<String, ServiceDef>,
    #[serde(default)]
    pub steps: BTreeMap<String, Step>,
}

/// The canonical, read-only form of a parsed pipeline document.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Document {
    #[serde(default)]
    pub image: Option<Image>,
    #[serde(default)]
    pub options: Option<GlobalOptions>,
    #[serde(default)]
    pub clone: Option<CloneConfig>,
    #[serde(default)]
    pub definitions: Option<Definitions>,
    pub pipelines: Pipelines,
}

/// A label identifying one of the five keyed pipeline slots, e.g. for `listPipelines`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PipelineLabel(pub String);

impl std::fmt::Display for PipelineLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Pipelines {
    /// Sorted labels of the form `default`, `branches/<name>`, `tags/<name>`,
    /// `custom/<name>`, `pullrequests/<pattern>`.
    pub fn labels(&self) -> Vec<PipelineLabel> {
        let mut labels = Vec::new();
        if self.default.is_some() {
            labels.push(PipelineLabel("default".into()));
        }
        for name in self.branches.keys() {
            labels.push(PipelineLabel(format!("branches/{name}")));
        }
        for name in self.tags.keys() {
            labels.push(PipelineLabel(format!("tags/{name}")));
        }
        for name in self.pullrequests.keys() {
            labels.push(PipelineLabel(format!("pullrequests/{name}")));
        }
        for name in self.custom.keys() {
            labels.push(PipelineLabel(format!("custom/{name}")));
        }
        labels.sort();
        labels
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
