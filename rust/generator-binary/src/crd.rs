//! Loading of CustomResourceDefinition manifests.
//!
//! Only the fields the generator needs are modeled; everything else in
//! the manifest is ignored. Per-file problems are surfaced as [`Error`]
//! values so the caller can skip the file and keep going.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use serde_json::{Map, Value};
use snafu::{ensure, ResultExt, Snafu};

#[derive(Snafu, Debug)]
pub enum Error {
    #[snafu(display("failed to read CRD file {}", path.display()))]
    ReadFile {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to parse CRD file {}", path.display()))]
    ParseFile {
        source: serde_yaml::Error,
        path: PathBuf,
    },

    #[snafu(display("missing group or kind data"))]
    MissingIdentity,

    #[snafu(display("no version data"))]
    NoVersions,
}

#[derive(Debug, Deserialize)]
pub struct CustomResourceDefinition {
    #[serde(default)]
    pub spec: CrdSpec,
}

#[derive(Debug, Default, Deserialize)]
pub struct CrdSpec {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub names: CrdNames,
    #[serde(default)]
    pub versions: Vec<CrdVersion>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CrdNames {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub plural: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CrdVersion {
    #[serde(default)]
    pub name: String,
    pub schema: Option<CrdVersionSchema>,
}

#[derive(Debug, Deserialize)]
pub struct CrdVersionSchema {
    #[serde(rename = "openAPIV3Schema")]
    pub open_api_v3_schema: Option<Map<String, Value>>,
}

/// The identity of one custom resource, shared by all of its versions.
#[derive(Debug)]
pub struct ResourceDescriptor {
    /// Lowercased API group, dots preserved.
    pub group: String,
    /// Kind exactly as declared in the manifest.
    pub kind: String,
    pub plural: String,
}

impl CustomResourceDefinition {
    /// Extracts the resource identity, rejecting manifests that are
    /// missing group, kind, plural or any versions.
    pub fn descriptor(&self) -> Result<ResourceDescriptor, Error> {
        let group = self.spec.group.to_lowercase();
        let kind = self.spec.names.kind.clone();
        let plural = self.spec.names.plural.clone();
        ensure!(
            !group.is_empty() && !kind.is_empty() && !plural.is_empty(),
            MissingIdentitySnafu
        );
        ensure!(!self.spec.versions.is_empty(), NoVersionsSnafu);
        Ok(ResourceDescriptor {
            group,
            kind,
            plural,
        })
    }
}

/// Lists the `*.yaml` files in `dir`, sorted for stable diagnostics.
/// An unreadable directory yields an empty list, not an error.
pub fn discover(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(dir = %dir.display(), %err, "cannot enumerate CRD directory");
            return Vec::new();
        }
    };
    let mut files = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "yaml"))
        .collect::<Vec<_>>();
    files.sort();
    files
}

pub fn load(path: &Path) -> Result<CustomResourceDefinition, Error> {
    let contents = fs::read_to_string(path).context(ReadFileSnafu { path })?;
    serde_yaml::from_str(&contents).context(ParseFileSnafu { path })
}
