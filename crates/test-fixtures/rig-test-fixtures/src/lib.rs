//! Shared JSON fixtures (rigs and animations) for workspace tests and benches.
//!
//! Fixture files live under `fixtures/` at the workspace root and are indexed by
//! `fixtures/manifest.json`. Loaders are generic over the target type so this crate
//! does not depend on the animation core.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    animations: HashMap<String, String>,
    skeletons: HashMap<String, SkeletonEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SkeletonEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        animations: Vec<String>,
    },
}

impl SkeletonEntry {
    fn as_path(&self) -> &str {
        match self {
            SkeletonEntry::Path(path) => path,
            SkeletonEntry::Detailed { path, .. } => path,
        }
    }

    fn animations(&self) -> &[String] {
        match self {
            SkeletonEntry::Path(_) => &[],
            SkeletonEntry::Detailed { animations, .. } => animations,
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let path = fixtures_root().join(rel);
    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod animations {
    use super::*;

    /// Every animation fixture listed in the manifest.
    pub fn keys() -> Vec<String> {
        MANIFEST.animations.keys().cloned().collect()
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.animations, "animation", name)?;
        super::load_json(rel)
    }
}

pub mod skeletons {
    use super::*;

    /// Every skeleton fixture listed in the manifest.
    pub fn keys() -> Vec<String> {
        MANIFEST.skeletons.keys().cloned().collect()
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.skeletons, "skeleton", name)?;
        super::load_json(entry.as_path())
    }

    /// Animation fixture keys authored against this skeleton.
    pub fn animations(name: &str) -> Result<Vec<String>> {
        let entry = lookup(&MANIFEST.skeletons, "skeleton", name)?;
        Ok(entry.animations().to_vec())
    }
}
