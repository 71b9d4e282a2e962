//! Shared JSON fixtures for the rig crates.
//!
//! `fixtures/manifest.json` maps fixture names to files under `fixtures/`.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    rigs: BTreeMap<String, String>,
}

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../../../fixtures/manifest.json"))
        .expect("fixtures/manifest.json is valid JSON")
});

/// Absolute path of the named entry in `table`.
fn locate(table: &BTreeMap<String, String>, name: &str) -> Result<PathBuf> {
    let rel = table
        .get(name)
        .with_context(|| format!("no fixture named '{name}' in the manifest"))?;
    Ok(PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../../fixtures")
        .join(rel))
}

fn read(path: PathBuf) -> Result<String> {
    fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
}

/// Rig fixtures: a `scene` (transform node list) plus a `rig` description.
pub mod rigs {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.rigs.keys().cloned().collect()
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        locate(&MANIFEST.rigs, name)
    }

    pub fn json(name: &str) -> Result<String> {
        read(path(name)?)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let text = json(name)?;
        serde_json::from_str(&text).with_context(|| format!("parsing rig fixture '{name}'"))
    }
}
