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
    configs: HashMap<String, String>,
    resolved: HashMap<String, ResolvedEntry>,
}

#[derive(Debug, Deserialize)]
struct ResolvedEntry {
    config: String,
    expect: serde_json::Value,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Slider configurations as a host would pass them in.
pub mod configs {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.configs.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.configs, "config", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.configs, "config", name)?;
        super::load_json(rel)
    }
}

/// Configurations paired with the values resolution must produce.
pub mod resolved {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.resolved.keys().cloned().collect()
    }

    pub fn config_json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.resolved, "resolved", name)?;
        read_to_string(&entry.config)
    }

    pub fn expect<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.resolved, "resolved", name)?;
        serde_json::from_value(entry.expect.clone())
            .with_context(|| format!("failed to decode expectation for '{name}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_config_is_readable_json() {
        for key in configs::keys() {
            let value: serde_json::Value = configs::load(&key).unwrap();
            assert!(value.is_object(), "{key} should be an object");
        }
    }

    #[test]
    fn resolved_entries_point_at_configs() {
        for key in resolved::keys() {
            assert!(resolved::config_json(&key).is_ok(), "{key}");
            let expect: serde_json::Value = resolved::expect(&key).unwrap();
            assert!(expect.get("from").is_some());
        }
    }

    #[test]
    fn unknown_names_error() {
        assert!(configs::json("nope").is_err());
        assert!(resolved::expect::<serde_json::Value>("nope").is_err());
    }
}
