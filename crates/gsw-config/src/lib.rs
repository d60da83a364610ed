//! gsw-config
//!
//! Layered YAML loading for the item catalog. Each document is one layer;
//! later layers override earlier ones key by key. The merged document is
//! hashed so a run can record exactly which catalog produced it, and the
//! typed view lives in [`catalog`].

pub mod catalog;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

pub use catalog::{Catalog, LevelRange, MarketSettings, ResourceCatalog};

/// Known secret-like prefixes. If any leaf string value in the effective config
/// starts with one of these, loading aborts with CONFIG_SECRET_DETECTED.
/// Spreadsheet credentials belong in their own file, never in the catalog.
const SECRET_PREFIXES: &[&str] = &[
    "sk-",        // OpenAI style
    "AKIA",       // AWS access key ID
    "AIza",       // Google API key
    "ya29.",      // Google OAuth access token
    "-----BEGIN", // PEM private keys (service-account JSON)
    "ghp_",       // GitHub PAT
    "glpat-",     // GitLab PAT
    "xoxb-",      // Slack bot token
];

/// Merged catalog document plus its identity.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Lowercase hex SHA-256 of `canonical_json`.
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

impl LoadedConfig {
    fn seal(config_json: Value) -> Result<Self> {
        if let Some(leaf) = find_secret_leaf(&config_json, String::new()) {
            bail!("CONFIG_SECRET_DETECTED leaf={leaf} value=REDACTED");
        }
        let canonical_json =
            serde_json::to_string(&config_json).context("canonical json serialize failed")?;
        let config_hash = hex::encode(Sha256::digest(canonical_json.as_bytes()));
        Ok(Self {
            config_hash,
            canonical_json,
            config_json,
        })
    }
}

/// Load layer files in order and return the merged document with its typed
/// catalog.
pub fn load_catalog<P: AsRef<Path>>(paths: &[P]) -> Result<(LoadedConfig, Catalog)> {
    let loaded = load_layered_yaml(paths)?;
    let catalog = Catalog::from_loaded(&loaded)?;
    Ok((loaded, catalog))
}

pub fn load_layered_yaml<P: AsRef<Path>>(paths: &[P]) -> Result<LoadedConfig> {
    let mut merged = empty_layer();
    for path in paths {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read yaml path: {}", path.display()))?;
        let layer =
            parse_layer(&raw).with_context(|| format!("invalid config layer: {}", path.display()))?;
        merge_layer(&mut merged, layer);
    }
    LoadedConfig::seal(merged)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = empty_layer();
    for (i, raw) in yaml_docs.iter().enumerate() {
        let layer = parse_layer(raw).with_context(|| format!("invalid config layer #{i}"))?;
        merge_layer(&mut merged, layer);
    }
    LoadedConfig::seal(merged)
}

fn empty_layer() -> Value {
    Value::Object(Map::new())
}

/// One YAML document as a JSON mapping. An empty document is an empty layer.
fn parse_layer(raw: &str) -> Result<Value> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
    match serde_json::to_value(yaml).context("yaml->json conversion failed")? {
        Value::Null => Ok(empty_layer()),
        layer @ Value::Object(_) => Ok(layer),
        _ => bail!("layer root must be a mapping"),
    }
}

/// Mappings merge key by key; anything else (lists included) is replaced.
fn merge_layer(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base_map), Value::Object(layer_map)) => {
            for (key, value) in layer_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge_layer(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// JSON pointer of the first string leaf that looks like a credential.
fn find_secret_leaf(v: &Value, at: String) -> Option<String> {
    match v {
        Value::String(s) if looks_like_secret(s) => Some(at),
        Value::Object(map) => map.iter().find_map(|(key, child)| {
            find_secret_leaf(child, format!("{at}/{}", escape_pointer_token(key)))
        }),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, child)| find_secret_leaf(child, format!("{at}/{i}"))),
        _ => None,
    }
}

fn escape_pointer_token(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}

fn looks_like_secret(s: &str) -> bool {
    let t = s.trim();
    t.len() >= 8 && SECRET_PREFIXES.iter().any(|p| t.starts_with(p))
}
