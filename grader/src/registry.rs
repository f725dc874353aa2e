//! Registry version resolver: best-effort lookup of each declared
//! dependency's latest published version.
//!
//! This data exists solely to ground the reviewer's commentary on dependency
//! freshness in verifiable fact instead of the model's possibly-stale
//! internal knowledge. It is never authoritative beyond that: every lookup
//! failure maps the dependency to the [`UNKNOWN_VERSION`] sentinel and the
//! batch carries on.

use futures::future::join_all;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tokio::time::Duration;

/// Sentinel recorded when a dependency's latest version could not be
/// resolved.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Reads the project's `package.json` and returns its declared dependency
/// map (dependencies + devDependencies). A missing or invalid manifest
/// yields an empty map; the review prompt notes the absence.
pub fn read_manifest(project_path: &Path) -> BTreeMap<String, String> {
    let raw = match fs::read_to_string(project_path.join("package.json")) {
        Ok(raw) => raw,
        Err(_) => return BTreeMap::new(),
    };
    let manifest: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            log::debug!("invalid package.json: {}", e);
            return BTreeMap::new();
        }
    };

    let mut declared = BTreeMap::new();
    for section in ["dependencies", "devDependencies"] {
        if let Some(map) = manifest.get(section).and_then(Value::as_object) {
            for (name, range) in map {
                if let Some(range) = range.as_str() {
                    declared.insert(name.clone(), range.to_string());
                }
            }
        }
    }
    declared
}

/// Resolves latest published versions from an npm-compatible registry, one
/// concurrent lookup per dependency.
pub struct RegistryResolver {
    client: reqwest::Client,
    base_url: String,
}

impl RegistryResolver {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Maps each declared dependency to its registry `dist-tags.latest`, or
    /// [`UNKNOWN_VERSION`] when the lookup fails for any reason.
    pub async fn resolve_latest_versions(
        &self,
        declared: &BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        let lookups = declared.keys().map(|name| async move {
            let latest = self
                .lookup_latest(name)
                .await
                .unwrap_or_else(|| UNKNOWN_VERSION.to_string());
            (name.clone(), latest)
        });
        join_all(lookups).await.into_iter().collect()
    }

    async fn lookup_latest(&self, name: &str) -> Option<String> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), name);
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                log::debug!("registry lookup for '{}' failed: {}", name, e);
                return None;
            }
        };
        if !response.status().is_success() {
            log::debug!("registry lookup for '{}' returned {}", name, response.status());
            return None;
        }
        let body: Value = response.json().await.ok()?;
        body.get("dist-tags")
            .and_then(|tags| tags.get("latest"))
            .and_then(Value::as_str)
            .map(|s| s.to_string())
    }
}
