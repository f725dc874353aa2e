//! Pipeline configuration.
//!
//! All knobs are serde structs with per-field defaults so a config file may
//! specify only what it overrides. The weighting and pass-mark values are
//! policy constants with fixed defaults; deployments may tune them but the
//! defaults define the product's grading behavior.

use common::config::AppConfig;
use serde::{Deserialize, Serialize};

fn default_clone_timeout_secs() -> u64 {
    120
}

fn default_install_timeout_secs() -> u64 {
    300
}

fn default_test_timeout_secs() -> u64 {
    300
}

fn default_registry_timeout_secs() -> u64 {
    10
}

fn default_max_file_chars() -> usize {
    10_000
}

fn default_max_concurrent_pipelines() -> usize {
    4
}

fn default_test_weight() -> f64 {
    0.8
}

fn default_quality_weight() -> f64 {
    0.2
}

fn default_pass_mark() -> f64 {
    70.0
}

fn default_llm_timeout_secs() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    4096
}

/// Score-composition policy: how test and quality scores are weighted and
/// the minimum total required to pass.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Weights {
    #[serde(default = "default_test_weight")]
    pub test_weight: f64,

    #[serde(default = "default_quality_weight")]
    pub quality_weight: f64,

    /// Minimum total (0-100) required for a `pass` grade.
    #[serde(default = "default_pass_mark")]
    pub pass_mark: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            test_weight: default_test_weight(),
            quality_weight: default_quality_weight(),
            pass_mark: default_pass_mark(),
        }
    }
}

/// Tunables for one grading pipeline run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    #[serde(default = "default_clone_timeout_secs")]
    pub clone_timeout_secs: u64,

    #[serde(default = "default_install_timeout_secs")]
    pub install_timeout_secs: u64,

    /// Wall-clock bound on the submission's test command. An unbounded test
    /// run must not hang a worker.
    #[serde(default = "default_test_timeout_secs")]
    pub test_timeout_secs: u64,

    /// Per-dependency bound on registry version lookups.
    #[serde(default = "default_registry_timeout_secs")]
    pub registry_timeout_secs: u64,

    /// Per-file character cap applied during source collection.
    #[serde(default = "default_max_file_chars")]
    pub max_file_chars: usize,

    /// Deployment knob for the shared pipeline limiter; the core itself does
    /// not enforce it unless a limiter is attached to the job.
    #[serde(default = "default_max_concurrent_pipelines")]
    pub max_concurrent_pipelines: usize,

    #[serde(default)]
    pub weights: Weights,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            clone_timeout_secs: default_clone_timeout_secs(),
            install_timeout_secs: default_install_timeout_secs(),
            test_timeout_secs: default_test_timeout_secs(),
            registry_timeout_secs: default_registry_timeout_secs(),
            max_file_chars: default_max_file_chars(),
            max_concurrent_pipelines: default_max_concurrent_pipelines(),
            weights: Weights::default(),
        }
    }
}

/// Explicit configuration for the LLM reviewer. Constructed once at the
/// composition root and handed to the reviewer; nothing in the review path
/// reads the process environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReviewerConfig {
    pub api_key: String,

    /// Base URL of an OpenAI-compatible chat-completions API.
    pub base_url: String,

    pub model: String,

    /// Low by default to reduce response variance.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

impl ReviewerConfig {
    /// Builds the reviewer configuration from the global [`AppConfig`].
    pub fn from_env() -> Self {
        let cfg = AppConfig::global();
        Self {
            api_key: cfg.llm_api_key.clone(),
            base_url: cfg.llm_base_url.clone(),
            model: cfg.llm_model.clone(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_grading_policy() {
        let w = Weights::default();
        assert_eq!(w.test_weight, 0.8);
        assert_eq!(w.quality_weight, 0.2);
        assert_eq!(w.pass_mark, 70.0);
    }

    #[test]
    fn partial_config_json_fills_defaults() {
        let cfg: PipelineConfig = serde_json::from_str(r#"{ "test_timeout_secs": 60 }"#).unwrap();
        assert_eq!(cfg.test_timeout_secs, 60);
        assert_eq!(cfg.max_file_chars, 10_000);
        assert_eq!(cfg.weights.pass_mark, 70.0);
    }
}
