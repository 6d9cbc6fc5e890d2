use anyhow::{anyhow, Context, Result};
use litellm_rs::router::builtin_provider;
use litellm_rs::{ProviderConfig, ProviderKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::paths::{exe_dir, home_dir};
use crate::types::{default_descriptors, ProviderDescriptor};

/// Knobs for a probe run. Defaults keep each probe as cheap as possible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeSettings {
    pub prompt: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Characters of the reply kept as a preview.
    pub preview_chars: usize,
    /// Characters of an unclassified error shown as its friendly message.
    pub unknown_detail_chars: usize,
    /// Characters of error detail printed in the report.
    pub report_detail_chars: usize,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            prompt: "Hi".to_string(),
            max_tokens: 5,
            timeout_secs: 10,
            preview_chars: 50,
            unknown_detail_chars: 100,
            report_detail_chars: 200,
        }
    }
}

impl ProbeSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EndpointConfig {
    pub base_url: Option<String>,
    pub kind: Option<String>,
    /// Sent with every request to this endpoint (proxy auth, org ids).
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: ProbeSettings,
    pub include_defaults: bool,
    pub probes: Vec<ProviderDescriptor>,
    pub endpoints: HashMap<String, EndpointConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings: ProbeSettings::default(),
            include_defaults: true,
            probes: Vec::new(),
            endpoints: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct SettingsFile {
    prompt: Option<String>,
    max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
    preview_chars: Option<usize>,
    unknown_detail_chars: Option<usize>,
    report_detail_chars: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ConfigFile {
    include_defaults: Option<bool>,
    settings: Option<SettingsFile>,
    probes: Option<Vec<ProviderDescriptor>>,
    endpoints: Option<HashMap<String, EndpointConfig>>,
}

impl Config {
    /// Merge every config file that exists, then `extra` (which must exist).
    pub fn load(extra: Option<&Path>) -> Result<Self> {
        let mut paths: Vec<PathBuf> = default_config_paths()
            .into_iter()
            .filter(|p| p.exists())
            .collect();
        if let Some(extra) = extra {
            if !extra.exists() {
                return Err(anyhow!("config file not found: {}", extra.display()));
            }
            paths.push(extra.to_path_buf());
        }
        Self::load_from_paths(&paths)
    }

    pub fn load_from_paths(paths: &[PathBuf]) -> Result<Self> {
        let mut config = Config::default();
        for path in paths {
            tracing::debug!(path = %path.display(), "merging config file");
            let file = load_config_file(path)?;
            config.merge(file);
        }
        config.validate()?;
        Ok(config)
    }

    fn merge(&mut self, other: ConfigFile) {
        if let Some(include) = other.include_defaults {
            self.include_defaults = include;
        }
        if let Some(settings) = other.settings {
            merge_settings(&mut self.settings, settings);
        }
        if let Some(probes) = other.probes {
            self.probes.extend(probes);
        }
        if let Some(endpoints) = other.endpoints {
            for (k, v) in endpoints {
                self.endpoints
                    .entry(k)
                    .and_modify(|existing| merge_endpoint(existing, &v))
                    .or_insert(v);
            }
        }
    }

    fn validate(&self) -> Result<()> {
        for probe in &self.probes {
            if let Some(field) = probe.empty_field() {
                return Err(anyhow!(
                    "probe {:?} has an empty `{field}` field",
                    probe.display_name
                ));
            }
        }
        for (name, endpoint) in &self.endpoints {
            if let Some(kind) = endpoint.kind.as_deref() {
                kind.parse::<ProviderKind>()
                    .map_err(|e| anyhow!("endpoint {name}: {e}"))?;
            }
        }
        Ok(())
    }

    /// Built-in descriptors (unless disabled) followed by configured ones.
    pub fn descriptors(&self) -> Vec<ProviderDescriptor> {
        let mut out = if self.include_defaults {
            default_descriptors()
        } else {
            Vec::new()
        };
        out.extend(self.probes.iter().cloned());
        out
    }

    /// Client-side provider configs for every endpoint override.
    pub fn provider_overrides(&self) -> Result<Vec<(String, ProviderConfig)>> {
        let mut out = Vec::with_capacity(self.endpoints.len());
        for (name, endpoint) in &self.endpoints {
            let mut cfg = builtin_provider(name).unwrap_or_default();
            if let Some(base_url) = &endpoint.base_url {
                cfg.base_url = Some(base_url.clone());
            }
            if let Some(kind) = endpoint.kind.as_deref() {
                cfg.kind = kind
                    .parse::<ProviderKind>()
                    .map_err(|e| anyhow!("endpoint {name}: {e}"))?;
            }
            for (header, value) in &endpoint.headers {
                cfg = cfg.with_header(header, value);
            }
            if cfg.base_url.is_none() {
                return Err(anyhow!("endpoint {name} needs a base_url"));
            }
            out.push((name.clone(), cfg));
        }
        out.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(out)
    }
}

fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let parsed: ConfigFile =
        toml::from_str(&content).with_context(|| format!("parse config {}", path.display()))?;
    Ok(parsed)
}

fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(dir) = exe_dir() {
        paths.push(dir.join("keycheck.toml"));
    }
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        paths.push(PathBuf::from(xdg).join("keycheck/config.toml"));
    } else if let Some(home) = home_dir() {
        paths.push(home.join(".config/keycheck/config.toml"));
    }
    paths.push(PathBuf::from("./keycheck.toml"));

    if let Ok(custom) = env::var("KEYCHECK_CONFIG_PATH") {
        paths.push(PathBuf::from(custom));
    }
    paths
}

fn merge_settings(target: &mut ProbeSettings, other: SettingsFile) {
    if let Some(prompt) = other.prompt {
        target.prompt = prompt;
    }
    if let Some(max_tokens) = other.max_tokens {
        target.max_tokens = max_tokens;
    }
    if let Some(timeout_secs) = other.timeout_secs {
        target.timeout_secs = timeout_secs;
    }
    if let Some(preview_chars) = other.preview_chars {
        target.preview_chars = preview_chars;
    }
    if let Some(unknown_detail_chars) = other.unknown_detail_chars {
        target.unknown_detail_chars = unknown_detail_chars;
    }
    if let Some(report_detail_chars) = other.report_detail_chars {
        target.report_detail_chars = report_detail_chars;
    }
}

fn merge_endpoint(target: &mut EndpointConfig, other: &EndpointConfig) {
    if other.base_url.is_some() {
        target.base_url = other.base_url.clone();
    }
    if other.kind.is_some() {
        target.kind = other.kind.clone();
    }
    target
        .headers
        .extend(other.headers.iter().map(|(k, v)| (k.clone(), v.clone())));
}
