use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use client_core::GatewayConfig;
use serde::Deserialize;
use shared::protocol::INSERT_LOCATION_RPC;
use url::Url;

const DEFAULT_CONFIG_FILE: &str = "listing.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: Option<String>,
    pub anon_key: String,
    pub rpc_name: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: None,
            anon_key: String::new(),
            rpc_name: INSERT_LOCATION_RPC.into(),
            log_level: "info".into(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    backend_url: Option<String>,
    anon_key: Option<String>,
    rpc_name: Option<String>,
    log_level: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl Settings {
    /// Backend connection, or `None` when no backend URL is configured.
    pub fn gateway_config(&self) -> anyhow::Result<Option<GatewayConfig>> {
        let Some(raw_url) = self
            .backend_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
        else {
            return Ok(None);
        };

        let backend_url =
            Url::parse(raw_url).with_context(|| format!("invalid backend url '{raw_url}'"))?;
        if !matches!(backend_url.scheme(), "http" | "https") {
            bail!("backend url '{raw_url}' must use http or https");
        }

        let mut config = GatewayConfig::new(backend_url, self.anon_key.clone());
        config.rpc_name = self.rpc_name.clone();
        config.request_timeout = Duration::from_secs(self.request_timeout_secs);
        Ok(Some(config))
    }
}

/// Defaults, then the TOML file, then environment variables. An explicit
/// `path` must exist; the default `listing.toml` is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    dotenvy::dotenv().ok();

    let mut settings = Settings::default();

    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    if let Some(file_cfg) = read_file_settings(&path, required)? {
        apply_file_settings(&mut settings, file_cfg);
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn read_file_settings(path: &Path, required: bool) -> anyhow::Result<Option<FileSettings>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    };
    let parsed = toml::from_str::<FileSettings>(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
    Ok(Some(parsed))
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.backend_url {
        settings.backend_url = Some(v);
    }
    if let Some(v) = file_cfg.anon_key {
        settings.anon_key = v;
    }
    if let Some(v) = file_cfg.rpc_name {
        settings.rpc_name = v;
    }
    if let Some(v) = file_cfg.log_level {
        settings.log_level = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
}

pub(crate) fn apply_env_overrides(
    settings: &mut Settings,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    // Later names win.
    for key in ["VITE_SUPABASE_URL", "SUPABASE_URL", "APP__BACKEND_URL"] {
        if let Some(v) = env(key) {
            settings.backend_url = Some(v);
        }
    }
    for key in ["VITE_SUPABASE_ANON_KEY", "SUPABASE_ANON_KEY", "APP__ANON_KEY"] {
        if let Some(v) = env(key) {
            settings.anon_key = v;
        }
    }

    if let Some(v) = env("APP__RPC_NAME") {
        settings.rpc_name = v;
    }
    if let Some(v) = env("APP__LOG_LEVEL") {
        settings.log_level = v;
    }
    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = v
            .trim()
            .parse()
            .with_context(|| format!("APP__REQUEST_TIMEOUT_SECS must be whole seconds, got '{v}'"))?;
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
