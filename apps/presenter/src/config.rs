use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::Context;

pub const DEFAULT_CONFIG_PATH: &str = "presenter.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub request_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".into(),
            request_timeout: client_core::DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Defaults, then the settings file (if present), then environment overrides.
/// A missing file is fine; an unreadable or malformed one is an error.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())
        .context("invalid environment override")?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(raw)?;
    if let Some(v) = file_cfg.get("server_url").and_then(toml::Value::as_str) {
        settings.server_url = v.to_string();
    }
    if let Some(v) = file_cfg
        .get("request_timeout_secs")
        .and_then(toml::Value::as_integer)
    {
        let secs = u64::try_from(v).context("request_timeout_secs must not be negative")?;
        settings.request_timeout = request_timeout(secs)?;
    }
    Ok(())
}

fn request_timeout(secs: u64) -> anyhow::Result<Duration> {
    anyhow::ensure!(secs > 0, "request timeout must be at least one second");
    Ok(Duration::from_secs(secs))
}

fn apply_env(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("JEOPARDY_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        let secs = v.trim().parse::<u64>().with_context(|| {
            format!("APP__REQUEST_TIMEOUT_SECS '{v}' is not a whole number of seconds")
        })?;
        settings.request_timeout = request_timeout(secs)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
