use std::{fs, io, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";
pub const SETTINGS_FILE: &str = "riddle.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    /// `None` keeps requests open until the solver answers.
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    endpoint: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then `riddle.toml` from the working directory, then the environment.
pub fn load_settings() -> anyhow::Result<Settings> {
    let raw = match fs::read_to_string(SETTINGS_FILE) {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {SETTINGS_FILE}"));
        }
    };
    resolve_settings(raw.as_deref(), |name| std::env::var(name).ok())
}

pub fn resolve_settings(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        let file_cfg: FileSettings =
            toml::from_str(raw).with_context(|| format!("invalid {SETTINGS_FILE}"))?;
        if let Some(v) = file_cfg.endpoint {
            settings.endpoint = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            settings.request_timeout_secs = Some(v);
        }
    }

    if let Some(v) = env("RIDDLE_ENDPOINT") {
        settings.endpoint = v;
    }
    if let Some(v) = env("APP__ENDPOINT") {
        settings.endpoint = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        let secs = v.trim().parse::<u64>().with_context(|| {
            format!("APP__REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{v}'")
        })?;
        settings.request_timeout_secs = Some(secs);
    }

    Ok(settings)
}

impl Settings {
    pub fn with_endpoint_override(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        self
    }

    pub fn endpoint_url(&self) -> anyhow::Result<Url> {
        let raw = self.endpoint.trim();
        if raw.is_empty() {
            bail!("solver endpoint is empty");
        }
        let url = Url::parse(raw).with_context(|| format!("invalid solver endpoint '{raw}'"))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "solver endpoint '{raw}' must use http or https, not '{}'",
                url.scheme()
            );
        }
        if url.cannot_be_a_base() {
            bail!("solver endpoint '{raw}' cannot carry a path");
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
