use std::{env, fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use dirs::{config_dir, home_dir};
use serde::Deserialize;
use tracing::{info, warn};

use crate::dispatch::Deadlines;

const APP_DIR: &str = "ssmpick";

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    aws_binary: Option<String>,
    bootstrap_region: Option<String>,
    credentials_file: Option<String>,
    list_timeout_secs: Option<u64>,
    preview_timeout_secs: Option<u64>,
    tick_millis: Option<u64>,
    window_size: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub aws_binary: String,
    pub bootstrap_region: String,
    pub credentials_file: PathBuf,
    pub deadlines: Deadlines,
    pub window_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aws_binary: "aws".into(),
            bootstrap_region: "us-west-2".into(),
            credentials_file: default_credentials_file(),
            deadlines: Deadlines::default(),
            window_size: 20,
        }
    }
}

impl Config {
    fn apply(&mut self, raw: RawConfig) {
        if let Some(binary) = raw.aws_binary {
            self.aws_binary = binary;
        }
        if let Some(region) = raw.bootstrap_region {
            self.bootstrap_region = region;
        }
        if let Some(path) = raw.credentials_file {
            self.credentials_file = expand_home(&path);
        }
        if let Some(secs) = raw.list_timeout_secs {
            self.deadlines.list = Duration::from_secs(secs);
        }
        if let Some(secs) = raw.preview_timeout_secs {
            self.deadlines.preview = Duration::from_secs(secs);
        }
        if let Some(millis) = raw.tick_millis {
            self.deadlines.tick = Duration::from_millis(millis.max(1));
        }
        if let Some(rows) = raw.window_size {
            self.window_size = rows.max(1);
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// Defaults overlaid with the user's config file, when one exists and parses.
pub fn load_config() -> Config {
    let mut config = Config::default();
    let Some(path) = config_path() else {
        return config;
    };
    let Ok(contents) = fs::read_to_string(&path) else {
        return config;
    };
    match parse_overrides(&contents) {
        Ok(raw) => {
            config.apply(raw);
            info!(path = %path.display(), "loaded config");
        }
        Err(err) => {
            warn!(path = %path.display(), "ignoring config: {err:#}");
            eprintln!("Failed to parse config {}: {err:#}", path.display());
        }
    }
    config
}

fn parse_overrides(contents: &str) -> Result<RawConfig> {
    toml::from_str(contents).context("parse config toml")
}

fn default_credentials_file() -> PathBuf {
    match env::var_os("AWS_SHARED_CREDENTIALS_FILE") {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => expand_home("~/.aws/credentials"),
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
