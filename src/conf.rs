//! Code for supporting the viewer configuration file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::mutations::{export::IgvSettings, filter::ViewState, load::InputLocations};

/// Settings of the annotation store synchronisation.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(default)]
pub struct SyncConf {
    /// URL of the `applyUpdates` endpoint; updates are only logged if unset.
    pub endpoint: Option<String>,
    /// Maximal number of delivery attempts per update.
    pub max_attempts: u32,
    /// Delay after the first failed attempt in milliseconds.
    pub retry_delay_ms: u64,
    /// Timeout of each request in seconds.
    pub timeout_secs: u64,
}

impl Default for SyncConf {
    fn default() -> Self {
        Self {
            endpoint: None,
            max_attempts: 3,
            retry_delay_ms: 500,
            timeout_secs: 10,
        }
    }
}

/// Top-level configuration.
#[derive(Serialize, Deserialize, PartialEq, Debug, Default, Clone)]
#[serde(default)]
pub struct Top {
    /// Input payload locations.
    pub inputs: InputLocations,
    /// Initial view toggles.
    pub view: ViewState,
    /// Annotation store synchronisation.
    pub sync: SyncConf,
    /// Genome browser hand-off.
    pub igv: IgvSettings,
}

impl Top {
    /// Load configuration from the TOML file at `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let toml_str = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            anyhow::anyhow!("could not read config {:?}: {}", path.as_ref(), e)
        })?;
        toml::from_str(&toml_str)
            .map_err(|e| anyhow::anyhow!("invalid config {:?}: {}", path.as_ref(), e))
    }
}

/// Command line arguments selecting and overriding the configuration.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConfArgs {
    /// Path to configuration TOML file.
    #[arg(long)]
    pub path_conf: Option<String>,
    /// Path or URL of the mutation table.
    #[arg(long)]
    pub path_data: Option<String>,
    /// Path or URL of the whitelist ("seen") file.
    #[arg(long)]
    pub path_whitelist: Option<String>,
    /// Path or URL of the blacklist file.
    #[arg(long)]
    pub path_blacklist: Option<String>,
    /// URL of the annotation store update endpoint.
    #[arg(long)]
    pub sync_endpoint: Option<String>,
    /// Show mutations that are not protein altering; `--show-silent=false`
    /// overrides the configuration file.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub show_silent: Option<bool>,
    /// Show blacklisted mutations; `--show-blacklisted=false` overrides the
    /// configuration file.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub show_blacklisted: Option<bool>,
}

impl ConfArgs {
    /// Load the configuration file (if any) and apply the overrides.
    pub fn resolve(&self) -> Result<Top, anyhow::Error> {
        let mut conf = match &self.path_conf {
            Some(path_conf) => Top::from_path(path_conf)?,
            None => Top::default(),
        };

        if let Some(path) = &self.path_data {
            conf.inputs.data = path.clone();
        }
        if let Some(path) = &self.path_whitelist {
            conf.inputs.whitelist = path.clone();
        }
        if let Some(path) = &self.path_blacklist {
            conf.inputs.blacklist = path.clone();
        }
        if let Some(endpoint) = &self.sync_endpoint {
            conf.sync.endpoint = Some(endpoint.clone());
        }
        if let Some(show_silent) = self.show_silent {
            conf.view.show_silent = show_silent;
        }
        if let Some(show_blacklisted) = self.show_blacklisted {
            conf.view.show_blacklisted = show_blacklisted;
        }

        for (name, value) in [
            ("data", &conf.inputs.data),
            ("whitelist", &conf.inputs.whitelist),
            ("blacklist", &conf.inputs.blacklist),
        ] {
            if value.is_empty() {
                anyhow::bail!("no location configured for {} input", name);
            }
        }

        Ok(conf)
    }
}
