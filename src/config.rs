use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Apps Script deployment that backs the practice log sheet.
pub const DEFAULT_ENDPOINT_URL: &str = "https://script.google.com/macros/s/AKfycbzoMEl_KNd6sByZF3ycDl2gUMLdBFSD51PpUh0C9nJTf_DwNZi7LveQZ-TVZjefiFTG/exec";

const DEFAULT_CONFIG_PATH: &str = "./config.toml";

#[derive(Parser, Debug)]
#[clap(name = "practice-log", version, about = "Log practice sessions and track progress")]
pub struct Cli {
    /// Path to configuration file
    #[clap(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Override the log endpoint URL
    #[clap(long, global = true)]
    pub endpoint_url: Option<String>,

    /// Skip the confetti after a successful submission
    #[clap(long, global = true)]
    pub reduce_motion: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[clap(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log a practice session
    Log {
        #[clap(long, default_value = "")]
        name: String,
        #[clap(long, default_value = "")]
        event: String,
        #[clap(long, default_value = "")]
        minutes: String,
        #[clap(long, default_value = "")]
        notes: String,
    },

    /// Show an athlete's progress
    Progress {
        #[clap(long, default_value = "")]
        name: String,
    },

    /// Coach tools
    Coach {
        #[clap(subcommand)]
        action: CoachCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum CoachCommand {
    /// Unlock the coach tools on this machine
    Unlock {
        #[clap(long, default_value = "")]
        pin: String,
    },

    /// Lock the coach tools again
    Lock,

    /// Load every athlete's logs
    All,

    /// Wipe the season's logs
    Reset {
        #[clap(long, default_value = "")]
        pin: String,

        /// Confirmation phrase; prompted for when omitted
        #[clap(long)]
        confirm: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint_url: String,
    pub request_timeout_secs: u64,
    pub reduce_motion: bool,
    pub coach_pin: Option<String>,
    pub unlock_flag_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            request_timeout_secs: 15,
            reduce_motion: false,
            coach_pin: None,
            unlock_flag_path: PathBuf::from(".practice-log-coach-unlocked"),
        }
    }
}

pub fn load_config(cli: &Cli) -> Result<Config> {
    let optional = cli.config == Path::new(DEFAULT_CONFIG_PATH);
    let mut config = read_config(&cli.config, optional)?;

    // Apply CLI overrides
    if let Some(ref endpoint_url) = cli.endpoint_url {
        config.endpoint_url = endpoint_url.clone();
    }

    if cli.reduce_motion {
        config.reduce_motion = true;
    }

    Ok(config)
}

/// Reads `path`; when `optional`, a missing file yields the defaults.
pub fn read_config(path: &Path, optional: bool) -> Result<Config> {
    if optional && !path.exists() {
        log::debug!("No config file at {:?}, using defaults", path);
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    parse_config(&config_content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).context("Failed to parse config file")
}
