//! Command-line interface for the parley service.

use std::path::PathBuf;

use clap::Parser;

/// Stateful chat sessions over a chat-completion API.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "parley")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Work directory holding config.yaml and local state
    #[arg(long, env = "PARLEY_PATH")]
    pub path: Option<PathBuf>,

    /// Port for the HTTP service
    #[arg(long, env = "PARLEY_PORT")]
    pub port: Option<u16>,

    /// Configuration file, defaults to <path>/config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// `--path`, else `~/.parley`.
    pub fn work_dir(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }

        match std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
            Some(home) => PathBuf::from(home).join(".parley"),
            None => PathBuf::from(".parley"),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.work_dir().join("config.yaml"))
    }
}
