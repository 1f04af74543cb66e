//! Server configuration from command-line flags and environment variables.

use clap::Parser;
use std::path::PathBuf;
use workshop_core::default_log_level;

/// Runtime configuration for `workshop-server`.
#[derive(Debug, Clone, Parser)]
#[command(name = "workshop-server", version, about = "Workshop registration REST API")]
pub struct ServerConfig {
    /// Interface to bind.
    #[arg(long, env = "WORKSHOP_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// TCP port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// SQLite database file; created and migrated on first start.
    #[arg(long, env = "WORKSHOP_DB_PATH", default_value = "workshop.db")]
    pub db_path: PathBuf,

    /// trace|debug|info|warn|error; defaults by build mode.
    #[arg(long, env = "WORKSHOP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; stderr when unset.
    #[arg(long, env = "WORKSHOP_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Skip inserting demo users and workshops into an empty database.
    #[arg(long, env = "WORKSHOP_NO_SEED")]
    pub no_seed: bool,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn effective_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or_else(|| default_log_level())
    }
}
