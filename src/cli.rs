use clap::Parser;

use crate::config::Config;

/// Content publishing and video generation API
#[derive(Debug, Parser)]
#[command(name = "content-publisher", version, about)]
pub struct Cli {
    /// Address to bind (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory for rotated log files (overrides LOG_DIR)
    #[arg(long)]
    pub log_dir: Option<String>,
}

impl Cli {
    /// Apply command-line overrides on top of the environment configuration
    pub fn apply(self, mut config: Config) -> Config {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(log_dir) = self.log_dir {
            config.log_dir = log_dir;
        }
        config
    }
}
