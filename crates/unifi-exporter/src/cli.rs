//! Clap derive structures for the `unifi-exporter` binary.
//!
//! Flags override the layered config file and `UNIFI_EXPORTER_*` settings.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use unifi_exporter_config::{Config, LogFormat, PlatformChoice};

/// unifi-exporter -- Prometheus metrics for UniFi controller devices
#[derive(Debug, Parser)]
#[command(
    name = "unifi-exporter",
    version,
    about = "Export UniFi controller device metrics for Prometheus",
    long_about = "Serves device inventory, uptime, traffic and station metrics\n\
        scraped from a UniFi controller in the Prometheus text format."
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, short = 'c', env = "UNIFI_EXPORTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to serve metrics on
    #[arg(long, short = 'l')]
    pub listen: Option<SocketAddr>,

    /// Path under which metrics are exposed
    #[arg(long)]
    pub metrics_path: Option<String>,

    /// Prefix for every exported metric name
    #[arg(long)]
    pub namespace: Option<String>,

    /// Controller URL
    #[arg(long, short = 'u')]
    pub controller: Option<String>,

    /// Controller username
    #[arg(long)]
    pub username: Option<String>,

    /// Only monitor the site with this description
    #[arg(long, short = 's')]
    pub site: Option<String>,

    /// Controller platform
    #[arg(long, value_enum)]
    pub platform: Option<PlatformArg>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k')]
    pub insecure: bool,

    /// Per-request controller timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormatArg>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub print_config: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PlatformArg {
    /// Probe the controller
    Auto,
    /// UniFi OS console (UDM, Cloud Key Gen2+)
    UnifiOs,
    /// Standalone network application
    Classic,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl Cli {
    /// Layer flag overrides onto the loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(listen) = self.listen {
            config.listen = listen;
        }
        if let Some(ref path) = self.metrics_path {
            config.metrics_path.clone_from(path);
        }
        if let Some(ref ns) = self.namespace {
            config.namespace.clone_from(ns);
        }
        if let Some(ref url) = self.controller {
            config.controller.url = Some(url.clone());
        }
        if let Some(ref username) = self.username {
            config.controller.username = Some(username.clone());
        }
        if let Some(ref site) = self.site {
            config.controller.site.clone_from(site);
        }
        if let Some(platform) = self.platform {
            config.controller.platform = match platform {
                PlatformArg::Auto => PlatformChoice::Auto,
                PlatformArg::UnifiOs => PlatformChoice::UnifiOs,
                PlatformArg::Classic => PlatformChoice::Classic,
            };
        }
        if self.insecure {
            config.controller.insecure = true;
        }
        if let Some(timeout) = self.timeout {
            config.controller.timeout_secs = timeout;
        }
        if let Some(format) = self.log_format {
            config.log.format = match format {
                LogFormatArg::Text => LogFormat::Text,
                LogFormatArg::Json => LogFormat::Json,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "unifi-exporter",
            "--listen",
            "127.0.0.1:9000",
            "--site",
            "Foo",
            "--platform",
            "unifi-os",
            "-k",
            "--timeout",
            "9",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.listen.to_string(), "127.0.0.1:9000");
        assert_eq!(config.controller.site, "Foo");
        assert_eq!(config.controller.platform, PlatformChoice::UnifiOs);
        assert!(config.controller.insecure);
        assert_eq!(config.controller.timeout_secs, 9);
        assert_eq!(config.metrics_path, "/metrics");
    }
}
