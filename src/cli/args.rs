//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ConfigColorMode};
use crate::consts::DEFAULT_API_URL;

use super::commands::Commands;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser, Debug)]
#[command(name = "medibot")]
#[command(about = "Chat with MediBot from the terminal", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Backend base URL
    #[arg(long, global = true, value_name = "URL")]
    pub(crate) api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub(crate) timeout: Option<u64>,

    /// Timezone for history dates (e.g., "Asia/Kolkata", "UTC")
    #[arg(long, global = true, value_name = "TZ")]
    pub(crate) timezone: Option<String>,

    /// Directory holding the chat state
    #[arg(long, global = true, env = "MEDIBOT_HOME", value_name = "DIR")]
    pub(crate) data_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }

        if let Some(color) = config.color
            && self.color == ColorMode::Auto
        {
            self.color = match color {
                ConfigColorMode::Auto => ColorMode::Auto,
                ConfigColorMode::Always => ColorMode::Always,
                ConfigColorMode::Never => ColorMode::Never,
            };
        }

        if self.api_url.is_none() {
            self.api_url = config.api_url.clone();
        }
        if self.timeout.is_none() {
            self.timeout = config.timeout_secs;
        }
        if self.timezone.is_none() {
            self.timezone = config.timezone.clone();
        }
        if self.data_dir.is_none() {
            self.data_dir = config.data_dir.clone();
        }

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }

    pub(crate) fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS).max(1))
    }

    /// `--data-dir`/`MEDIBOT_HOME`, then config, then the platform data dir
    pub(crate) fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("medibot")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("medibot").chain(args.iter().copied()))
    }

    #[test]
    fn no_subcommand_means_chat() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn send_joins_words() {
        let cli = parse(&["send", "my", "head", "hurts"]);
        match cli.command {
            Some(Commands::Send { text }) => assert_eq!(text.join(" "), "my head hurts"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_flags_beat_config() {
        let config = Config {
            api_url: Some("http://config".to_string()),
            timeout_secs: Some(3),
            color: Some(ConfigColorMode::Always),
            ..Config::default()
        };
        let cli = parse(&["--api-url", "http://flag", "--color", "never"]).with_config(&config);
        assert_eq!(cli.api_url(), "http://flag");
        assert_eq!(cli.timeout(), Duration::from_secs(3));
        assert_eq!(cli.color, ColorMode::Never);
    }

    #[test]
    fn config_fills_unset_values() {
        let config = Config {
            timezone: Some("UTC".to_string()),
            debug: true,
            color: Some(ConfigColorMode::Never),
            ..Config::default()
        };
        let cli = parse(&[]).with_config(&config);
        assert_eq!(cli.timezone.as_deref(), Some("UTC"));
        assert!(cli.debug);
        assert!(!cli.use_color());
    }

    #[test]
    fn defaults_point_at_local_backend() {
        let cli = parse(&["show"]);
        assert_eq!(cli.api_url(), "http://127.0.0.1:8000");
        assert_eq!(cli.timeout(), Duration::from_secs(30));
    }
}
