//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Courier using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Courier - Parcel declaration submission client
#[derive(Parser, Debug)]
#[command(name = "courier")]
#[command(version, about, long_about = None)]
#[command(author = "Courier Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "courier.toml", env = "COURIER_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "COURIER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate, encode and deliver a declaration
    Submit(commands::submit::SubmitArgs),

    /// Poll the record store for a tracking number
    Verify(commands::verify::VerifyArgs),

    /// Check that the configured endpoint is reachable
    Ping(commands::ping::PingArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransportKind;

    #[test]
    fn test_cli_parse_submit() {
        let cli = Cli::parse_from([
            "courier",
            "submit",
            "--tracking",
            "ABC-123",
            "--phone",
            "0123456789",
            "--quantity",
            "2",
            "--price",
            "19.99",
            "--category",
            "*Gadgets",
            "--file",
            "a.jpg",
            "--file",
            "b.pdf",
        ]);
        assert_eq!(cli.config, "courier.toml");
        match cli.command {
            Commands::Submit(args) => {
                assert_eq!(args.tracking, "ABC-123");
                assert_eq!(args.files.len(), 2);
                assert!(args.transport.is_none());
                assert!(!args.no_verify);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_transport_override() {
        let cli = Cli::parse_from([
            "courier",
            "submit",
            "-t",
            "X1",
            "-p",
            "0123456789",
            "-q",
            "1",
            "--price",
            "0",
            "--category",
            "Books",
            "--transport",
            "hidden-frame",
            "--no-verify",
        ]);
        match cli.command {
            Commands::Submit(args) => {
                assert_eq!(args.transport, Some(TransportKind::HiddenFrame));
                assert!(args.no_verify);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["courier", "--config", "custom.toml", "ping"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::Ping(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["courier", "--log-level", "debug", "validate-config"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_verify() {
        let cli = Cli::parse_from(["courier", "verify", "--tracking", "ABC-123"]);
        assert!(matches!(cli.command, Commands::Verify(ref args) if args.tracking == "ABC-123"));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["courier", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
