//! CLI module - Command-line interface for Marquee
//!
//! This module provides a structured CLI using clap for argument parsing.

pub mod commands;

use clap::{Parser, Subcommand};

/// Marquee - movie catalog API
/// Movies, actors, genres and reviews behind session and API key auth
#[derive(Parser)]
#[command(name = "marquee")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve,

    /// Write a default config.toml in the current directory
    Init,

    /// Give a user admin rights
    GrantAdmin {
        /// Account to promote
        username: String,
    },

    /// Take admin rights away from a user
    RevokeAdmin {
        /// Account to demote
        username: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["marquee"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_parses_admin_commands() {
        let cli = Cli::try_parse_from(["marquee", "grant-admin", "alice"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::GrantAdmin {
                username: "alice".to_string()
            })
        );

        let cli = Cli::try_parse_from(["marquee", "revoke-admin", "alice"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::RevokeAdmin { .. })));

        assert!(Cli::try_parse_from(["marquee", "grant-admin"]).is_err());
    }
}
