//! CLI argument parsing for Rsh/Rsb tools
//!
//! # Design Principles (KISS)
//! - Use clap's derive macro for declarative argument definition
//! - Common arguments shared via composition, not inheritance
//! - Each binary has its own Args struct that embeds CommonArgs

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Common arguments shared across all tools
#[derive(Parser, Debug, Clone)]
pub struct CommonArgs {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(short = 'f', long = "config")]
    pub config_file: Option<PathBuf>,
}

/// Arguments for the `rsh_tool` inspection binary
#[derive(Parser, Debug, Clone)]
#[command(name = "rsh_tool")]
#[command(about = "Inspect Rsh/Rsb data-acquisition files")]
#[command(version)]
pub struct ToolArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: ToolCommand,
}

/// Subcommands of `rsh_tool`
#[derive(Subcommand, Debug, Clone)]
pub enum ToolCommand {
    /// Show header summary
    Info {
        /// Path to the .rsb file
        file: PathBuf,
    },

    /// Render the binary header as a text configuration header
    TextHeader {
        /// Path to the .rsb file
        file: PathBuf,
    },

    /// Print one event record
    Event {
        /// Path to the .rsb file
        file: PathBuf,

        /// Event index
        #[arg(allow_negative_numbers = true)]
        index: i64,

        /// Number of samples to print
        #[arg(short = 'n', long, default_value = "16")]
        samples: usize,
    },

    /// Print the decoded binary header as JSON
    DumpJson {
        /// Path to the .rsb file
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_args() {
        let args = ToolArgs::parse_from(["rsh_tool", "info", "run.rsb"]);
        assert!(args.common.config_file.is_none());
        assert!(matches!(args.command, ToolCommand::Info { .. }));
    }

    #[test]
    fn test_event_args() {
        let args = ToolArgs::parse_from([
            "rsh_tool", "-f", "rsh.toml", "event", "run.rsb", "3", "-n", "4",
        ]);
        assert_eq!(args.common.config_file, Some(PathBuf::from("rsh.toml")));
        match args.command {
            ToolCommand::Event { index, samples, .. } => {
                assert_eq!(index, 3);
                assert_eq!(samples, 4);
            }
            _ => panic!("Expected Event command"),
        }
    }

    #[test]
    fn test_event_default_samples() {
        let args = ToolArgs::parse_from(["rsh_tool", "event", "run.rsb", "0"]);
        match args.command {
            ToolCommand::Event { samples, .. } => assert_eq!(samples, 16),
            _ => panic!("Expected Event command"),
        }
    }

    #[test]
    fn test_text_header_subcommand_name() {
        let args = ToolArgs::parse_from(["rsh_tool", "text-header", "run.rsb"]);
        assert!(matches!(args.command, ToolCommand::TextHeader { .. }));
    }
}
