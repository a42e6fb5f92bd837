//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hunter_protocol::Rank;

/// Hunter System: clear dungeons, earn XP, rank up.
#[derive(Debug, Parser)]
#[command(name = "hunter", version, about = "A gamified personal task tracker")]
pub struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store profiles under this directory (overrides config and $HUNTER_DATA_DIR).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Register a new dungeon.
    Add {
        /// Short title for the dungeon.
        title: String,
        /// Difficulty rank: E, D, C, B, A or S.
        #[arg(long, short, default_value = "C")]
        rank: Rank,
        /// Category label.
        #[arg(long, short, default_value = "General")]
        category: String,
        /// Longer description.
        #[arg(long, short, default_value = "")]
        description: String,
    },

    /// List dungeons.
    List {
        /// Also show cleared dungeons.
        #[arg(long, short)]
        all: bool,
    },

    /// Show one dungeon in detail.
    Show {
        /// Dungeon id, id prefix or title.
        task: String,
    },

    /// Clear a dungeon and collect its XP.
    Complete {
        /// Dungeon id, id prefix or title.
        task: String,
    },

    /// Reopen a cleared dungeon, returning its XP.
    Reopen {
        /// Dungeon id, id prefix or title.
        task: String,
    },

    /// Set the progress of a dungeon without objectives.
    Progress {
        /// Dungeon id, id prefix or title.
        task: String,
        /// Percentage, clamped to 0..=100.
        value: f64,
    },

    /// Manage the objectives of a dungeon.
    Subtask {
        #[command(subcommand)]
        action: SubtaskCommands,
    },

    /// Log time spent on a dungeon.
    Log {
        /// Dungeon id, id prefix or title.
        task: String,
        /// Minutes spent.
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        minutes: u32,
    },

    /// Delete a dungeon. Earned XP is kept.
    Delete {
        /// Dungeon id, id prefix or title.
        task: String,
    },

    /// Show the hunter dashboard.
    Stats {
        /// Output JSON.
        #[arg(long)]
        json: bool,
    },

    /// Ask the System for motivation.
    Motivate {
        /// Dungeon to be motivated about.
        task: Option<String>,
    },

    /// Ask the hunter assistant a question.
    Ask {
        /// The question.
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
        /// Send the message without the assistant persona.
        #[arg(long)]
        raw: bool,
    },

    /// Show the profile identity and storage location.
    Whoami,

    /// Erase all dungeons and progression for this profile.
    Reset {
        /// Confirm the reset.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum SubtaskCommands {
    /// Add an objective.
    Add {
        /// Dungeon id, id prefix or title.
        task: String,
        /// Objective title.
        title: String,
    },
    /// Tick or untick an objective.
    Toggle {
        /// Dungeon id, id prefix or title.
        task: String,
        /// Objective number (from `show`) or title.
        objective: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("hunter").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn add_defaults() {
        let cli = parse(&["add", "Daily Combat Training"]);
        match cli.command {
            Commands::Add {
                title,
                rank,
                category,
                description,
            } => {
                assert_eq!(title, "Daily Combat Training");
                assert_eq!(rank, Rank::C);
                assert_eq!(rank, Rank::default());
                assert_eq!(category, "General");
                assert!(description.is_empty());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn add_with_rank() {
        let cli = parse(&["add", "Raid", "--rank", "s", "-c", "Work"]);
        assert!(matches!(
            cli.command,
            Commands::Add { rank: Rank::S, ref category, .. } if category == "Work"
        ));
    }

    #[test]
    fn bad_rank_is_rejected() {
        let result = Cli::try_parse_from(["hunter", "add", "Raid", "--rank", "Z"]);
        assert!(result.is_err());
    }

    #[test]
    fn log_requires_positive_minutes() {
        assert!(Cli::try_parse_from(["hunter", "log", "Raid", "0"]).is_err());
        let cli = parse(&["log", "Raid", "30"]);
        assert!(matches!(cli.command, Commands::Log { minutes: 30, .. }));
    }

    #[test]
    fn ask_joins_words() {
        let cli = parse(&["ask", "how", "do", "I", "level", "up?", "--raw"]);
        match cli.command {
            Commands::Ask { message, raw } => {
                assert_eq!(message.join(" "), "how do I level up?");
                assert!(raw);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn subtask_toggle() {
        let cli = parse(&["subtask", "toggle", "React", "2"]);
        assert!(matches!(
            cli.command,
            Commands::Subtask {
                action: SubtaskCommands::Toggle { ref objective, .. }
            } if objective == "2"
        ));
    }

    #[test]
    fn global_data_dir() {
        let cli = parse(&["stats", "--data-dir", "/tmp/hunter"]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/hunter")));
    }

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
