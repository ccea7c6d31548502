use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use plv_core::model::HandFilter;

#[derive(Parser, Debug)]
#[command(name = "plv")]
#[command(version, about = "Pitch-level PLV and PLA season reports")]
pub struct Cli {
    /// Season to report on (defaults to the configured default season)
    #[arg(short, long, global = true)]
    pub season: Option<i32>,

    /// Output format
    #[arg(short, long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the report to this file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Season PLA table, overall and per pitch type
    Pla {
        /// Minimum season pitches to be listed
        #[arg(short, long)]
        min_pitches: Option<u32>,
    },

    /// Quality, average and bad pitch rates per pitcher
    Quality {
        /// Minimum pitches to be listed
        #[arg(short, long)]
        min_pitches: Option<u32>,
    },

    /// Pitchers with enough pitches to be selected, by mean PLV
    Players {
        /// Minimum pitches to be listed
        #[arg(short, long)]
        min_pitches: Option<u32>,
    },

    /// PLV distribution by pitch type for one pitcher
    Arsenal {
        /// Pitcher name as it appears in the pitch data
        pitcher: String,

        /// Restrict to batters of this hand
        #[arg(long, value_enum, default_value_t = HandArg::All)]
        hand: HandArg,

        /// Minimum pitches against the selected batters
        #[arg(short, long)]
        min_pitches: Option<u32>,
    },

    /// Pitcher card with league percentiles and PLA
    Card {
        /// Pitcher name as it appears in the pitch data
        pitcher: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HandArg {
    #[value(alias = "l", alias = "lhh")]
    Left,
    All,
    #[value(alias = "r", alias = "rhh")]
    Right,
}

impl From<HandArg> for HandFilter {
    fn from(arg: HandArg) -> Self {
        match arg {
            HandArg::Left => HandFilter::Left,
            HandArg::All => HandFilter::All,
            HandArg::Right => HandFilter::Right,
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "plv", "arsenal", "Shane McClanahan", "--hand", "lhh", "--season", "2021", "-f", "json",
        ])
        .unwrap();
        assert_eq!(cli.season, Some(2021));
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Arsenal {
                pitcher,
                hand,
                min_pitches,
            } => {
                assert_eq!(pitcher, "Shane McClanahan");
                assert_eq!(HandFilter::from(hand), HandFilter::Left);
                assert_eq!(min_pitches, None);
            }
            other => panic!("expected arsenal, got {other:?}"),
        }
    }

    #[test]
    fn pla_defaults_to_text() {
        let cli = Cli::try_parse_from(["plv", "pla", "-m", "250"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(matches!(cli.command, Commands::Pla { min_pitches: Some(250) }));
    }
}
