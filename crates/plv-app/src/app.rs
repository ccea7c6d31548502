// Command orchestration.
//
// Resolves per-invocation settings against the config, pulls the season
// through the cache and renders the requested report in the chosen format.

use anyhow::{bail, Context};
use tracing::info;

use plv_core::arsenal::arsenal;
use plv_core::card::pitcher_card;
use plv_core::players::selectable_pitchers;
use plv_core::quality::quality_rates;

use crate::cache::{SeasonCache, SeasonSource};
use crate::cli::{Cli, Commands, OutputFormat};
use crate::config::Config;
use crate::report;

// ---------------------------------------------------------------------------
// Settings resolution
// ---------------------------------------------------------------------------

/// Season from the command line, else the configured default. Must be one of
/// the configured seasons.
pub fn resolve_season(requested: Option<i32>, config: &Config) -> anyhow::Result<i32> {
    let season = requested.unwrap_or(config.seasons.default);
    if !config.seasons.available.contains(&season) {
        bail!(
            "season {} is not configured (available: {:?})",
            season,
            config.seasons.available
        );
    }
    Ok(season)
}

fn require_text_or_json(format: OutputFormat, command: &str) -> anyhow::Result<()> {
    if format == OutputFormat::Csv {
        bail!("CSV output is only available for the pla command, not {command}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run one command and return the rendered report.
pub fn run<S: SeasonSource>(
    cli: &Cli,
    config: &Config,
    cache: &mut SeasonCache<S>,
) -> anyhow::Result<String> {
    let season = resolve_season(cli.season, config)?;
    let data = cache
        .get_or_load(season)
        .with_context(|| format!("failed to load season {season}"))?;
    let thresholds = &config.thresholds;

    let rendered = match &cli.command {
        Commands::Pla { min_pitches } => {
            let min = min_pitches.unwrap_or(thresholds.pla_min_pitches);
            let pla = data
                .pla(min)
                .with_context(|| format!("failed to compute PLA for {season}"))?;
            info!("pla: {} pitchers at >= {} pitches", pla.pitchers.len(), min);
            match cli.format {
                OutputFormat::Text => report::pla_table(&pla),
                OutputFormat::Json => report::to_json(season, &pla)?,
                OutputFormat::Csv => {
                    let mut buf = Vec::new();
                    report::write_pla_csv(&pla, &mut buf).context("failed to write PLA CSV")?;
                    String::from_utf8(buf)?
                }
            }
        }

        Commands::Quality { min_pitches } => {
            require_text_or_json(cli.format, "quality")?;
            let min = min_pitches.unwrap_or(thresholds.quality_min_pitches);
            let rates = quality_rates(&data.valued, min);
            match cli.format {
                OutputFormat::Json => report::to_json(season, &rates)?,
                _ => report::quality_table(season, &rates),
            }
        }

        Commands::Players { min_pitches } => {
            require_text_or_json(cli.format, "players")?;
            let min = min_pitches.unwrap_or(thresholds.pitcher_list_min_pitches);
            let pitchers = selectable_pitchers(&data.valued, min);
            match cli.format {
                OutputFormat::Json => report::to_json(season, &pitchers)?,
                _ => report::players_table(season, &pitchers),
            }
        }

        Commands::Arsenal {
            pitcher,
            hand,
            min_pitches,
        } => {
            require_text_or_json(cli.format, "arsenal")?;
            let min = min_pitches.unwrap_or(thresholds.arsenal_min_pitches);
            let result = arsenal(&data.valued, pitcher, (*hand).into(), min);
            match cli.format {
                OutputFormat::Json => report::to_json(season, &result)?,
                _ => report::arsenal_text(season, &result),
            }
        }

        Commands::Card { pitcher } => {
            require_text_or_json(cli.format, "card")?;
            // Every selectable pitcher gets a PLA line.
            let pla = data
                .pla(thresholds.pitcher_list_min_pitches)
                .with_context(|| format!("failed to compute PLA for {season}"))?;
            let Some(card) = pitcher_card(&data.valued, &pla.pitchers, pitcher, thresholds.card())
            else {
                bail!("no pitches found for {pitcher} in {season}");
            };
            match cli.format {
                OutputFormat::Json => report::to_json(season, &card)?,
                _ => report::card_text(&card),
            }
        }
    };

    Ok(rendered)
}
