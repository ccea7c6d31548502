// Integration tests for plv-app: CSV fixtures through loaders, cache and
// command dispatch.

use clap::Parser;

use plv_app::app;
use plv_app::cache::{CsvSource, SeasonCache};
use plv_app::cli::Cli;
use plv_app::config::{Config, DataPaths, OutputConfig, SeasonsConfig, ThresholdsConfig};
use plv_app::loaders::{load_season_tables, LoadError};
use plv_core::PitchType;

const FIXTURES: &str = "tests/fixtures";

// ===========================================================================
// Test helpers
// ===========================================================================

fn fixture_paths() -> DataPaths {
    DataPaths {
        pitches: format!("{FIXTURES}/{{season}}_PLV_App_Data.csv"),
        seasonal_constants: format!("{FIXTURES}/plv_seasonal_constants.csv"),
        workload: format!("{FIXTURES}/fangraphs_workload.csv"),
        crosswalk: format!("{FIXTURES}/chadwick_register.csv"),
    }
}

/// Config over the fixtures with thresholds small enough for the tiny season.
fn fixture_config() -> Config {
    Config {
        seasons: SeasonsConfig {
            available: vec![2022, 2021],
            default: 2022,
        },
        thresholds: ThresholdsConfig {
            pla_min_pitches: 1,
            pitcher_list_min_pitches: 20,
            arsenal_min_pitches: 20,
            quality_min_pitches: 20,
            card_overall_min_pitches: 20,
            card_pitch_type_min_pitches: 20,
        },
        output: OutputConfig {
            dir: "reports".into(),
        },
        data_paths: fixture_paths(),
    }
}

fn run(args: &[&str]) -> anyhow::Result<String> {
    run_with(&fixture_config(), args)
}

fn run_with(config: &Config, args: &[&str]) -> anyhow::Result<String> {
    let mut cache = SeasonCache::new(CsvSource::new(config.data_paths.clone()));
    let mut argv = vec!["plv"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv)?;
    app::run(&cli, config, &mut cache)
}

fn json(args: &[&str]) -> serde_json::Value {
    let mut argv = args.to_vec();
    argv.extend_from_slice(&["--format", "json"]);
    let text = run(&argv).unwrap();
    serde_json::from_str(&text).unwrap()
}

// ===========================================================================
// Loading
// ===========================================================================

#[test]
fn fixture_season_loads_all_tables() {
    let tables = load_season_tables(&fixture_paths(), 2022).unwrap();
    assert_eq!(tables.pitches.len(), 97);
    assert_eq!(tables.workloads.len(), 3);
    // Charlie (no fangraphs id) and the row without an mlbam id are dropped.
    assert_eq!(tables.crosswalk.len(), 2);
    assert_eq!(tables.crosswalk.external_id(200), Some(1200));
}

#[test]
fn season_without_constants_is_missing() {
    match load_season_tables(&fixture_paths(), 2020).unwrap_err() {
        LoadError::MissingSeason { season } => assert_eq!(season, 2020),
        other => panic!("expected MissingSeason, got: {other}"),
    }
}

#[test]
fn season_without_pitch_file_is_io_error() {
    match load_season_tables(&fixture_paths(), 2021).unwrap_err() {
        LoadError::Io { path, .. } => assert!(path.ends_with("2021_PLV_App_Data.csv")),
        other => panic!("expected Io, got: {other}"),
    }
}

#[test]
fn cache_values_season_once() {
    let mut cache = SeasonCache::new(CsvSource::new(fixture_paths()));
    let first = cache.get_or_load(2022).unwrap();
    let second = cache.get_or_load(2022).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    // Knuckleball excluded, sorted by pitch id.
    assert_eq!(first.valued.len(), 96);
    assert!(first.valued.windows(2).all(|w| w[0].pitch.pitch_id < w[1].pitch.pitch_id));
    assert!(first
        .valued
        .iter()
        .all(|v| v.pitch.pitch_type != PitchType::Knuckleball));
}

// ===========================================================================
// PLA
// ===========================================================================

#[test]
fn pla_json_matches_hand_computed_values() {
    let value = json(&["pla"]);
    let pitchers = value["report"]["pitchers"].as_array().unwrap();
    let names: Vec<&str> = pitchers
        .iter()
        .map(|p| p["pitcher_name"].as_str().unwrap())
        .collect();
    // Ascending PLA.
    assert_eq!(names, vec!["Bravo Arm", "Alpha Arm"]);

    // Bravo: 25 pitches * 0.3 runs over 6 2/3 innings.
    let bravo = &pitchers[0];
    assert!((bravo["season_rate_stat"].as_f64().unwrap() - 10.125).abs() < 1e-9);
    assert!((bravo["pitch_type_rates"]["FF"].as_f64().unwrap() - 10.125).abs() < 1e-9);

    // Alpha: 29.7 runs over 12 1/3 innings; FF share 30/52 of the innings.
    let alpha = &pitchers[1];
    assert_eq!(alpha["season_pitch_count"], 52);
    let ip = 12.0 + 1.0 / 3.0;
    assert!((alpha["season_rate_stat"].as_f64().unwrap() - 29.7 * 9.0 / ip).abs() < 1e-9);
    let ff_proxy = 30.0 / 52.0 * ip;
    assert!((alpha["pitch_type_rates"]["FF"].as_f64().unwrap() - 15.0 * 9.0 / ff_proxy).abs() < 1e-9);
    assert!(alpha["pitch_type_rates"]["KN"].is_null());

    let gaps = value["report"]["join_gaps"].as_array().unwrap();
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0]["pitcher_name"], "Charlie Arm");
}

#[test]
fn pla_csv_export() {
    let text = run(&["pla", "--format", "csv"]).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Pitcher,# Pitches,PLA,FF,SI,SL,CH,CU,FC,FS");
    assert_eq!(lines.len(), 3);
    let cells: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(cells.len(), 10);
    assert_eq!(&cells[..2], &["Bravo Arm", "25"]);
    assert!((cells[2].parse::<f64>().unwrap() - 10.125).abs() < 1e-9);
    assert!((cells[3].parse::<f64>().unwrap() - 10.125).abs() < 1e-9);
    assert!(cells[4..].iter().all(|c| c.is_empty()));
}

#[test]
fn pla_threshold_from_command_line() {
    let text = run(&["pla", "--min-pitches", "500"]).unwrap();
    assert!(text.contains("No pitchers meet the pitch threshold."));
    assert!(text.contains("1 pitchers had no workload record"));
}

// ===========================================================================
// PLV-only reports
// ===========================================================================

#[test]
fn quality_rates_ordered_by_margin() {
    let value = json(&["quality"]);
    let rows = value["report"].as_array().unwrap();
    let names: Vec<&str> = rows
        .iter()
        .map(|r| r["pitcher_name"].as_str().unwrap())
        .collect();
    // Charlie has no workload but still appears in PLV-only output.
    assert_eq!(names, vec!["Alpha Arm", "Charlie Arm", "Bravo Arm"]);
    assert!((rows[0]["quality_pct"].as_f64().unwrap() - 31.0 * 100.0 / 51.0).abs() < 1e-9);
    assert!((rows[2]["qp_minus_bp_pct"].as_f64().unwrap() + 100.0).abs() < 1e-9);
}

#[test]
fn players_ordered_by_mean_plv() {
    let text = run(&["players"]).unwrap();
    let order: Vec<usize> = ["Alpha Arm", "Charlie Arm", "Bravo Arm"]
        .iter()
        .map(|n| text.find(n).unwrap())
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn arsenal_all_hands() {
    let value = json(&["arsenal", "Alpha Arm"]);
    let arsenal = &value["report"]["Arsenal"];
    assert_eq!(arsenal["pitches_thrown"], 51);
    let entries = arsenal["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["pitch_type"], "FF");
    assert!((entries[0]["usage_pct"].as_f64().unwrap() - 58.8).abs() < 1e-9);
    assert!((entries[1]["usage_pct"].as_f64().unwrap() - 41.2).abs() < 1e-9);
    // League four-seam mean: Alpha 30 @ 5.0 avg, Bravo 25 @ 4.0.
    let league = entries[0]["league_mean_plv"].as_f64().unwrap();
    assert!((league - 250.0 / 55.0).abs() < 1e-9);
}

#[test]
fn arsenal_against_lefties_drops_thin_pitch_types() {
    let value = json(&["arsenal", "Alpha Arm", "--hand", "left"]);
    let arsenal = &value["report"]["Arsenal"];
    assert_eq!(arsenal["pitches_thrown"], 26);
    assert_eq!(arsenal["pitcher_hands"][0], "R");
    assert!(arsenal["entries"].as_array().unwrap().is_empty());

    let text = run(&["arsenal", "Alpha Arm", "--hand", "left", "-m", "200"]).unwrap();
    assert!(text.contains("Not enough pitches thrown in 2022 (26, need 200)."));
}

#[test]
fn card_shows_percentile_and_pla() {
    let value = json(&["card", "Alpha Arm"]);
    let overall = &value["report"]["overall"];
    assert_eq!(overall["pitch_count"], 51);
    // Highest mean PLV among the three qualifying pitchers.
    assert!((overall["plv_percentile"].as_f64().unwrap() - 100.0).abs() < 1e-9);
    assert!(overall["pla"].as_f64().is_some());

    let text = run(&["card", "Alpha Arm"]).unwrap();
    assert!(text.contains("2022 Alpha Arm Pitcher Card"));
    assert!(text.contains("Overall"));
}

#[test]
fn card_pla_follows_selector_threshold() {
    let mut config = fixture_config();
    // Above either pitcher's season count: the PLA table alone would be empty.
    config.thresholds.pla_min_pitches = 1000;
    let text = run_with(&config, &["card", "Alpha Arm", "--format", "json"]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let ip = 12.0 + 1.0 / 3.0;
    let pla = value["report"]["overall"]["pla"].as_f64().unwrap();
    assert!((pla - 29.7 * 9.0 / ip).abs() < 1e-9);

    config.thresholds.pitcher_list_min_pitches = 1000;
    let text = run_with(&config, &["card", "Alpha Arm", "--format", "json"]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(value["report"]["overall"]["pla"].is_null());
}

// ===========================================================================
// Errors
// ===========================================================================

#[test]
fn unknown_pitcher_card_is_an_error() {
    let err = run(&["card", "Nobody"]).unwrap_err();
    assert!(err.to_string().contains("no pitches found for Nobody"));
}

#[test]
fn unconfigured_season_is_rejected() {
    let err = run(&["pla", "--season", "2019"]).unwrap_err();
    assert!(err.to_string().contains("season 2019 is not configured"));
}

#[test]
fn csv_format_only_for_pla() {
    let err = run(&["quality", "--format", "csv"]).unwrap_err();
    assert!(err.to_string().contains("only available for the pla command"));
}
