// Report rendering: plain-text tables, the PLA CSV export and JSON output.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

use plv_core::arsenal::{ArsenalReport, PLV_BIN_WIDTH, PLV_MIN};
use plv_core::card::{CardLine, PitcherCard};
use plv_core::model::{HandFilter, PitchType};
use plv_core::pipeline::PlaReport;
use plv_core::players::PitcherOverview;
use plv_core::quality::PitcherQualityRates;

/// Column headers of the PLA export.
pub const PLA_CSV_HEADER: [&str; 10] = [
    "Pitcher", "# Pitches", "PLA", "FF", "SI", "SL", "CH", "CU", "FC", "FS",
];

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "-".to_string(),
    }
}

fn hand_filter_label(filter: HandFilter) -> &'static str {
    match filter {
        HandFilter::Left => "vs LHH",
        HandFilter::All => "vs all hitters",
        HandFilter::Right => "vs RHH",
    }
}

fn card_line_label(line: &CardLine) -> &'static str {
    line.pitch_type.map_or("Overall", |pt| pt.code())
}

// ---------------------------------------------------------------------------
// Text tables
// ---------------------------------------------------------------------------

pub fn pla_table(report: &PlaReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "# {} Pitch Level Average (min {} pitches)",
        report.season, report.min_pitches
    );
    let _ = writeln!(out);

    if report.pitchers.is_empty() {
        let _ = writeln!(out, "No pitchers meet the pitch threshold.");
    } else {
        let _ = write!(out, "{:<24} {:>9} {:>6}", "Pitcher", "# Pitches", "PLA");
        for pt in PitchType::REPORT_ORDER {
            let _ = write!(out, " {:>6}", pt.code());
        }
        let _ = writeln!(out);

        for p in &report.pitchers {
            let _ = write!(
                out,
                "{:<24} {:>9} {:>6}",
                p.pitcher_name,
                p.season_pitch_count,
                fmt_opt(p.season_rate_stat, 2)
            );
            for rate in p.report_rates() {
                let _ = write!(out, " {:>6}", fmt_opt(rate, 2));
            }
            let _ = writeln!(out);
        }
    }

    if !report.join_gaps.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} pitchers had no workload record and are not rated.",
            report.join_gaps.len()
        );
    }
    out
}

pub fn quality_table(season: i32, rates: &[PitcherQualityRates]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {season} Pitch Quality Rates");
    let _ = writeln!(out);

    if rates.is_empty() {
        let _ = writeln!(out, "No pitchers meet the pitch threshold.");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<24} {:>9} {:>6} {:>6} {:>6} {:>7}",
        "Pitcher", "# Pitches", "QP%", "AP%", "BP%", "QP-BP%"
    );
    for r in rates {
        let _ = writeln!(
            out,
            "{:<24} {:>9} {:>6.1} {:>6.1} {:>6.1} {:>7.1}",
            r.pitcher_name, r.pitch_count, r.quality_pct, r.average_pct, r.bad_pct, r.qp_minus_bp_pct
        );
    }
    out
}

pub fn players_table(season: i32, pitchers: &[PitcherOverview]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {season} Pitchers");
    for p in pitchers {
        let _ = writeln!(
            out,
            "- {} ({} pitches, mean PLV {:.2})",
            p.pitcher_name, p.pitch_count, p.mean_plv
        );
    }
    out
}

pub fn arsenal_text(season: i32, report: &ArsenalReport) -> String {
    let mut out = String::new();
    let arsenal = match report {
        ArsenalReport::NotEnoughPitches {
            pitches_thrown,
            threshold,
        } => {
            let _ = writeln!(
                out,
                "Not enough pitches thrown in {season} ({pitches_thrown}, need {threshold})."
            );
            return out;
        }
        ArsenalReport::Arsenal(arsenal) => arsenal,
    };

    let _ = writeln!(
        out,
        "# {}: {} PLV distribution by pitch type ({})",
        arsenal.pitcher_name,
        season,
        hand_filter_label(arsenal.hand_filter)
    );
    let _ = writeln!(out, "{} pitches thrown", arsenal.pitches_thrown);

    for entry in &arsenal.entries {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "## {} ({}): {} pitches, {:.1}% usage",
            entry.pitch_type.display_name(),
            entry.pitch_type.code(),
            entry.pitch_count,
            entry.usage_pct
        );
        let _ = writeln!(
            out,
            "mean PLV {:.2}, league {}",
            entry.mean_plv,
            fmt_opt(entry.league_mean_plv, 2)
        );
        let peak = entry.histogram.iter().copied().max().unwrap_or(0).max(1);
        for (i, count) in entry.histogram.iter().enumerate() {
            if *count == 0 {
                continue;
            }
            let lower = PLV_MIN + i as f64 * PLV_BIN_WIDTH;
            let bar = "#".repeat(((*count * 40).div_ceil(peak)) as usize);
            let _ = writeln!(
                out,
                "{:>4.1}-{:<4.1} {:>5} {}",
                lower,
                lower + PLV_BIN_WIDTH,
                count,
                bar
            );
        }
    }
    out
}

pub fn card_text(card: &PitcherCard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {} {} Pitcher Card", card.season, card.pitcher_name);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<8} {:>8} {:>7} {:>6} {:>6} {:>6}",
        "Type", "Pitches", "Usage%", "PLV", "Pctl", "PLA"
    );
    for line in std::iter::once(&card.overall).chain(&card.pitch_types) {
        let _ = writeln!(
            out,
            "{:<8} {:>8} {:>7} {:>6.2} {:>6} {:>6}",
            card_line_label(line),
            line.pitch_count,
            fmt_opt(line.usage_pct, 1),
            line.mean_plv,
            fmt_opt(line.plv_percentile, 0),
            fmt_opt(line.pla, 2)
        );
    }
    out
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Write the PLA table; missing values are blank cells.
pub fn write_pla_csv<W: std::io::Write>(report: &PlaReport, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(PLA_CSV_HEADER)?;

    let cell = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
    for p in &report.pitchers {
        let mut record = vec![
            p.pitcher_name.clone(),
            p.season_pitch_count.to_string(),
            cell(p.season_rate_stat),
        ];
        record.extend(p.report_rates().map(cell));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct JsonEnvelope<'a, T: Serialize> {
    pub generated_at: DateTime<Utc>,
    pub season: i32,
    pub report: &'a T,
}

pub fn to_json<T: Serialize>(season: i32, report: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonEnvelope {
        generated_at: Utc::now(),
        season,
        report,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
