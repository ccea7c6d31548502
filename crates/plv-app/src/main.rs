// plv entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Initialize tracing (log to file, not terminal)
// 3. Load config
// 4. Run the command through the season cache
// 5. Print or write the report

use plv_app::app;
use plv_app::cache::{CsvSource, SeasonCache};
use plv_app::cli::Cli;
use plv_app::config;

use anyhow::Context;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // 1. Parse arguments
    let cli = Cli::parse_args();

    // 2. Initialize tracing
    init_tracing()?;
    info!("plv starting up");

    // 3. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: seasons {:?}, default {}",
        config.seasons.available, config.seasons.default
    );

    // 4. Run the command
    let mut cache = SeasonCache::new(CsvSource::new(config.data_paths.clone()));
    let rendered = app::run(&cli, &config, &mut cache)?;

    // 5. Emit
    match &cli.output {
        Some(path) => {
            // A bare file name lands in the configured report directory.
            let target = if path.components().count() == 1 {
                std::path::Path::new(&config.output.dir).join(path)
            } else {
                path.clone()
            };
            if let Some(dir) = target.parent() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create {}", dir.display()))?;
            }
            std::fs::write(&target, rendered)
                .with_context(|| format!("failed to write {}", target.display()))?;
            info!("Report written to {}", target.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

/// Initialize tracing to log to a file (stdout carries the report).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("plv.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("plv=info,plv_app=info,plv_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
