use anyhow::{bail, Context};
use clap::Parser;
use log::{Level, LevelFilter};
use pixie_responsive::config::SAMPLE_CONFIG;
use pixie_responsive::{BatchProcessor, Cli, Commands, OptimizerConfig};
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .format(|buf, record| match record.level() {
            Level::Error => writeln!(buf, "[ERROR] {}", record.args()),
            Level::Warn => writeln!(buf, "[WARNING] {}", record.args()),
            Level::Info => writeln!(buf, "{}", record.args()),
            _ => writeln!(buf, "[{}] {}", record.level(), record.args()),
        })
        .init();

    let result = match cli.action() {
        Commands::Run => process_run(&cli.config),
        Commands::Plan => process_plan(&cli.config),
        Commands::Init { force } => process_init(&cli.config, force),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}. Exiting.", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: &Path) -> anyhow::Result<OptimizerConfig> {
    OptimizerConfig::load(path)
        .with_context(|| format!("Failed to load config {}", path.display()))
}

fn process_run(config_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let summary = BatchProcessor::new(config).run()?;

    log::info!(
        "Done. {} saved, {} skipped, {} failed.",
        summary.saved(),
        summary.skipped(),
        summary.failed()
    );

    Ok(())
}

fn process_plan(config_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let batch = BatchProcessor::new(config);
    batch.preflight()?;

    let tasks = batch.planned_tasks();
    for task in &tasks {
        println!(
            "{} -> {} @ {}px",
            task.input_path.display(),
            task.output_path.display(),
            task.target_width
        );
    }

    let favicons = batch.planned_favicons();
    for path in &favicons {
        println!("favicon -> {}", path.display());
    }

    println!("{} file(s) would be written.", tasks.len() + favicons.len());
    Ok(())
}

fn process_init(config_path: &Path, force: bool) -> anyhow::Result<()> {
    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    std::fs::write(config_path, SAMPLE_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Sample configuration written to: {}", config_path.display());
    Ok(())
}
