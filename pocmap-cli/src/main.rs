mod args;
mod config;
mod prompt;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use args::Args;
use config::Settings;
use pocmap_core::{Dispatcher, RunReport, ScanEngine, TargetError, clean_target_file, group_rows};
use pocmap_output::{OutputConfig, OutputManager, OutputSpec, read_table};
use pocmap_runner::{FingerprintRunner, NucleiRunner};
use pocmap_vuln::{AdvisorySearch, CheckResolver, CirclSearch, DefinitionStore, OfflineSearch};
use prompt::Mode;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let mut settings = Settings::load(args.config.as_deref())?;
    settings.apply_args(&args);

    let (mode, name) = collect_inputs(&args)?;
    let table = match mode {
        Mode::CleanAndFingerprint => fingerprint_targets(&settings, &name).await?,
        Mode::ExistingTable => {
            let table = table_path(&name);
            if !table.is_file() {
                bail!("cannot find {}, check that it exists", table.display());
            }
            table
        }
    };

    let rows = read_table(&table, &settings.io.input_sheet)
        .with_context(|| format!("failed to read target table {}", table.display()))?;
    let (cms, server) = group_rows(&rows);
    info!(
        table = %table.display(),
        cms = cms.len(),
        server = server.len(),
        "grouped targets"
    );

    let engine = build_engine(&settings).await?;
    let report = engine.run(&[cms, server]).await;
    print_waves(&report);

    OutputManager::new(OutputConfig {
        outputs: vec![OutputSpec::for_path(settings.io.report.clone())],
        stdout: true,
    })
    .run(&report.findings)
    .context("failed to write report")?;

    Ok(())
}

/// Mode and file name, from flags or interactively.
fn collect_inputs(args: &Args) -> Result<(Mode, String)> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let mode = match args.mode {
        Some(m) => Mode::parse(&m.to_string())?,
        None => prompt::ask_mode(&mut input, &mut output)?,
    };
    let name = match args.input {
        Some(ref n) => n.trim().to_string(),
        None => prompt::ask_name(&mut input, &mut output, mode)?,
    };
    let name = prompt::strip_extension(&name, mode.input_extension()).to_string();
    Ok((mode, name))
}

fn table_path(name: &str) -> PathBuf {
    PathBuf::from(format!("{name}.xlsx"))
}

fn cleaned_list_path(name: &str) -> PathBuf {
    PathBuf::from(format!("{name}_cleaned.txt"))
}

/// Clean `<name>.txt`, stage it for the fingerprint tool and run the tool.
/// A failing tool is reported and the run continues with whatever table
/// exists.
async fn fingerprint_targets(settings: &Settings, name: &str) -> Result<PathBuf> {
    let fingerprinter = FingerprintRunner::new(&settings.tools.ehole, &settings.tools.ehole_dir);
    let list = PathBuf::from(format!("{name}.txt"));
    let cleaned = cleaned_list_path(name);
    let staged = fingerprinter.staged_list(&cleaned);

    let targets = match clean_target_file(&list, &[cleaned.clone(), staged.clone()]) {
        Ok(targets) => targets,
        Err(TargetError::Missing(path)) => bail!("cannot find {}, check that it exists", path.display()),
        Err(e) => return Err(e).context("failed to clean target list"),
    };
    println!("cleaned {} targets into {}", targets.len(), cleaned.display());

    let table = table_path(name);
    if let Err(e) = fingerprinter.run(&staged, &table).await {
        warn!(error = %e, "fingerprint tool failed, continuing");
        println!("fingerprint tool failed (continuing): {e}");
    }
    Ok(table)
}

async fn build_engine(settings: &Settings) -> Result<ScanEngine> {
    let results_dir = &settings.scan.results_dir;
    tokio::fs::create_dir_all(results_dir)
        .await
        .with_context(|| format!("failed to create results directory {}", results_dir.display()))?;

    let search: Arc<dyn AdvisorySearch> = if settings.search.enabled {
        Arc::new(
            CirclSearch::new(
                &settings.search.endpoint,
                settings.search.max_results,
                Duration::from_secs(settings.search.timeout_secs),
            )
            .context("failed to set up advisory search")?,
        )
    } else {
        info!("advisory search disabled, resolving from local definitions only");
        Arc::new(OfflineSearch)
    };

    let defs = &settings.definitions;
    let store = DefinitionStore::new(&defs.root, &defs.advisory_dir)
        .with_advisory_prefix(&defs.advisory_prefix)
        .with_extension(&defs.extension);
    warn_missing_dir(store.root());

    let runner = NucleiRunner::new(&settings.tools.nuclei, results_dir)
        .with_json_flag(&settings.tools.nuclei_json_flag)
        .with_timeout(Some(Duration::from_secs(settings.scan.task_timeout_secs)));

    let dispatcher = Dispatcher::new(
        Arc::new(CheckResolver::new(search, store)),
        Arc::new(runner),
        settings.scan.concurrency,
    );
    Ok(ScanEngine::new(dispatcher))
}

fn warn_missing_dir(dir: &Path) {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "definition directory not found, local lookups will find nothing");
    }
}

fn print_waves(report: &RunReport) {
    for wave in &report.waves {
        println!(
            "===== {}: {} fingerprints scanned, {} skipped, {} checks run, {} failed =====",
            wave.kind,
            wave.fingerprints,
            wave.skipped.len(),
            wave.tasks_scheduled,
            wave.tasks_failed,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_file_names() {
        assert_eq!(table_path("targets"), PathBuf::from("targets.xlsx"));
        assert_eq!(cleaned_list_path("lists/t"), PathBuf::from("lists/t_cleaned.txt"));
    }

    #[tokio::test]
    async fn engine_builds_offline() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.search.enabled = false;
        settings.scan.results_dir = dir.path().join("results");
        settings.scan.concurrency = 0;

        let engine = build_engine(&settings).await.unwrap();
        assert!(settings.scan.results_dir.is_dir());
        assert_eq!(engine.dispatcher().capacity(), 1);
    }
}
