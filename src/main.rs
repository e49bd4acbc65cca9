//! scenery-check: importiert eine OpenDRIVE-Datei und gibt Kennzahlen aus.
//!
//! Aufruf: `scenery-check <datei.xodr> [--options <optionen.toml>] [--json]`

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use road_scenery::{ImportOptions, LaneGraph, SceneryImporter};

struct CliArgs {
    input: PathBuf,
    options: Option<PathBuf>,
    json: bool,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut input = None;
        let mut options = None;
        let mut json = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--json" => json = true,
                "--options" => {
                    let path = args.next().context("--options erwartet einen Pfad")?;
                    options = Some(PathBuf::from(path));
                }
                flag if flag.starts_with("--") => bail!("Unbekannte Option: {}", flag),
                _ if input.is_some() => bail!("Nur eine Eingabedatei erlaubt: {}", arg),
                _ => input = Some(PathBuf::from(arg)),
            }
        }

        Ok(Self {
            input: input.context(
                "Aufruf: scenery-check <datei.xodr> [--options <optionen.toml>] [--json]",
            )?,
            options,
            json,
        })
    }
}

fn main() -> ExitCode {
    // Logger initialisieren (RUST_LOG überschreibt den Standard)
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse(std::env::args().skip(1))?;

    let options = match &args.options {
        Some(path) => ImportOptions::load_from_file(path),
        None => ImportOptions::load_from_file(&ImportOptions::config_path()),
    };

    let report = SceneryImporter::new(options)
        .import_file(&args.input)
        .with_context(|| format!("Import von {} fehlgeschlagen", args.input.display()))?;
    let graph = LaneGraph::build(&report.scenery).context("Lane-Graph ungueltig")?;
    let summary = report.summary();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        log::info!(
            "{} Straßen ({:.1} m), {} Junctions mit {} Connections",
            summary.roads,
            summary.total_length,
            summary.junctions,
            summary.connections
        );
        log::info!(
            "{} Lane-Sections, {} Lanes, {} Objekte, {} Signale",
            summary.lane_sections,
            summary.lanes,
            summary.objects,
            summary.signals
        );
        log::info!(
            "Lane-Graph: {} Knoten, {} Kanten",
            graph.node_count(),
            graph.edge_count()
        );
        for warning in &summary.warnings {
            log::warn!("{}", warning);
        }
    }
    Ok(())
}
