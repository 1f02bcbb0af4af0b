use crate::cli::SolvateArgs;
use crate::commands::output_path;
use crate::config::{self, SolvateAppConfig};
use crate::error::{CliError, Result};
use crate::utils::format::{hms, percent};
use crate::utils::progress::CliProgressHandler;
use dowse::{
    core::io::{
        pdb::{ClusteredPdbFile, PdbFile, PdbMetadata, WaterPdbFile},
        traits::MolecularFile,
        vert::VertFile,
    },
    engine::progress::ProgressReporter,
    workflows::{self, solvate::SolvationResult},
};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

pub fn run(args: SolvateArgs) -> Result<()> {
    let start = Instant::now();
    let app = config::build_solvate_config(&args)?;

    info!("Loading input structure from {:?}", &app.pdb_path);
    let (atoms, metadata) =
        PdbFile::read_from_path(&app.pdb_path).map_err(|e| CliError::FileParsing {
            path: app.pdb_path.clone(),
            source: e.into(),
        })?;
    info!("Loading surface vertices from {:?}", &app.vert_path);
    let (surface, _) =
        VertFile::read_from_path(&app.vert_path).map_err(|e| CliError::FileParsing {
            path: app.vert_path.clone(),
            source: e.into(),
        })?;
    println!(
        "Placing solvent sites for {} atoms against {} surface vertices...",
        atoms.len(),
        surface.len()
    );

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let result = workflows::solvate::run(&atoms, &surface, &app.core_config, &reporter);
    progress_handler.finish();
    let result = result?;

    if app.write_intermediates {
        write_intermediates(&app, &result)?;
    }

    let mut remarks = metadata.remarks;
    remarks.extend(run_remarks(&app));
    let output = output_path(&app.output_prefix, "");
    ClusteredPdbFile::write_to_path(&result.clusters, &PdbMetadata::with_remarks(remarks), &output)
        .map_err(|e| CliError::FileWriting {
            path: output.clone(),
            source: e.into(),
        })?;

    print_summary(&result);
    if result.sites.is_empty() {
        warn!("No solvent site survived the overlap filter.");
    }
    println!("Clustered sites written to: {}", output.display());
    println!("Time: {}", hms(start.elapsed()));
    Ok(())
}

fn run_remarks(app: &SolvateAppConfig) -> Vec<String> {
    let cfg = &app.core_config;
    vec![
        format!("grid spacing = {:.6}", cfg.grid.spacing),
        format!("surface +- {}", cfg.surface.search_radius),
        format!("water diameter = {:.6}", cfg.solvent.probe_diameter),
        format!("vert file = {}", app.vert_path.display()),
    ]
}

fn write_intermediates(app: &SolvateAppConfig, result: &SolvationResult) -> Result<()> {
    let prefix = &app.output_prefix;
    write_points(&output_path(prefix, "_in"), &result.classification.inside)?;
    write_points(&output_path(prefix, "_out"), &result.classification.outside)?;
    write_points(&output_path(prefix, "_void"), &result.void.points)?;

    let sites_path = output_path(prefix, "_sites");
    info!("Writing {} unclustered sites to {:?}", result.sites.len(), &sites_path);
    PdbFile::write_to_path(&result.sites, &PdbMetadata::default(), &sites_path).map_err(|e| {
        CliError::FileWriting {
            path: sites_path.clone(),
            source: e.into(),
        }
    })
}

fn write_points(path: &Path, points: &<WaterPdbFile as MolecularFile>::Data) -> Result<()> {
    info!("Writing {} points to {:?}", points.len(), path);
    WaterPdbFile::write_to_path(points, &(), path).map_err(|e| CliError::FileWriting {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

fn print_summary(result: &SolvationResult) {
    let stats = &result.stats;
    println!("Total lattice points: {}", stats.lattice_points);
    println!(
        "Removed outside the void: {} ({})",
        stats.removed,
        percent(stats.removed, stats.lattice_points)
    );
    println!(
        "Void points: {} ({} clashing, {} isolated)",
        result.void.points.len(),
        stats.rejected,
        stats.isolated
    );
    println!("Solvent sites: {} in {} clusters", stats.sites, stats.clusters);
}
