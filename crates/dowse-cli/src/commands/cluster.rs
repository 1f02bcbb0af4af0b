use crate::cli::ClusterArgs;
use crate::commands::output_path;
use crate::config;
use crate::error::{CliError, Result};
use crate::utils::format::hms;
use crate::utils::progress::CliProgressHandler;
use dowse::{
    core::io::{
        pdb::{ClusteredPdbFile, PdbFile, PdbMetadata},
        traits::MolecularFile,
    },
    engine::progress::ProgressReporter,
    workflows,
};
use std::time::Instant;
use tracing::info;

pub fn run(args: ClusterArgs) -> Result<()> {
    let start = Instant::now();
    let app = config::build_cluster_config(&args)?;

    info!("Loading sites from {:?}", &app.input_path);
    let (sites, metadata) =
        PdbFile::read_from_path(&app.input_path).map_err(|e| CliError::FileParsing {
            path: app.input_path.clone(),
            source: e.into(),
        })?;
    println!("Clustering {} sites...", sites.len());

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let clusters = workflows::cluster::run(&sites, &app.core_config, &reporter);
    progress_handler.finish();
    let clusters = clusters?;

    let mut remarks = metadata.remarks;
    remarks.push(format!("grid spacing = {:.6}", app.core_config.grid_spacing));

    let output = output_path(&app.output_prefix, "");
    info!("Writing {} clusters to {:?}", clusters.len(), &output);
    ClusteredPdbFile::write_to_path(&clusters, &PdbMetadata::with_remarks(remarks), &output)
        .map_err(|e| CliError::FileWriting {
            path: output.clone(),
            source: e.into(),
        })?;

    let clustered: usize = clusters.iter().map(Vec::len).sum();
    println!("Found {} clusters covering {} sites.", clusters.len(), clustered);
    println!("Clustered sites written to: {}", output.display());
    println!("Time: {}", hms(start.elapsed()));
    Ok(())
}
