use crate::core::models::atom::Atom;
use crate::engine::config::ClusterConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::tasks::clustering;
use tracing::{info, instrument};

/// Groups previously placed sites into clusters, largest first.
///
/// # Errors
///
/// - [`EngineError::EmptyInput`] if `sites` is empty.
/// - Any error of the clustering task.
#[instrument(skip_all, name = "cluster_workflow")]
pub fn run(
    sites: &[Atom],
    config: &ClusterConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<Vec<Atom>>, EngineError> {
    if sites.is_empty() {
        return Err(EngineError::EmptyInput("sites to cluster"));
    }

    let clusters = reporter.phase("Clustering Sites", || {
        clustering::run(sites, config.grid_spacing, config.hash_spacing, reporter)
    })?;

    info!(
        sites = sites.len(),
        clusters = clusters.len(),
        "Clustering workflow complete."
    );
    Ok(clusters)
}
