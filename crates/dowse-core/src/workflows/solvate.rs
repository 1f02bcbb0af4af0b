use crate::core::models::atom::Atom;
use crate::core::models::bounds::BoundingBox;
use crate::core::models::surface::SurfaceVertex;
use crate::core::radii::RadiusLookup;
use crate::engine::config::{RadiusSource, SolvationConfig, SolventConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::spatial_hash::SpatialHashGrid;
use crate::engine::tasks::classify::{self, Classification};
use crate::engine::tasks::clustering;
use crate::engine::tasks::flood_fill::{self, VoidFill};
use crate::engine::tasks::overlap::{self, OverlapTester};
use tracing::{info, instrument, warn};

/// Counts describing one solvation run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SolvationStats {
    /// Cells of the flood-fill lattice.
    pub lattice_points: usize,
    /// Lattice cells not reached by the flood fill.
    pub removed: usize,
    pub sites: usize,
    pub clusters: usize,
    /// Void points discarded for overlapping an atom.
    pub rejected: usize,
    /// Void points with no atom within the contact cutoff.
    pub isolated: usize,
}


#[derive(Debug, Clone)]
pub struct SolvationResult {
    /// Padded bounds every lattice of the run was built over.
    pub bounds: BoundingBox,
    pub classification: Classification,
    pub void: VoidFill,
    /// Accepted solvent sites, in flood-fill order.
    pub sites: Vec<Atom>,
    /// The sites grouped into clusters, largest first.
    pub clusters: Vec<Vec<Atom>>,
    pub stats: SolvationStats,
}

/// Places solvent sites in the voids enclosed by `surface`.
///
/// The lattice bounds are the atom bounding box snapped outward to whole Angstroms
/// and padded. Lattice points are classified against the surface, the interior is
/// flood filled from the inside points with the outside points as walls, void points
/// clashing with an atom are discarded, and the survivors are clustered.
///
/// # Errors
///
/// - [`EngineError::EmptyInput`] if `atoms` or `surface` is empty.
/// - [`EngineError::Radii`] if a radius override file cannot be loaded.
/// - Any error of the individual tasks, e.g. an oversized lattice.
#[instrument(skip_all, name = "solvation_workflow")]
pub fn run(
    atoms: &[Atom],
    surface: &[SurfaceVertex],
    config: &SolvationConfig,
    reporter: &ProgressReporter,
) -> Result<SolvationResult, EngineError> {
    if atoms.is_empty() {
        return Err(EngineError::EmptyInput("structure atoms"));
    }
    if surface.is_empty() {
        return Err(EngineError::EmptyInput("surface vertices"));
    }

    // === Phase 0: Radii, bounds and spatial index ===
    let (resolved, lookup, bounds, grid) = reporter.phase("Preparation", || {
        let (resolved, lookup) = resolve_radii(atoms, &config.solvent)?;
        let bounds = BoundingBox::from_points(resolved.iter().map(|a| &a.position))
            .ok_or(EngineError::EmptyInput("structure atoms"))?
            .snapped_outward(config.grid.padding);
        let grid = SpatialHashGrid::build(&resolved, config.grid.hash_spacing)?;
        info!(
            atoms = resolved.len(),
            min = ?bounds.min,
            max = ?bounds.max,
            "Prepared structure for solvation."
        );
        Ok::<_, EngineError>((resolved, lookup, bounds, grid))
    })?;

    // === Phase 1: Inside/outside classification ===
    let classification = reporter.phase("Classifying Lattice", || {
        classify::run(
            surface,
            &bounds,
            config.grid.spacing,
            config.surface.search_radius,
            config.surface.classifier,
            config.grid.max_lattice_cells,
            reporter,
        )
    })?;
    if classification.inside.is_empty() {
        warn!("No lattice point was classified as inside the surface; no void can be filled.");
    }

    // === Phase 2: Void flood fill ===
    let void = reporter.phase("Filling Void", || {
        flood_fill::run(
            &classification.outside,
            &classification.inside,
            &bounds,
            config.grid.spacing,
            config.grid.max_lattice_cells,
            reporter,
        )
    })?;

    // === Phase 3: Overlap filter ===
    let filtered = reporter.phase("Removing Overlaps", || {
        let tester = OverlapTester::new(
            &resolved,
            &grid,
            &lookup,
            config.solvent.probe_diameter,
            config.solvent.contact_cutoff,
        )?;
        Ok::<_, EngineError>(overlap::run(
            &tester,
            &void.points,
            config.solvent.keep_isolated,
            reporter,
        ))
    })?;
    let sites: Vec<Atom> = filtered.accepted.iter().copied().map(Atom::solvent).collect();

    // === Phase 4: Clustering ===
    let clusters = reporter.phase("Clustering Sites", || {
        clustering::run(&sites, config.grid.spacing, config.grid.hash_spacing, reporter)
    })?;

    let stats = SolvationStats {
        lattice_points: void.lattice_cells,
        removed: void.lattice_cells.saturating_sub(void.points.len()),
        sites: sites.len(),
        clusters: clusters.len(),
        rejected: filtered.rejected,
        isolated: filtered.isolated,
    };
    info!(
        lattice_points = stats.lattice_points,
        removed = stats.removed,
        sites = stats.sites,
        clusters = stats.clusters,
        "Solvation complete."
    );

    Ok(SolvationResult {
        bounds,
        classification,
        void,
        sites,
        clusters,
        stats,
    })
}

/// Returns a copy of `atoms` with every radius resolved, and the lookup used for it.
fn resolve_radii(
    atoms: &[Atom],
    solvent: &SolventConfig,
) -> Result<(Vec<Atom>, RadiusLookup), EngineError> {
    let lookup = match &solvent.radii_path {
        Some(path) => RadiusLookup::with_overrides_from_path(path)?,
        None => RadiusLookup::new(),
    };

    let mut missing_b_factors = 0usize;
    let resolved = atoms
        .iter()
        .map(|atom| {
            let mut atom = atom.clone();
            if atom.radius().is_some() {
                return atom;
            }
            let from_b_factor = match solvent.radius_source {
                RadiusSource::Table => None,
                RadiusSource::TemperatureFactor => {
                    let b = atom.temperature_factor.filter(|b| b.is_finite() && *b > 0.0);
                    if b.is_none() {
                        missing_b_factors += 1;
                    }
                    b
                }
            };
            let radius = from_b_factor
                .unwrap_or_else(|| lookup.all_atom_radius(&atom.residue_name, &atom.atom_name));
            atom.set_radius(radius);
            atom
        })
        .collect();

    if missing_b_factors > 0 {
        warn!(
            count = missing_b_factors,
            "Atoms without a usable temperature factor fell back to the radius table."
        );
    }
    Ok((resolved, lookup))
}
