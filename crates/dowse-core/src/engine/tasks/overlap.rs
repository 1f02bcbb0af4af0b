use crate::core::models::atom::Atom;
use crate::core::radii::RadiusLookup;
use crate::engine::config::{ConfigError, require_positive};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::spatial_hash::SpatialHashGrid;
use nalgebra::Point3;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Candidates tested between two progress increments.
const PROGRESS_CHUNK: usize = 1000;

/// Verdict for a single candidate solvent position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapOutcome {
    /// The probe sphere touches at least one atom sphere.
    Rejected,
    /// No clash, but no atom within the contact cutoff either.
    Isolated,
    /// No clash and at least one atom within the contact cutoff.
    Contacted,
}

/// Tests candidate positions against a hashed set of atoms.
///
/// Atom radii are resolved once at construction: an atom's own radius wins, and
/// otherwise the all-atom radius from the lookup is used.
#[derive(Debug)]
pub struct OverlapTester<'a> {
    atoms: &'a [Atom],
    radii: Vec<f64>,
    grid: &'a SpatialHashGrid,
    probe_radius: f64,
    cutoff_sq: f64,
}

impl<'a> OverlapTester<'a> {
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `probe_diameter` or `contact_cutoff` is not positive.
    pub fn new(
        atoms: &'a [Atom],
        grid: &'a SpatialHashGrid,
        lookup: &RadiusLookup,
        probe_diameter: f64,
        contact_cutoff: f64,
    ) -> Result<Self, ConfigError> {
        let probe_diameter = require_positive("probe_diameter", probe_diameter)?;
        let contact_cutoff = require_positive("contact_cutoff", contact_cutoff)?;
        let radii = atoms
            .iter()
            .map(|atom| {
                atom.radius()
                    .unwrap_or_else(|| lookup.all_atom_radius(&atom.residue_name, &atom.atom_name))
            })
            .collect();
        Ok(Self {
            atoms,
            radii,
            grid,
            probe_radius: probe_diameter / 2.0,
            cutoff_sq: contact_cutoff * contact_cutoff,
        })
    }

    pub fn test(&self, candidate: &Point3<f64>) -> OverlapOutcome {
        let mut contacted = false;
        for idx in self.grid.neighbors_of_point(candidate) {
            let dist_sq = (self.atoms[idx].position - candidate).norm_squared();
            let reach = self.probe_radius + self.radii[idx];
            if dist_sq <= reach * reach {
                return OverlapOutcome::Rejected;
            }
            if dist_sq <= self.cutoff_sq {
                contacted = true;
            }
        }
        if contacted {
            OverlapOutcome::Contacted
        } else {
            OverlapOutcome::Isolated
        }
    }
}

/// Candidates that survived the overlap filter, with per-outcome tallies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlapSummary {
    /// Accepted positions, in candidate order.
    pub accepted: Vec<Point3<f64>>,
    pub rejected: usize,
    pub isolated: usize,
    pub contacted: usize,
}

#[cfg(feature = "parallel")]
fn test_all(tester: &OverlapTester, candidates: &[Point3<f64>]) -> Vec<OverlapOutcome> {
    candidates.par_iter().map(|p| tester.test(p)).collect()
}

#[cfg(not(feature = "parallel"))]
fn test_all(tester: &OverlapTester, candidates: &[Point3<f64>]) -> Vec<OverlapOutcome> {
    candidates.iter().map(|p| tester.test(p)).collect()
}

/// Keeps the contacted candidates, plus the isolated ones if `keep_isolated` is set.
///
/// Progress is reported once per chunk of 1000 candidates.
#[instrument(skip_all, name = "overlap_filter_task")]
pub fn run(
    tester: &OverlapTester,
    candidates: &[Point3<f64>],
    keep_isolated: bool,
    reporter: &ProgressReporter,
) -> OverlapSummary {
    info!(
        candidates = candidates.len(),
        keep_isolated, "Filtering candidate sites against atoms."
    );
    let chunks = candidates.len().div_ceil(PROGRESS_CHUNK);
    reporter.report(Progress::TaskStart {
        total_steps: chunks as u64,
    });

    let mut summary = OverlapSummary::default();
    for chunk in candidates.chunks(PROGRESS_CHUNK) {
        let outcomes = test_all(tester, chunk);
        for (point, outcome) in chunk.iter().zip(&outcomes) {
            match outcome {
                OverlapOutcome::Rejected => summary.rejected += 1,
                OverlapOutcome::Isolated => {
                    summary.isolated += 1;
                    if keep_isolated {
                        summary.accepted.push(*point);
                    }
                }
                OverlapOutcome::Contacted => {
                    summary.contacted += 1;
                    summary.accepted.push(*point);
                }
            }
        }
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);

    debug!(
        accepted = summary.accepted.len(),
        rejected = summary.rejected,
        isolated = summary.isolated,
        "Overlap filter complete."
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    const EPS: f64 = 1e-6;

    fn carbon(x: f64, radius: f64) -> Atom {
        let mut atom = Atom::new("ALA", "CB", Point3::new(x, 0.0, 0.0));
        atom.set_radius(radius);
        atom
    }

    fn tester_for<'a>(
        atoms: &'a [Atom],
        grid: &'a SpatialHashGrid,
        lookup: &RadiusLookup,
    ) -> OverlapTester<'a> {
        OverlapTester::new(atoms, grid, lookup, 2.5, 3.0).unwrap()
    }

    #[test]
    fn separation_at_sum_of_radii_is_the_rejection_boundary() {
        let atoms = vec![carbon(0.0, 1.5)];
        let grid = SpatialHashGrid::build(&atoms, 3.0).unwrap();
        let lookup = RadiusLookup::new();
        let tester = tester_for(&atoms, &grid, &lookup);

        let touching = 1.25 + 1.5;
        assert_eq!(tester.test(&Point3::new(touching - EPS, 0.0, 0.0)), OverlapOutcome::Rejected);
        assert_eq!(tester.test(&Point3::new(touching + EPS, 0.0, 0.0)), OverlapOutcome::Contacted);
    }

    #[test]
    fn candidate_beyond_contact_cutoff_is_isolated() {
        let atoms = vec![carbon(0.0, 1.0)];
        let grid = SpatialHashGrid::build(&atoms, 3.0).unwrap();
        let lookup = RadiusLookup::new();
        let tester = tester_for(&atoms, &grid, &lookup);

        assert_eq!(tester.test(&Point3::new(2.9, 0.0, 0.0)), OverlapOutcome::Contacted);
        assert_eq!(tester.test(&Point3::new(3.1, 0.0, 0.0)), OverlapOutcome::Isolated);
        assert_eq!(tester.test(&Point3::new(40.0, 0.0, 0.0)), OverlapOutcome::Isolated);
    }

    #[test]
    fn any_clash_rejects_even_with_other_contacts() {
        let atoms = vec![carbon(0.0, 1.0), carbon(4.0, 1.0)];
        let grid = SpatialHashGrid::build(&atoms, 3.0).unwrap();
        let lookup = RadiusLookup::new();
        let tester = tester_for(&atoms, &grid, &lookup);
        assert_eq!(tester.test(&Point3::new(1.9, 0.0, 0.0)), OverlapOutcome::Rejected);
    }

    #[test]
    fn unset_radius_falls_back_to_lookup_table() {
        let atoms = vec![Atom::new("ALA", "CB", Point3::origin())];
        let grid = SpatialHashGrid::build(&atoms, 3.0).unwrap();
        let lookup = RadiusLookup::new();
        let tester = tester_for(&atoms, &grid, &lookup);

        let table_radius = lookup.all_atom_radius("ALA", "CB");
        assert!(table_radius > 0.0);
        let touching = 1.25 + table_radius;
        assert_eq!(tester.test(&Point3::new(touching - EPS, 0.0, 0.0)), OverlapOutcome::Rejected);
        assert_eq!(tester.test(&Point3::new(touching + EPS, 0.0, 0.0)), OverlapOutcome::Contacted);
    }

    #[test]
    fn run_keeps_contacted_in_order_and_isolated_on_request() {
        let atoms = vec![carbon(0.0, 1.0)];
        let grid = SpatialHashGrid::build(&atoms, 3.0).unwrap();
        let lookup = RadiusLookup::new();
        let tester = tester_for(&atoms, &grid, &lookup);
        let candidates = vec![
            Point3::new(0.0, 2.5, 0.0),
            Point3::new(0.5, 0.0, 0.0),
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(-2.6, 0.0, 0.0),
        ];
        let reporter = ProgressReporter::new();

        let strict = run(&tester, &candidates, false, &reporter);
        assert_eq!(strict.accepted, vec![candidates[0], candidates[3]]);
        assert_eq!((strict.rejected, strict.isolated, strict.contacted), (1, 1, 2));

        let lenient = run(&tester, &candidates, true, &reporter);
        assert_eq!(lenient.accepted, vec![candidates[0], candidates[2], candidates[3]]);
    }

    #[test]
    fn run_reports_one_increment_per_chunk() {
        let atoms = vec![carbon(0.0, 1.0)];
        let grid = SpatialHashGrid::build(&atoms, 3.0).unwrap();
        let lookup = RadiusLookup::new();
        let tester = tester_for(&atoms, &grid, &lookup);
        let candidates = vec![Point3::new(0.0, 2.5, 0.0); 2 * PROGRESS_CHUNK + 1];

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            sink.lock().unwrap().push(event);
        }));
        let summary = run(&tester, &candidates, false, &reporter);
        assert_eq!(summary.contacted, candidates.len());

        let events = events.lock().unwrap();
        assert!(matches!(events[0], Progress::TaskStart { total_steps: 3 }));
        let increments = events
            .iter()
            .filter(|e| matches!(e, Progress::TaskIncrement))
            .count();
        assert_eq!(increments, 3);
        assert!(matches!(events.last(), Some(Progress::TaskFinish)));
    }

    #[test]
    fn new_rejects_non_positive_parameters() {
        let atoms: Vec<Atom> = Vec::new();
        let grid = SpatialHashGrid::build(&atoms, 3.0).unwrap();
        let lookup = RadiusLookup::new();
        assert!(OverlapTester::new(&atoms, &grid, &lookup, 0.0, 3.0).is_err());
        assert!(OverlapTester::new(&atoms, &grid, &lookup, 2.5, -1.0).is_err());
    }
}
