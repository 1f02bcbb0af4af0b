use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Padding added around the snapped structure bounds, in Angstroms.
pub const DEFAULT_BOUNDS_PADDING: f64 = 5.0;
/// Upper limit on the number of cells of any single lattice.
pub const DEFAULT_MAX_LATTICE_CELLS: usize = 150_000_000;
/// Clustering joins two points when their squared distance is at most
/// `CLUSTER_NEIGHBOR_FACTOR * grid_spacing²`.
pub const CLUSTER_NEIGHBOR_FACTOR: f64 = 3.0 * 1.05;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Parameter '{name}' must be a positive, finite number (got {value})")]
    NotPositive { name: &'static str, value: f64 },
    #[error("Parameter '{name}' must be a non-negative, finite number (got {value})")]
    Negative { name: &'static str, value: f64 },
    #[error("Unknown value '{value}' for '{name}'")]
    UnknownVariant { name: &'static str, value: String },
}

pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn require_non_negative(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

/// Strategy used to decide which side of the surface a lattice point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierKind {
    /// Each vertex writes itself into the lattice cells within the search radius.
    #[default]
    Scatter,
    /// Each lattice cell gathers the nearest vertex from spatially binned vertices.
    Binned,
    /// The three nearest vertices vote, weighted by inverse squared distance.
    WeightedVote,
}

impl FromStr for ClassifierKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "scatter" => Ok(Self::Scatter),
            "binned" | "gather" => Ok(Self::Binned),
            "weighted-vote" | "vote" => Ok(Self::WeightedVote),
            _ => Err(ConfigError::UnknownVariant {
                name: "classifier",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Scatter => "scatter",
            Self::Binned => "binned",
            Self::WeightedVote => "weighted-vote",
        };
        f.write_str(s)
    }
}

/// Where the interaction radius of each structure atom comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RadiusSource {
    /// The all-atom radius of the residue/atom lookup table.
    #[default]
    Table,
    /// The temperature factor column, falling back to the table when absent.
    TemperatureFactor,
}

impl FromStr for RadiusSource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "table" => Ok(Self::Table),
            "temperature-factor" | "b-factor" => Ok(Self::TemperatureFactor),
            _ => Err(ConfigError::UnknownVariant {
                name: "radius-source",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    /// Lattice spacing for classification, flood fill and clustering, in Angstroms.
    pub spacing: f64,
    /// Cell size of the spatial hash grids, in Angstroms.
    pub hash_spacing: f64,
    pub padding: f64,
    pub max_lattice_cells: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceConfig {
    /// Only vertices within this distance of a lattice point can classify it.
    pub search_radius: f64,
    pub classifier: ClassifierKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolventConfig {
    pub probe_diameter: f64,
    pub contact_cutoff: f64,
    pub keep_isolated: bool,
    pub radius_source: RadiusSource,
    pub radii_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolvationConfig {
    pub grid: GridConfig,
    pub surface: SurfaceConfig,
    pub solvent: SolventConfig,
}

#[derive(Default)]
pub struct SolvationConfigBuilder {
    grid_spacing: Option<f64>,
    hash_spacing: Option<f64>,
    padding: Option<f64>,
    max_lattice_cells: Option<usize>,
    search_radius: Option<f64>,
    classifier: Option<ClassifierKind>,
    probe_diameter: Option<f64>,
    contact_cutoff: Option<f64>,
    keep_isolated: Option<bool>,
    radius_source: Option<RadiusSource>,
    radii_path: Option<PathBuf>,
}

impl SolvationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid_spacing(mut self, spacing: f64) -> Self {
        self.grid_spacing = Some(spacing);
        self
    }
    pub fn hash_spacing(mut self, spacing: f64) -> Self {
        self.hash_spacing = Some(spacing);
        self
    }
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = Some(padding);
        self
    }
    pub fn max_lattice_cells(mut self, cells: usize) -> Self {
        self.max_lattice_cells = Some(cells);
        self
    }
    pub fn search_radius(mut self, radius: f64) -> Self {
        self.search_radius = Some(radius);
        self
    }
    pub fn classifier(mut self, kind: ClassifierKind) -> Self {
        self.classifier = Some(kind);
        self
    }
    pub fn probe_diameter(mut self, diameter: f64) -> Self {
        self.probe_diameter = Some(diameter);
        self
    }
    pub fn contact_cutoff(mut self, cutoff: f64) -> Self {
        self.contact_cutoff = Some(cutoff);
        self
    }
    pub fn keep_isolated(mut self, keep: bool) -> Self {
        self.keep_isolated = Some(keep);
        self
    }
    pub fn radius_source(mut self, source: RadiusSource) -> Self {
        self.radius_source = Some(source);
        self
    }
    pub fn radii_path(mut self, path: Option<PathBuf>) -> Self {
        self.radii_path = path;
        self
    }

    pub fn build(self) -> Result<SolvationConfig, ConfigError> {
        let spacing = require_positive(
            "grid_spacing",
            self.grid_spacing
                .ok_or(ConfigError::MissingParameter("grid_spacing"))?,
        )?;
        let hash_spacing = require_positive(
            "hash_spacing",
            self.hash_spacing
                .ok_or(ConfigError::MissingParameter("hash_spacing"))?,
        )?;
        let padding = require_non_negative(
            "padding",
            self.padding.unwrap_or(DEFAULT_BOUNDS_PADDING),
        )?;
        let max_lattice_cells = self.max_lattice_cells.unwrap_or(DEFAULT_MAX_LATTICE_CELLS);
        if max_lattice_cells == 0 {
            return Err(ConfigError::NotPositive {
                name: "max_lattice_cells",
                value: 0.0,
            });
        }

        let surface = SurfaceConfig {
            search_radius: require_positive(
                "search_radius",
                self.search_radius
                    .ok_or(ConfigError::MissingParameter("search_radius"))?,
            )?,
            classifier: self.classifier.unwrap_or_default(),
        };

        let solvent = SolventConfig {
            probe_diameter: require_positive(
                "probe_diameter",
                self.probe_diameter
                    .ok_or(ConfigError::MissingParameter("probe_diameter"))?,
            )?,
            contact_cutoff: require_positive(
                "contact_cutoff",
                self.contact_cutoff
                    .ok_or(ConfigError::MissingParameter("contact_cutoff"))?,
            )?,
            keep_isolated: self.keep_isolated.unwrap_or(false),
            radius_source: self.radius_source.unwrap_or_default(),
            radii_path: self.radii_path,
        };

        warn_on_narrow_hash(spacing, hash_spacing);
        if solvent.contact_cutoff > hash_spacing {
            warn!(
                contact_cutoff = solvent.contact_cutoff,
                hash_spacing,
                "Contact cutoff exceeds the hash cell size; distant contacts are missed."
            );
        }

        Ok(SolvationConfig {
            grid: GridConfig {
                spacing,
                hash_spacing,
                padding,
                max_lattice_cells,
            },
            surface,
            solvent,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterConfig {
    pub grid_spacing: f64,
    pub hash_spacing: f64,
}

#[derive(Default)]
pub struct ClusterConfigBuilder {
    grid_spacing: Option<f64>,
    hash_spacing: Option<f64>,
}

impl ClusterConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid_spacing(mut self, spacing: f64) -> Self {
        self.grid_spacing = Some(spacing);
        self
    }
    pub fn hash_spacing(mut self, spacing: f64) -> Self {
        self.hash_spacing = Some(spacing);
        self
    }

    pub fn build(self) -> Result<ClusterConfig, ConfigError> {
        let grid_spacing = require_positive(
            "grid_spacing",
            self.grid_spacing
                .ok_or(ConfigError::MissingParameter("grid_spacing"))?,
        )?;
        let hash_spacing = require_positive(
            "hash_spacing",
            self.hash_spacing
                .ok_or(ConfigError::MissingParameter("hash_spacing"))?,
        )?;
        warn_on_narrow_hash(grid_spacing, hash_spacing);
        Ok(ClusterConfig {
            grid_spacing,
            hash_spacing,
        })
    }
}

impl From<&SolvationConfig> for ClusterConfig {
    fn from(config: &SolvationConfig) -> Self {
        Self {
            grid_spacing: config.grid.spacing,
            hash_spacing: config.grid.hash_spacing,
        }
    }
}

fn warn_on_narrow_hash(grid_spacing: f64, hash_spacing: f64) {
    let join_distance = (CLUSTER_NEIGHBOR_FACTOR * grid_spacing * grid_spacing).sqrt();
    if hash_spacing < join_distance {
        warn!(
            grid_spacing,
            hash_spacing,
            "Hash cell is smaller than the cluster join distance ({:.3} A); clusters may split.",
            join_distance
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_builder() -> SolvationConfigBuilder {
        SolvationConfigBuilder::new()
            .grid_spacing(0.25)
            .hash_spacing(3.0)
            .search_radius(2.5)
            .probe_diameter(2.5)
            .contact_cutoff(5.0)
    }

    #[test]
    fn build_applies_defaults_for_optional_fields() {
        let config = complete_builder().build().unwrap();
        assert_eq!(config.grid.padding, DEFAULT_BOUNDS_PADDING);
        assert_eq!(config.grid.max_lattice_cells, DEFAULT_MAX_LATTICE_CELLS);
        assert_eq!(config.surface.classifier, ClassifierKind::Scatter);
        assert_eq!(config.solvent.radius_source, RadiusSource::Table);
        assert!(!config.solvent.keep_isolated);
        assert!(config.solvent.radii_path.is_none());
    }

    #[test]
    fn build_fails_when_required_parameter_is_missing() {
        let result = SolvationConfigBuilder::new()
            .grid_spacing(0.25)
            .hash_spacing(3.0)
            .probe_diameter(2.5)
            .contact_cutoff(5.0)
            .build();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingParameter("search_radius")
        );
    }

    #[test]
    fn build_rejects_non_positive_or_non_finite_values() {
        let zero = complete_builder().grid_spacing(0.0).build();
        assert!(matches!(
            zero,
            Err(ConfigError::NotPositive {
                name: "grid_spacing",
                ..
            })
        ));

        let nan = complete_builder().probe_diameter(f64::NAN).build();
        assert!(matches!(
            nan,
            Err(ConfigError::NotPositive {
                name: "probe_diameter",
                ..
            })
        ));

        let negative_pad = complete_builder().padding(-1.0).build();
        assert!(matches!(negative_pad, Err(ConfigError::Negative { .. })));

        let no_budget = complete_builder().max_lattice_cells(0).build();
        assert!(no_budget.is_err());
    }

    #[test]
    fn cluster_builder_validates_spacings() {
        let config = ClusterConfigBuilder::new()
            .grid_spacing(1.0)
            .hash_spacing(3.0)
            .build()
            .unwrap();
        assert_eq!(config.grid_spacing, 1.0);

        let bad = ClusterConfigBuilder::new()
            .grid_spacing(-1.0)
            .hash_spacing(3.0)
            .build();
        assert!(bad.is_err());
    }

    #[test]
    fn classifier_kind_parses_aliases_and_displays_canonical_name() {
        assert_eq!("scatter".parse::<ClassifierKind>(), Ok(ClassifierKind::Scatter));
        assert_eq!("Gather".parse::<ClassifierKind>(), Ok(ClassifierKind::Binned));
        assert_eq!(
            "weighted_vote".parse::<ClassifierKind>(),
            Ok(ClassifierKind::WeightedVote)
        );
        assert!("nearest".parse::<ClassifierKind>().is_err());
        assert_eq!(ClassifierKind::WeightedVote.to_string(), "weighted-vote");
    }

    #[test]
    fn radius_source_parses_known_values() {
        assert_eq!("table".parse::<RadiusSource>(), Ok(RadiusSource::Table));
        assert_eq!(
            "b-factor".parse::<RadiusSource>(),
            Ok(RadiusSource::TemperatureFactor)
        );
        assert!("vdw".parse::<RadiusSource>().is_err());
    }
}
