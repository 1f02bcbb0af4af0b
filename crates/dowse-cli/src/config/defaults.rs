use dowse::engine::config::{ClassifierKind, RadiusSource};

pub struct DefaultsConfig {
    pub grid_spacing: f64,
    pub hash_spacing: f64,
    pub padding: f64,
    pub max_lattice_cells: usize,
    pub search_radius: f64,
    pub classifier: ClassifierKind,
    pub probe_diameter: f64,
    pub contact_cutoff: f64,
    pub keep_isolated: bool,
    pub radius_source: RadiusSource,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            grid_spacing: 0.25,
            hash_spacing: 3.0,
            padding: 5.0,
            max_lattice_cells: 150_000_000,
            search_radius: 2.5,
            classifier: ClassifierKind::Scatter,
            probe_diameter: 2.5,
            contact_cutoff: 5.0,
            keep_isolated: false,
            radius_source: RadiusSource::Table,
        }
    }
}
