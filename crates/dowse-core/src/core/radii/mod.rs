//! Per-atom interaction radii and hydrophobicity scales.
//!
//! The built-in table is compiled into the binary as perfect-hash maps. Entries are
//! keyed either by residue and atom name, or by atom name alone for the generic
//! fallback. A [`RadiusLookup`] may additionally carry overrides loaded from a CSV
//! file; overrides always shadow built-in entries of the same key.

mod table;

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Parameters attached to a residue/atom pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AtomParams {
    /// United-atom van der Waals radius in Angstroms.
    pub ua_radius: f64,
    /// All-atom radius in Angstroms, used for overlap testing.
    pub aa_radius: f64,
    pub hc_1986: f64,
    pub hc_1989: f64,
    pub hc_1998: f64,
    pub type_id: i32,
}

/// One stage of the lookup fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupTier {
    /// Residue name and atom name both match.
    Exact,
    /// Only the atom name matches a residue-independent entry.
    Generic,
}

const LOOKUP_ORDER: [LookupTier; 2] = [LookupTier::Exact, LookupTier::Generic];

/// The outcome of resolving a residue/atom pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub params: AtomParams,
    /// The tier that produced `params`, or `None` if every tier missed and
    /// `params` is the zeroed record.
    pub tier: Option<LookupTier>,
}

#[derive(Debug, Error)]
pub enum RadiiLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

#[derive(Debug, Deserialize)]
struct RadiusRecord {
    res_name: String,
    atom_name: String,
    ua_radius: f64,
    aa_radius: f64,
    hc_1986: f64,
    hc_1989: f64,
    hc_1998: f64,
    type_id: i32,
}

impl From<RadiusRecord> for AtomParams {
    fn from(r: RadiusRecord) -> Self {
        Self {
            ua_radius: r.ua_radius,
            aa_radius: r.aa_radius,
            hc_1986: r.hc_1986,
            hc_1989: r.hc_1989,
            hc_1998: r.hc_1998,
            type_id: r.type_id,
        }
    }
}

/// Resolves [`AtomParams`] for residue/atom name pairs.
#[derive(Debug, Clone, Default)]
pub struct RadiusLookup {
    overrides: HashMap<(String, String), AtomParams>,
}

impl RadiusLookup {
    /// Creates a lookup backed only by the built-in table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a lookup whose built-in table is extended by the rows of a CSV file.
    ///
    /// The file must have the header
    /// `res_name,atom_name,ua_radius,aa_radius,hc_1986,hc_1989,hc_1998,type_id`.
    /// An empty `res_name` declares a generic, residue-independent entry.
    ///
    /// # Errors
    ///
    /// Returns [`RadiiLoadError`] if the file cannot be opened or a row fails to parse.
    pub fn with_overrides_from_path(path: &Path) -> Result<Self, RadiiLoadError> {
        let mut lookup = Self::new();
        lookup.load_overrides(path)?;
        Ok(lookup)
    }

    fn load_overrides(&mut self, path: &Path) -> Result<(), RadiiLoadError> {
        if !path.exists() {
            return Err(RadiiLoadError::Io {
                path: path.to_string_lossy().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            });
        }
        let mut reader = csv::Reader::from_path(path).map_err(|e| RadiiLoadError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

        for result in reader.deserialize::<RadiusRecord>() {
            let record = result.map_err(|e| RadiiLoadError::Csv {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
            let key = (
                record.res_name.trim().to_string(),
                record.atom_name.trim().to_string(),
            );
            self.overrides.insert(key, record.into());
        }
        debug!(
            path = %path.display(),
            entries = self.overrides.len(),
            "Loaded radius overrides."
        );
        Ok(())
    }

    /// Inserts or replaces a single override entry. An empty `residue_name`
    /// declares a generic entry.
    pub fn insert(&mut self, residue_name: &str, atom_name: &str, params: AtomParams) {
        self.overrides.insert(
            (residue_name.trim().to_string(), atom_name.trim().to_string()),
            params,
        );
    }

    /// Resolves a residue/atom pair by trying each tier in order.
    ///
    /// A complete miss is not an error: it is logged as a warning and yields the
    /// zeroed record with `tier == None`.
    pub fn resolve(&self, residue_name: &str, atom_name: &str) -> Resolution {
        let residue_name = residue_name.trim();
        let atom_name = atom_name.trim();

        for tier in LOOKUP_ORDER {
            let key_residue = match tier {
                LookupTier::Exact => residue_name,
                LookupTier::Generic => "",
            };
            if let Some(params) = self.find(key_residue, atom_name) {
                return Resolution {
                    params,
                    tier: Some(tier),
                };
            }
        }

        warn!(
            residue = residue_name,
            atom = atom_name,
            "No parameters found for residue [{}] atom [{}].",
            residue_name,
            atom_name
        );
        Resolution {
            params: AtomParams::default(),
            tier: None,
        }
    }

    pub fn params(&self, residue_name: &str, atom_name: &str) -> AtomParams {
        self.resolve(residue_name, atom_name).params
    }

    pub fn all_atom_radius(&self, residue_name: &str, atom_name: &str) -> f64 {
        self.params(residue_name, atom_name).aa_radius
    }

    pub fn united_atom_radius(&self, residue_name: &str, atom_name: &str) -> f64 {
        self.params(residue_name, atom_name).ua_radius
    }

    fn find(&self, residue_name: &str, atom_name: &str) -> Option<AtomParams> {
        if let Some(params) = self
            .overrides
            .get(&(residue_name.to_string(), atom_name.to_string()))
        {
            return Some(*params);
        }
        if residue_name.is_empty() {
            table::GENERIC_PARAMS.get(atom_name).copied()
        } else {
            table::RESIDUE_PARAMS
                .get(format!("{}:{}", residue_name, atom_name).as_str())
                .copied()
        }
    }
}
