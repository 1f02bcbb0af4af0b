use nalgebra::Point3;

/// Residue name assigned to every solvent site produced by the placement workflow.
pub const SOLVENT_RESIDUE_NAME: &str = "HOH";
/// Atom name assigned to every solvent site produced by the placement workflow.
pub const SOLVENT_ATOM_NAME: &str = "O";

/// Represents an atom of the input structure, or a placed solvent site.
///
/// Atoms carry only the information the placement engine needs: the residue and
/// atom names used for radius resolution, the Cartesian position, and the optional
/// temperature factor read from structure files. The interaction radius is resolved
/// lazily and can only be changed through [`Atom::set_radius`].
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The residue name (e.g., "ALA", "HOH").
    pub residue_name: String,
    /// The atom name (e.g., "CA", "OW").
    pub atom_name: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// The temperature factor (B-factor) column, when the source provided one.
    pub temperature_factor: Option<f64>,
    radius: Option<f64>,
}

impl Atom {
    /// Creates a new `Atom` with no resolved radius.
    ///
    /// # Arguments
    ///
    /// * `residue_name` - The name of the residue this atom belongs to.
    /// * `atom_name` - The name of the atom.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(residue_name: &str, atom_name: &str, position: Point3<f64>) -> Self {
        Self {
            residue_name: residue_name.to_string(),
            atom_name: atom_name.to_string(),
            position,
            temperature_factor: None,
            radius: None,
        }
    }

    /// Creates a solvent site (`HOH`/`O`) at the given position.
    pub fn solvent(position: Point3<f64>) -> Self {
        Self::new(SOLVENT_RESIDUE_NAME, SOLVENT_ATOM_NAME, position)
    }

    /// Sets the temperature factor, consuming and returning the atom.
    pub fn with_temperature_factor(mut self, value: f64) -> Self {
        self.temperature_factor = Some(value);
        self
    }

    /// Returns the resolved interaction radius, if one has been assigned.
    #[inline]
    pub fn radius(&self) -> Option<f64> {
        self.radius
    }

    /// Assigns the interaction radius in Angstroms.
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = Some(radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_has_no_radius_or_temperature_factor() {
        let atom = Atom::new("ALA", "CA", Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.residue_name, "ALA");
        assert_eq!(atom.atom_name, "CA");
        assert_eq!(atom.radius(), None);
        assert_eq!(atom.temperature_factor, None);
    }

    #[test]
    fn solvent_atom_uses_water_names() {
        let atom = Atom::solvent(Point3::origin());
        assert_eq!(atom.residue_name, "HOH");
        assert_eq!(atom.atom_name, "O");
    }

    #[test]
    fn set_radius_overwrites_previous_value() {
        let mut atom = Atom::new("GLY", "N", Point3::origin()).with_temperature_factor(1.5);
        atom.set_radius(1.2);
        atom.set_radius(1.6);
        assert_eq!(atom.radius(), Some(1.6));
        assert_eq!(atom.temperature_factor, Some(1.5));
    }
}
