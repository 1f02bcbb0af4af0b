use super::AtomParams;
use phf::{Map, phf_map};

const fn p(
    ua_radius: f64,
    aa_radius: f64,
    hc_1986: f64,
    hc_1989: f64,
    hc_1998: f64,
    type_id: i32,
) -> AtomParams {
    AtomParams {
        ua_radius,
        aa_radius,
        hc_1986,
        hc_1989,
        hc_1998,
        type_id,
    }
}

// type_id: 1 apolar carbon, 2 polar oxygen, 3 polar nitrogen, 4 sulfur, 5 charged oxygen,
// 6 charged nitrogen, 7 hydrogen, 8 solvent
pub(super) static GENERIC_PARAMS: Map<&'static str, AtomParams> = phf_map! {
    "N"   => p(1.65, 1.55, -0.132, -0.60, -0.84, 3),
    "CA"  => p(1.87, 1.70,  0.012,  0.16,  0.23, 1),
    "C"   => p(1.76, 1.70,  0.012,  0.16,  0.23, 1),
    "O"   => p(1.40, 1.52, -0.116, -0.60, -0.81, 2),
    "OXT" => p(1.40, 1.52, -0.175, -0.90, -1.09, 5),
    "CB"  => p(1.87, 1.70,  0.012,  0.16,  0.23, 1),
    "CG"  => p(1.87, 1.70,  0.012,  0.16,  0.23, 1),
    "CG1" => p(1.87, 1.70,  0.012,  0.16,  0.23, 1),
    "CG2" => p(1.87, 1.70,  0.012,  0.16,  0.23, 1),
    "CD"  => p(1.87, 1.70,  0.012,  0.16,  0.23, 1),
    "CD1" => p(1.76, 1.70,  0.012,  0.16,  0.23, 1),
    "CD2" => p(1.76, 1.70,  0.012,  0.16,  0.23, 1),
    "CE"  => p(1.87, 1.70,  0.012,  0.16,  0.23, 1),
    "CE1" => p(1.76, 1.70,  0.012,  0.16,  0.23, 1),
    "CE2" => p(1.76, 1.70,  0.012,  0.16,  0.23, 1),
    "CE3" => p(1.76, 1.70,  0.012,  0.16,  0.23, 1),
    "CZ"  => p(1.76, 1.70,  0.012,  0.16,  0.23, 1),
    "CZ2" => p(1.76, 1.70,  0.012,  0.16,  0.23, 1),
    "CZ3" => p(1.76, 1.70,  0.012,  0.16,  0.23, 1),
    "CH2" => p(1.76, 1.70,  0.012,  0.16,  0.23, 1),
    "OG"  => p(1.40, 1.52, -0.116, -0.60, -0.81, 2),
    "OG1" => p(1.40, 1.52, -0.116, -0.60, -0.81, 2),
    "OH"  => p(1.40, 1.52, -0.116, -0.60, -0.81, 2),
    "OD1" => p(1.40, 1.52, -0.116, -0.60, -0.81, 2),
    "OD2" => p(1.40, 1.52, -0.116, -0.60, -0.81, 2),
    "OE1" => p(1.40, 1.52, -0.116, -0.60, -0.81, 2),
    "OE2" => p(1.40, 1.52, -0.116, -0.60, -0.81, 2),
    "ND1" => p(1.65, 1.55, -0.132, -0.60, -0.84, 3),
    "ND2" => p(1.65, 1.55, -0.132, -0.60, -0.84, 3),
    "NE"  => p(1.65, 1.55, -0.132, -0.60, -0.84, 3),
    "NE1" => p(1.65, 1.55, -0.132, -0.60, -0.84, 3),
    "NE2" => p(1.65, 1.55, -0.132, -0.60, -0.84, 3),
    "NZ"  => p(1.50, 1.55, -0.186, -1.00, -1.27, 6),
    "NH1" => p(1.65, 1.55, -0.186, -1.00, -1.27, 6),
    "NH2" => p(1.65, 1.55, -0.186, -1.00, -1.27, 6),
    "SG"  => p(1.85, 1.80,  0.012,  0.21,  0.25, 4),
    "SD"  => p(1.85, 1.80,  0.012,  0.21,  0.25, 4),
    "SE"  => p(1.90, 1.90,  0.012,  0.21,  0.25, 4),
    "H"   => p(0.00, 1.10,  0.000,  0.00,  0.00, 7),
    "HN"  => p(0.00, 1.10,  0.000,  0.00,  0.00, 7),
    "HA"  => p(0.00, 1.10,  0.000,  0.00,  0.00, 7),
    "OW"  => p(1.40, 1.52, -0.116, -0.60, -0.81, 8),
};

pub(super) static RESIDUE_PARAMS: Map<&'static str, AtomParams> = phf_map! {
    "GLY:CA" => p(1.87, 1.70,  0.012,  0.16,  0.23, 1),
    "PRO:N"  => p(1.65, 1.55,  0.000,  0.00,  0.00, 3),
    "PRO:CD" => p(1.87, 1.70,  0.012,  0.16,  0.23, 1),
    "ASP:OD1" => p(1.40, 1.52, -0.175, -0.90, -1.09, 5),
    "ASP:OD2" => p(1.40, 1.52, -0.175, -0.90, -1.09, 5),
    "GLU:OE1" => p(1.40, 1.52, -0.175, -0.90, -1.09, 5),
    "GLU:OE2" => p(1.40, 1.52, -0.175, -0.90, -1.09, 5),
    "ASN:OD1" => p(1.40, 1.52, -0.116, -0.60, -0.81, 2),
    "GLN:OE1" => p(1.40, 1.52, -0.116, -0.60, -0.81, 2),
    "ARG:NE"  => p(1.65, 1.55, -0.186, -1.00, -1.27, 6),
    "HIS:ND1" => p(1.65, 1.55, -0.132, -0.60, -0.84, 3),
    "HIS:NE2" => p(1.65, 1.55, -0.132, -0.60, -0.84, 3),
    "TRP:NE1" => p(1.65, 1.55, -0.132, -0.60, -0.84, 3),
    "TYR:OH"  => p(1.40, 1.52, -0.116, -0.60, -0.81, 2),
    "MET:SD"  => p(1.85, 1.80,  0.012,  0.21,  0.25, 4),
    "MSE:SE"  => p(1.90, 1.90,  0.012,  0.21,  0.25, 4),
    "CYS:SG"  => p(1.85, 1.80,  0.012,  0.21,  0.25, 4),
    "HOH:O"   => p(1.40, 1.52, -0.116, -0.60, -0.81, 8),
    "WAT:O"   => p(1.40, 1.52, -0.116, -0.60, -0.81, 8),
};
