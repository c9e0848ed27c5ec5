use phf::{Map, Set, phf_map, phf_set};

/// Side-chain pKa values for the ionizable residues (three-letter codes,
/// upper case). Standard free-amino-acid values; termini are not modeled.
static SIDECHAIN_PKA: Map<&'static str, f64> = phf_map! {
    "ASP" => 3.65,
    "GLU" => 4.25,
    "CYS" => 8.30,
    "TYR" => 10.07,
    "HIS" => 6.00,
    "LYS" => 10.53,
    "ARG" => 12.48,
};

static ACIDIC_RESIDUES: Set<&'static str> = phf_set! {
    "ASP", "GLU", "CYS", "TYR",
};

/// Fractional side-chain charge of a residue at the given pH.
///
/// Henderson–Hasselbalch partitioning of the protonation equilibrium: acidic
/// side chains contribute a fractional charge in `[-1, 0]`, basic ones in
/// `[0, 1]`. Residues without an ionizable side chain (or unknown residue
/// names, e.g. waters and ligands) contribute zero.
pub fn sidechain_charge(residue_name: &str, ph: f64) -> f64 {
    let Some(&pka) = SIDECHAIN_PKA.get(residue_name) else {
        return 0.0;
    };
    if ACIDIC_RESIDUES.contains(residue_name) {
        -1.0 / (1.0 + 10f64.powf(pka - ph))
    } else {
        1.0 / (1.0 + 10f64.powf(ph - pka))
    }
}
