use wln::{canonicalize, read, write, ReadOptions, WriteOptions};

use pretty_assertions::assert_eq;

macro_rules! roundtrip_wln {
    ($wln:expr) => {{
        let mol = read($wln, ReadOptions::new()).unwrap();
        let written = write(&mol, WriteOptions::new()).unwrap();
        assert_eq!(written, $wln);
    }};
}

#[test]
fn qy_reads_as_water_bonded_to_a_methyl_carbon() {
    let mol = read("QY", ReadOptions::new()).unwrap();
    assert_eq!(mol.atom_count(), 2);
    assert_eq!(mol.bond_count(), 1);
}

#[test]
fn roundtripping_simple_wln_strings() {
    let all_wln = [
        "QY",     // water-like oxygen bonded to a methyl carbon
        "L6J",    // benzene
        "L6TJ",   // cyclohexane
        "T6OJ",   // tetrahydropyran
        "1",      // methane
        "2",      // ethane
        "12",     // dodecane
    ];

    for wln in all_wln {
        roundtrip_wln!(wln);
    }
}

#[test]
fn naphthalene_round_trips_through_read_and_write() {
    let mol = read("L66J", ReadOptions::new()).unwrap();
    assert_eq!(mol.atom_count(), 10);
    assert!(mol.atoms().all(|a| a.aromatic));
    let written = write(&mol, WriteOptions::new()).unwrap();
    let reparsed = read(&written, ReadOptions::new()).unwrap();
    assert_eq!(reparsed.atom_count(), mol.atom_count());
    assert_eq!(reparsed.bond_count(), mol.bond_count());
}

#[test]
fn ionic_components_round_trip_with_the_ampersand_separator() {
    let mol = read("QH &ZH", ReadOptions::new()).unwrap();
    assert_eq!(mol.components().len(), 2);
    let written = write(&mol, WriteOptions::new()).unwrap();
    assert!(written.contains(" &"));
}

#[test]
fn canonicalize_is_idempotent() {
    let once = canonicalize("QY").unwrap();
    let twice = canonicalize(&once).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn malformed_ring_is_a_syntax_error() {
    assert!(read("L6", ReadOptions::new()).is_err());
}

#[test]
fn charge_suffix_round_trips_through_the_ledger() {
    let mol = read("QQ &1/2", ReadOptions::new()).unwrap();
    let charges: Vec<i8> = mol.atoms().map(|a| a.charge).collect();
    assert!(charges.contains(&1));
    assert!(charges.contains(&-1));
}
