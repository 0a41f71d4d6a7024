//! Integration tests: MET bookkeeping over a multi-entry in-memory tree.

use approx::assert_relative_eq;
use ns_core::{Error, EventSource, LorentzVector};
use ns_met::{Jets, MemoryTree, MetConfig, MetStore, SelectionParams, VariationId};
use std::f64::consts::PI;

fn params(loose_id: bool) -> SelectionParams {
    SelectionParams::from_json_str(&format!(
        r#"{{
            "numbers": {{"JetPtForMhtAndHt": 30.0, "JetEtaForMhtAndHt": 2.4}},
            "flags": {{"ApplyJetLooseIDforMhtAndHt": {loose_id}}}
        }}"#
    ))
    .expect("valid selection JSON")
}

fn tree() -> MemoryTree {
    MemoryTree::new()
        .with_column("Met_px", vec![10.0, 6.0, -3.0])
        .unwrap()
        .with_column("Met_py", vec![0.0, 8.0, 4.0])
        .unwrap()
        .with_column("Met_pz", vec![5.0, -2.0, 0.0])
        .unwrap()
        .with_column("Met_UnclEnshiftedPtUp", vec![11.0, 10.5, 5.5])
        .unwrap()
        .with_column("Met_UnclEnshiftedPhiUp", vec![0.0, 0.9, 2.2])
        .unwrap()
        .with_column("Jet_pt", vec![50.0, 40.0, 30.0])
        .unwrap()
}

#[test]
fn single_jet_end_to_end() {
    let mut t = tree();
    let mut met = MetStore::new(&mut t, "Met", vec!["orig".into()]).unwrap();
    met.next_event(&t).unwrap();

    assert_eq!(met.px(), 10.0);
    assert_eq!(met.py(), 0.0);
    assert_eq!(met.energy(), 10.0);

    let mut jets = Jets::new();
    jets.push(LorentzVector::from_pt_eta_phi_e(50.0, 0.1, 0.0, 50.0 * 0.1f64.cosh()), true);
    met.update(&params(false), &jets, VariationId::NOMINAL).unwrap();

    assert_relative_eq!(met.ht(), 50.0, epsilon = 1e-12);
    assert_relative_eq!(met.mht_phi(), PI, epsilon = 1e-12);
    let sums = met.hadronic(VariationId::NOMINAL).unwrap();
    assert_relative_eq!(sums.mht_px, -50.0, epsilon = 1e-12);
    assert_eq!(met.mht(), sums.mht_py);
}

#[test]
fn variations_track_independent_state_across_events() {
    let mut t = tree();
    let cfg = MetConfig::from_json_str(
        r#"{"prefix": "Met", "variations": ["orig", "Jet_Scale_Up", "Met_Uncl_Up", "Met_Res_Down"]}"#,
    )
    .unwrap();
    let mut met = MetStore::from_config(&mut t, &cfg).unwrap();
    let uncl = met.variation_id("Met_Uncl_Up").unwrap();
    let res = met.variation_id("Met_Res_Down").unwrap();
    let jes = met.variation_id("Jet_Scale_Up").unwrap();

    let mut jets = Jets::new();
    for entry in 0..t.entries() {
        t.set_entry(entry).unwrap();
        met.next_event(&t).unwrap();
        let ids: Vec<VariationId> = met.variation_ids().collect();
        for &id in &ids {
            assert!(met.pending_delta(id).unwrap().is_zero(), "variation {id}");
        }

        jets.clear();
        jets.push(LorentzVector::from_px_py_pz_e(0.0, 40.0 + entry as f64, 0.0, 40.0), true);
        jets.push(LorentzVector::from_px_py_pz_e(35.0, 0.0, 0.0, 35.0), false);

        met.apply_momentum_delta(res, 1.0, -1.0).unwrap();
        for &id in &ids {
            met.update(&params(true), &jets, id).unwrap();
        }

        let raw = *met.raw();
        met.set_current(res);
        assert_relative_eq!(met.px(), raw.px + 1.0, epsilon = 1e-12);
        assert_relative_eq!(met.py(), raw.py - 1.0, epsilon = 1e-12);
        assert_relative_eq!(met.ht(), 40.0 + entry as f64, epsilon = 1e-12);

        met.set_current(uncl);
        assert_relative_eq!(met.pt(), raw.uncl_up.pt, epsilon = 1e-12);
        assert_relative_eq!(met.energy(), raw.uncl_up.pt, epsilon = 1e-12);

        met.set_current(jes);
        assert_eq!(met.current_id(), VariationId::NOMINAL);
        assert_relative_eq!(met.px(), raw.px, epsilon = 1e-12);
    }
}

#[test]
fn update_propagates_missing_parameter() {
    let mut t = tree();
    let mut met = MetStore::new(&mut t, "Met", vec!["orig".into()]).unwrap();
    met.next_event(&t).unwrap();
    let incomplete = SelectionParams::new().with_number("JetPtForMhtAndHt", 30.0);
    let err = met.update(&incomplete, &Jets::new(), VariationId::NOMINAL).unwrap_err();
    assert!(matches!(err, Error::MissingParameter(k) if k == "JetEtaForMhtAndHt"));
}

#[test]
fn un_branch_leaves_other_prefixes_active() {
    let mut t = tree();
    t.bind_leaf("Jet_pt").unwrap();
    let met = MetStore::new(&mut t, "Met", vec!["orig".into(), "Met_Uncl_Up".into()]).unwrap();
    assert!(t.is_active("Met_px"));
    assert!(t.is_active("Met_UnclEnshiftedPtUp"));
    assert!(t.is_active("Met_UnclEnshiftedPhiUp"));
    met.un_branch(&mut t);
    assert!(!t.is_active("Met_px"));
    assert!(!t.is_active("Met_UnclEnshiftedPtUp"));
    assert!(!t.is_active("Met_UnclEnshiftedPhiUp"));
    assert!(t.is_active("Jet_pt"));
}
