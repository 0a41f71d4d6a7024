use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ns_core::LorentzVector;
use ns_met::{Jets, MemoryTree, MetStore, SelectionParams};
use std::hint::black_box;

fn make_jets(n: usize) -> Jets {
    // Deterministic spread; roughly a third fail one of the cuts.
    (0..n)
        .map(|i| {
            let x = i as f64;
            let pt = 15.0 + (x * 7.3) % 80.0;
            let eta = (x * 0.37).sin() * 3.0;
            (LorentzVector::from_pt_eta_phi_e(pt, eta, x * 0.61, pt * eta.cosh()), i % 5 != 0)
        })
        .collect()
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("met_update");
    let params = SelectionParams::new()
        .with_number("JetPtForMhtAndHt", 30.0)
        .with_number("JetEtaForMhtAndHt", 2.4)
        .with_flag("ApplyJetLooseIDforMhtAndHt", true);

    let names: Vec<String> =
        ["orig", "Met_Uncl_Up", "Met_Uncl_Down", "Jet_Scale_Up", "Met_Res_Up", "Met_Res_Down"]
            .iter()
            .map(|s| s.to_string())
            .collect();
    let mut tree = MemoryTree::new()
        .with_column("Met_px", vec![12.0])
        .and_then(|t| t.with_column("Met_py", vec![-7.0]))
        .and_then(|t| t.with_column("Met_pz", vec![3.0]))
        .expect("bench tree");
    let mut met = MetStore::new(&mut tree, "Met", names).expect("bench store");
    let ids: Vec<_> = met.variation_ids().collect();

    for n in [4usize, 16, 64] {
        let jets = make_jets(n);
        group.bench_with_input(BenchmarkId::new("all_variations", n), &n, |b, _| {
            b.iter(|| {
                met.next_event(&tree).expect("read");
                for &id in &ids {
                    met.update(&params, &jets, id).expect("update");
                }
                black_box(met.ht())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_update);
criterion_main!(benches);
