//! Score the three-entity worked example and a random instance, comparing
//! tree answers with the brute-force reference.

use lichao::api::{
    best_score, brute_force_best_score, draw_instance, Capacity, GenCfg, Instance, ReplayToken,
    ScoreCfg,
};

fn main() {
    let inst = Instance::new(vec![1, 2, 3], vec![10, 20, 5], 2).expect("valid instance");
    println!(
        "worked example: tree={} brute={}",
        best_score(&inst, ScoreCfg::default()).expect("within slot budget"),
        brute_force_best_score(&inst)
    );

    let cfg = GenCfg {
        entities: 2_000,
        height_max: 10_000,
        ..GenCfg::default()
    };
    let inst = draw_instance(cfg, ReplayToken { seed: 1, index: 0 }).expect("valid params");
    for capacity in [Capacity::PerLine, Capacity::PerCoordinate] {
        println!(
            "random n={} capacity={capacity:?}: tree={:.3} brute={:.3}",
            inst.len(),
            best_score(
                &inst,
                ScoreCfg {
                    capacity,
                    ..ScoreCfg::default()
                }
            )
            .expect("within slot budget"),
            brute_force_best_score(&inst)
        );
    }
}
