use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lichao::api::{
    brute_force_scores, draw_instance, entity_scores, Capacity, GenCfg, Instance, ReplayToken,
    ScoreCfg, DEFAULT_MAX_SLOTS,
};
use serde_json::{json, Value};
use std::path::Path;
use tracing_subscriber::fmt::SubscriberBuilder;

mod input;
mod provenance;

use provenance::Payload;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Exclusion-aware Li-Chao scoring")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CapacityArg {
    /// One tree slot per entity
    PerLine,
    /// Four slots per integer coordinate in [min H, max H)
    PerCoordinate,
}

impl From<CapacityArg> for Capacity {
    fn from(arg: CapacityArg) -> Self {
        match arg {
            CapacityArg::PerLine => Capacity::PerLine,
            CapacityArg::PerCoordinate => Capacity::PerCoordinate,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Score every entity and print max(score) / B
    Solve {
        #[arg(long)]
        input: String,
        /// Overrides the divisor stored in the input file
        #[arg(long)]
        divisor: Option<i64>,
        #[arg(long, value_enum, default_value_t = CapacityArg::PerLine)]
        capacity: CapacityArg,
        /// Refuse to allocate trees larger than this many slots
        #[arg(long, default_value_t = DEFAULT_MAX_SLOTS)]
        max_slots: usize,
        /// Also write the result (and a provenance sidecar) here
        #[arg(long)]
        out: Option<String>,
    },
    /// Compare tree scores against the brute-force reference
    Check {
        #[arg(long)]
        input: String,
        #[arg(long)]
        divisor: Option<i64>,
        #[arg(long, value_enum, default_value_t = CapacityArg::PerLine)]
        capacity: CapacityArg,
        #[arg(long, default_value_t = DEFAULT_MAX_SLOTS)]
        max_slots: usize,
    },
    /// Write a reproducible random instance as JSON
    Gen {
        #[arg(long)]
        entities: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0)]
        index: u64,
        #[arg(long, default_value_t = GenCfg::default().height_max)]
        height_max: i64,
        #[arg(long, default_value_t = GenCfg::default().damage_max)]
        damage_max: i64,
        #[arg(long, default_value_t = GenCfg::default().divisor_max)]
        divisor_max: i64,
        #[arg(long)]
        out: String,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Solve {
            input,
            divisor,
            capacity,
            max_slots,
            out,
        } => solve(input, divisor, capacity, max_slots, out),
        Action::Check {
            input,
            divisor,
            capacity,
            max_slots,
        } => check(input, divisor, capacity, max_slots),
        Action::Gen {
            entities,
            seed,
            index,
            height_max,
            damage_max,
            divisor_max,
            out,
        } => {
            let cfg = GenCfg {
                entities,
                height_max,
                damage_max,
                divisor_max,
            };
            gen(cfg, ReplayToken { seed, index }, out)
        }
        Action::Report => report(),
    }
}

/// Scoring config after checking the slot budget.
fn score_cfg(inst: &Instance, capacity: CapacityArg, max_slots: usize) -> Result<ScoreCfg> {
    let cfg = ScoreCfg {
        capacity: capacity.into(),
        max_slots,
    };
    let slots = cfg
        .slots(inst)
        .context("use --capacity per-line or raise --max-slots")?;
    tracing::info!(capacity = ?capacity, slots, "tree_capacity");
    Ok(cfg)
}

fn solve(
    input: String,
    divisor: Option<i64>,
    capacity: CapacityArg,
    max_slots: usize,
    out: Option<String>,
) -> Result<()> {
    tracing::info!(input, out = ?out, "solve");
    let inst = input::load(&input, divisor)?;
    let cfg = score_cfg(&inst, capacity, max_slots)?;
    let scores = entity_scores(&inst, cfg)?;
    let best = inst.best_of(&scores);
    tracing::info!(entities = inst.len(), best, "solved");

    let result = json!({
        "entities": inst.len(),
        "divisor": inst.divisor(),
        "best": best,
        "scores": scores,
    });
    println!("{}", serde_json::to_string_pretty(&result)?);

    if let Some(out) = out {
        write_output(&out, &result)?;
        let payload = Payload::new(
            "solve",
            json!({
                "input": input,
                "capacity": format!("{capacity:?}"),
                "divisor_override": divisor,
            }),
        )
        .with_summary(json!({ "best": best, "entities": inst.len() }));
        let prov = provenance::write_sidecar(&out, &payload)?;
        tracing::info!(out, provenance = %prov.display(), "written");
    }
    Ok(())
}

fn check(
    input: String,
    divisor: Option<i64>,
    capacity: CapacityArg,
    max_slots: usize,
) -> Result<()> {
    tracing::info!(input, "check");
    let inst = input::load(&input, divisor)?;
    let cfg = score_cfg(&inst, capacity, max_slots)?;
    let tree = entity_scores(&inst, cfg)?;
    let reference = brute_force_scores(&inst);

    let mismatches: Vec<usize> = tree
        .iter()
        .zip(&reference)
        .enumerate()
        .filter(|(_, (t, r))| t != r)
        .map(|(i, _)| i)
        .collect();
    for &i in mismatches.iter().take(10) {
        tracing::warn!(entity = i, tree = tree[i], reference = reference[i], "score_mismatch");
    }

    let tree_best = inst.best_of(&tree);
    let reference_best = inst.best_of(&reference);
    tracing::info!(
        entities = inst.len(),
        mismatches = mismatches.len(),
        tree_best,
        reference_best,
        "checked"
    );
    let summary = json!({
        "entities": inst.len(),
        "mismatched_entities": mismatches.len(),
        "tree_best": tree_best,
        "reference_best": reference_best,
        "best_agrees": tree_best == reference_best,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn gen(cfg: GenCfg, tok: ReplayToken, out: String) -> Result<()> {
    tracing::info!(entities = cfg.entities, seed = tok.seed, index = tok.index, out, "gen");
    let inst = draw_instance(cfg, tok).context("drawing instance")?;
    input::write_json(Path::new(&out), &inst)?;
    let payload = Payload::new(
        "gen",
        json!({
            "entities": cfg.entities,
            "seed": tok.seed,
            "index": tok.index,
            "height_max": cfg.height_max,
            "damage_max": cfg.damage_max,
            "divisor_max": cfg.divisor_max,
        }),
    );
    provenance::write_sidecar(&out, &payload)?;
    Ok(())
}

fn report() -> Result<()> {
    let payload = Payload::new("report", json!({}));
    let obj = provenance::document(&payload, &[]);
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn write_output(out: &str, value: &Value) -> Result<()> {
    let out_path = Path::new(out);
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    std::fs::write(out_path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {out}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::tempdir;

    #[test]
    fn cli_definition_is_consistent() {
        Cmd::command().debug_assert();
    }

    #[test]
    fn solve_writes_result_and_sidecar() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("inst.json");
        std::fs::write(&input, r#"{"heights":[1,2,3],"damages":[10,20,5],"divisor":2}"#)
            .unwrap();
        let out = dir.path().join("out/result.json");
        solve(
            input.to_string_lossy().into_owned(),
            None,
            CapacityArg::PerLine,
            1_000,
            Some(out.to_string_lossy().into_owned()),
        )
        .unwrap();
        let parsed: Value = serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        assert_eq!(parsed["best"], 57.5);
        assert_eq!(parsed["scores"], json!([70, 70, 115]));
        assert!(dir.path().join("out/result.provenance.json").exists());
    }

    #[test]
    fn slot_budget_is_enforced() {
        let inst = Instance::new(vec![0, 1_000], vec![1, 1], 1).unwrap();
        let err = score_cfg(&inst, CapacityArg::PerCoordinate, 100).unwrap_err();
        assert!(format!("{err:#}").contains("4000 slots (limit 100)"));
        assert!(score_cfg(&inst, CapacityArg::PerLine, 100).is_ok());
    }

    #[test]
    fn gen_output_loads_back() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("gen.json");
        let cfg = GenCfg {
            entities: 25,
            height_max: 100,
            damage_max: 10,
            divisor_max: 5,
        };
        gen(cfg, ReplayToken { seed: 3, index: 1 }, out.to_string_lossy().into_owned()).unwrap();
        let inst = input::load(out.to_str().unwrap(), None).unwrap();
        assert_eq!(inst.len(), 25);
        assert!(dir.path().join("gen.provenance.json").exists());
    }
}
