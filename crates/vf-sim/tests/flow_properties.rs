//! Integration tests: routing statistics and animator looping.

use proptest::prelude::*;
use vf_core::BranchId;
use vf_sim::{
    AnimatorConfig, FlowRouter, FlowScene, Path, PathAnimator, Point, RouteBranch, RouterConfig,
    SceneConfig, SeededRandom, SequenceRandom, select_branch,
};

fn id(i: u32) -> BranchId {
    BranchId::from_index(i)
}

#[test]
fn router_frequencies_follow_current_split() {
    // Branch currents [3, 1] -> branch 0 should win 75% of draws.
    let pairs = [(id(0), 3.0), (id(1), 1.0)];
    let mut rng = SeededRandom::new(Some(42));

    let draws = 100_000;
    let mut hits = 0usize;
    for _ in 0..draws {
        if select_branch(&pairs, &mut rng) == Some(id(0)) {
            hits += 1;
        }
    }
    let freq = hits as f64 / draws as f64;
    assert!((freq - 0.75).abs() < 0.01, "branch 0 frequency {freq}");
}

#[test]
fn three_way_split_converges() {
    // Parallel 12 V across 10, 20, 40 ohm: 1.2, 0.6, 0.3 A
    let pairs = [(id(0), 1.2), (id(1), 0.6), (id(2), 0.3)];
    let mut rng = SeededRandom::new(Some(7));
    let mut counts = [0usize; 3];
    let draws = 100_000;
    for _ in 0..draws {
        let chosen = select_branch(&pairs, &mut rng).unwrap();
        counts[chosen.slot()] += 1;
    }
    let total = 2.1;
    for (i, (_, current)) in pairs.iter().enumerate() {
        let freq = counts[i] as f64 / draws as f64;
        assert!((freq - current / total).abs() < 0.01, "branch {i}: {freq}");
    }
}

#[test]
fn animator_completes_exactly_one_loop() {
    let a = Point::new(0.0, 0.0, 0.0);
    let b = Point::new(3.0, 4.0, 0.0); // distance 5
    let path = Path::new(vec![a, b]);
    let config = AnimatorConfig::default();
    let current = 4.0; // speed = 4 * 0.5 = 2 units/s
    let mut anim = PathAnimator::new(path, config).with_current(current);

    let speed = anim.speed();
    let total_time = 2.0 * 5.0 / speed;
    let dt = 0.01;
    let steps = (total_time / dt).round() as usize;
    for _ in 0..steps {
        anim.tick(dt);
    }

    let pos = anim.position().unwrap();
    assert!(
        nalgebra::distance(&pos, &a) < config.arrival_tolerance,
        "ended at {pos:?}"
    );
    assert_eq!(anim.laps_completed(), 1);
    assert_eq!(anim.target_index(), 1);
}

#[test]
fn animator_single_large_tick_loops_once() {
    let path = Path::from_coords(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
    let mut anim = PathAnimator::new(path, AnimatorConfig::default()).with_current(2.0);
    // speed 1, loop length 4
    let pos = anim.tick(4.0).unwrap();
    assert!(pos.x.abs() < 1e-12);
    assert_eq!(anim.laps_completed(), 1);
}

#[test]
fn zero_current_scene_never_spawns() {
    let mut scene = FlowScene::new(SceneConfig::default()).unwrap();
    let path = Path::from_coords(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
    let router = FlowRouter::new(
        vec![RouteBranch::new(id(0), path.clone()), RouteBranch::new(id(1), path)],
        RouterConfig::default(),
    )
    .unwrap();
    scene.set_router(router);
    scene.set_total_current(0.0);

    let mut rng = SeededRandom::new(Some(1));
    for _ in 0..60_000 {
        let frame = scene.tick(1.0 / 60.0, &mut rng).unwrap();
        assert!(frame.spawned.is_none());
    }
    assert!(scene.markers().is_empty());
}

#[test]
fn routed_markers_share_branch_paths() {
    let mut scene = FlowScene::new(SceneConfig::default()).unwrap();
    let path = Path::from_coords(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
    let router =
        FlowRouter::new(vec![RouteBranch::new(id(0), path.clone())], RouterConfig::default())
            .unwrap();
    scene.set_router(router);
    scene.set_total_current(20.0);
    scene.set_branch_current(id(0), 20.0).unwrap();

    let mut rng = SeededRandom::new(Some(3));
    for _ in 0..10 {
        scene.tick(0.05, &mut rng).unwrap();
    }
    assert!(scene.markers().len() > 1);
    for marker in scene.markers() {
        assert!(marker.animator().path().shares_storage(&path));
    }
}

#[test]
fn animator_huge_tick_counts_whole_loops() {
    let path = Path::from_coords(&[[0.0, 0.0, 0.0], [0.5, 0.0, 0.0]]);
    let mut anim = PathAnimator::new(path, AnimatorConfig::default()).with_current(2.0);
    // speed 1, loop length 1
    let pos = anim.tick(1e10).unwrap();
    assert!(pos.x.abs() < 1e-6);
    assert_eq!(anim.laps_completed(), 10_000_000_000);

    assert_eq!(anim.tick(f64::INFINITY), Some(pos));
}

fn branch_currents() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(prop_oneof![Just(0.0), 0.01_f64..5.0, -5.0_f64..-0.01], 0..6)
}

proptest! {
    #[test]
    fn selection_only_lands_on_carrying_branches(
        currents in branch_currents(),
        r in 0.0_f64..1.0,
    ) {
        let pairs: Vec<(BranchId, f64)> = currents
            .iter()
            .enumerate()
            .map(|(i, c)| (id(i as u32), *c))
            .collect();
        let mut seq = SequenceRandom::new(vec![r]);
        let carrying = currents.iter().any(|c| c.abs() > 0.0);

        match select_branch(&pairs, &mut seq) {
            Some(chosen) => {
                prop_assert!(carrying);
                prop_assert!(currents[chosen.slot()].abs() > 0.0);
            }
            None => prop_assert!(!carrying),
        }
    }

    #[test]
    fn top_of_range_falls_back_to_last_carrying_branch(currents in branch_currents()) {
        let pairs: Vec<(BranchId, f64)> = currents
            .iter()
            .enumerate()
            .map(|(i, c)| (id(i as u32), *c))
            .collect();
        let mut seq = SequenceRandom::new(vec![1.0]);
        let last = pairs.iter().rev().find(|(_, c)| c.abs() > 0.0).map(|(b, _)| *b);
        prop_assert_eq!(select_branch(&pairs, &mut seq), last);
    }
}
