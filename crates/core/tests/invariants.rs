use levelgen::mapgen::objectives::EXIT_OBJECTIVE;
use levelgen::mapgen::props::same_column;
use levelgen::{
    Difficulty, GenerationOptions, LevelValidator, Vec3, audit_level, door_proximity_reachability,
    generate_level,
};
use proptest::prelude::*;

fn difficulty_from(selector: u8) -> Difficulty {
    match selector % 3 {
        0 => Difficulty::Easy,
        1 => Difficulty::Medium,
        _ => Difficulty::Hard,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn every_generated_level_passes_the_audit(
        seed in any::<u32>(),
        selector in any::<u8>(),
        min_rooms in 1_usize..=8,
        extra_rooms in 0_usize..=4,
    ) {
        let options = GenerationOptions::seeded(seed)
            .with_rooms(min_rooms, min_rooms + extra_rooms)
            .with_difficulty(difficulty_from(selector));
        let generated = generate_level(&options).unwrap();
        let level = &generated.level;

        prop_assert!((min_rooms..=min_rooms + extra_rooms).contains(&level.rooms.len()));
        let findings = audit_level(level);
        prop_assert!(findings.is_empty(), "seed={seed}: {findings:?}");
        prop_assert!(generated.report.is_clean(), "seed={seed}: {:?}", generated.report);
    }

    #[test]
    fn ids_are_sequential_per_collection(seed in any::<u32>()) {
        let level = generate_level(&GenerationOptions::seeded(seed)).unwrap().level;
        for (index, room) in level.rooms.iter().enumerate() {
            prop_assert_eq!(room.id as usize, index);
        }
        for (index, enemy) in level.enemies.iter().enumerate() {
            prop_assert_eq!(enemy.id as usize, index);
        }
        for (index, prop) in level.props.iter().enumerate() {
            prop_assert_eq!(prop.id as usize, index);
        }
    }
}

#[test]
fn props_never_overlap_outside_a_stack() {
    for seed in [5_u32, 55, 555, 5_555, 55_555] {
        let level = generate_level(&GenerationOptions::seeded(seed)).unwrap().level;
        for (index, a) in level.props.iter().enumerate() {
            for b in &level.props[(index + 1)..] {
                if same_column(a, b) {
                    continue;
                }
                let gap = a.position.distance_xz(b.position);
                let reach = a.prop_type.footprint_radius() * a.scale
                    + b.prop_type.footprint_radius() * b.scale;
                assert!(gap + 1e-3 >= reach, "seed={seed}: props {} and {} overlap", a.id, b.id);
            }
        }
    }
}

#[test]
fn exit_trigger_waits_for_every_other_objective() {
    let level = generate_level(&GenerationOptions::seeded(2_718).with_rooms(8, 8)).unwrap().level;
    let exit = level.triggers.iter().find(|trigger| trigger.is_exit).expect("exit trigger");

    assert!(exit.on_enter.end_mission);
    let others: Vec<&str> = level
        .objectives
        .iter()
        .map(|objective| objective.id.as_str())
        .filter(|id| exit.on_enter.complete_objective.as_deref() != Some(*id))
        .collect();
    assert_eq!(exit.prerequisites, others);
}

#[test]
fn validator_repairs_a_damaged_level_and_then_stays_quiet() {
    let mut level = generate_level(&GenerationOptions::seeded(4_242)).unwrap().level;
    assert!(!level.enemies.is_empty());

    level.enemies[0].position = Vec3::flat(10_000.0, 10_000.0);
    level.triggers.retain(|trigger| !trigger.is_exit);
    level.doors.remove(0);
    level.player_spawn = None;

    let mut validator = LevelValidator::seeded(17);
    let first = validator.validate(&mut level);
    assert!(!first.issues.is_empty());
    assert!(!first.fixes.is_empty());
    assert!(level.player_spawn.is_some());

    let second = validator.validate(&mut level);
    assert!(second.is_clean(), "second pass still found {:?}", second.issues);
    assert_eq!(door_proximity_reachability(&level).len(), level.rooms.len());
    assert_eq!(audit_level(&level), Vec::<String>::new());
    let exit_objective =
        level.objectives.iter().find(|objective| objective.id == EXIT_OBJECTIVE).expect("exit");
    assert!(exit_objective.trigger_id.is_some());
}
