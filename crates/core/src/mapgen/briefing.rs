//! Mission name and briefing text.

use crate::rng::LevelRng;
use crate::types::Difficulty;

use super::model::Objective;

const ADJECTIVES: [&str; 12] = [
    "Silent", "Crimson", "Iron", "Hollow", "Broken", "Midnight", "Frozen", "Burning", "Distant",
    "Pale", "Sudden", "Shattered",
];

const NOUNS: [&str; 12] = [
    "Viper", "Lantern", "Harbor", "Anvil", "Falcon", "Citadel", "Tempest", "Needle", "Bastion",
    "Mirage", "Garrison", "Echo",
];

pub fn mission_name(rng: &mut LevelRng) -> String {
    let adjective = rng.pick(&ADJECTIVES).copied().unwrap_or("Silent");
    let noun = rng.pick(&NOUNS).copied().unwrap_or("Viper");
    format!("Operation {adjective} {noun}")
}

fn threat_line(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "Resistance is expected to be light.",
        Difficulty::Medium => "Expect organised resistance.",
        Difficulty::Hard => "The site is heavily fortified; officers are on patrol.",
    }
}

pub fn mission_briefing(
    objectives: &[Objective],
    rooms: usize,
    enemies: usize,
    difficulty: Difficulty,
) -> String {
    let mut briefing = format!(
        "Intelligence reports {enemies} hostiles across {rooms} rooms. {}",
        threat_line(difficulty)
    );
    for (index, objective) in objectives.iter().enumerate() {
        briefing.push_str(&format!("\n{}. {}.", index + 1, objective.title));
    }
    briefing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_the_operation_pattern_and_repeat_per_seed() {
        let mut a = LevelRng::seeded(42);
        let mut b = LevelRng::seeded(42);
        let name = mission_name(&mut a);
        assert_eq!(name, mission_name(&mut b));
        let words: Vec<&str> = name.split(' ').collect();
        assert_eq!(words.len(), 3);
        assert_eq!(words[0], "Operation");
        assert!(ADJECTIVES.contains(&words[1]));
        assert!(NOUNS.contains(&words[2]));
    }

    #[test]
    fn briefing_lists_every_objective_in_order() {
        let objectives: Vec<Objective> = ["Eliminate all hostiles", "Reach the extraction point"]
            .into_iter()
            .enumerate()
            .map(|(index, title)| Objective {
                id: format!("objective_{index}"),
                title: title.to_owned(),
                trigger_id: None,
                tracked_externally: index == 0,
            })
            .collect();
        let briefing = mission_briefing(&objectives, 6, 24, Difficulty::Hard);
        assert!(briefing.starts_with("Intelligence reports 24 hostiles across 6 rooms."));
        assert!(briefing.contains("\n1. Eliminate all hostiles."));
        assert!(briefing.ends_with("\n2. Reach the extraction point."));
    }
}
