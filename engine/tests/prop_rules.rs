//! Property-based tests for the resource arithmetic and turn transitions.

use proptest::prelude::*;

use dice_catan_engine::consume::consume;
use dice_catan_engine::ledger::{available_resources, can_build, missing_resources, ResourceCounts};
use dice_catan_engine::model::{DiceSet, PlayerSpec};
use dice_catan_engine::rules::{BuildKind, Material, ResourceKind, Rules};
use dice_catan_engine::{build, new_game, roll, toggle_lock};

fn material() -> impl Strategy<Value = Material> {
    prop_oneof![
        Just(Material::Lumber),
        Just(Material::Brick),
        Just(Material::Wool),
        Just(Material::Wheat),
        Just(Material::Ore),
    ]
}

fn counts() -> impl Strategy<Value = ResourceCounts> {
    prop::array::uniform6(0u32..6).prop_map(|a| {
        let pairs: Vec<(ResourceKind, u32)> = ResourceKind::ALL.into_iter().zip(a).collect();
        ResourceCounts::from_pairs(&pairs)
    })
}

fn dice() -> impl Strategy<Value = DiceSet> {
    prop::collection::vec(1u8..=6, 6).prop_map(|f| DiceSet::from_faces(&f).unwrap())
}

fn build_kind() -> impl Strategy<Value = BuildKind> {
    prop_oneof![
        Just(BuildKind::Road),
        Just(BuildKind::Settlement),
        Just(BuildKind::City),
        Just(BuildKind::Knight),
    ]
}

proptest! {
    /// Affordability is exactly "two gold per unit of total shortage".
    #[test]
    fn can_build_matches_shortage_formula(
        req in prop::collection::vec(material(), 0..7),
        have in counts(),
    ) {
        let shortage: u32 = [Material::Lumber, Material::Brick, Material::Wool, Material::Wheat, Material::Ore]
            .into_iter()
            .map(|m| {
                let need = req.iter().filter(|&&r| r == m).count() as u32;
                need.saturating_sub(have[m.kind()])
            })
            .sum();
        prop_assert_eq!(can_build(&req, &have), shortage * 2 <= have[ResourceKind::Gold]);
    }

    /// Nothing is missing exactly when the build is affordable.
    #[test]
    fn missing_is_empty_iff_affordable(
        req in prop::collection::vec(material(), 0..7),
        have in counts(),
    ) {
        prop_assert_eq!(missing_resources(&req, &have).is_empty(), can_build(&req, &have));
    }

    /// An affordable build spends exactly its units plus two gold per shortfall,
    /// never touches a consumed die, and never changes a face.
    #[test]
    fn consume_spends_the_right_number_of_dice(
        req in prop::collection::vec(material(), 0..6),
        mut dice in dice(),
        pre_consumed in prop::collection::vec(any::<bool>(), 6),
    ) {
        for (i, c) in pre_consumed.iter().enumerate() {
            dice.get_mut(i).unwrap().consumed = *c;
        }
        let before = dice.clone();
        let available = available_resources(&dice);
        prop_assume!(can_build(&req, &available));

        let shortage: u32 = {
            let mut left = available;
            let mut s = 0;
            for m in &req {
                if left[m.kind()] > 0 { left[m.kind()] -= 1 } else { s += 1 }
            }
            s
        };
        let taken = consume(&mut dice, &req);
        prop_assert_eq!(taken.len() as u32, req.len() as u32 - shortage + shortage * 2);
        prop_assert_eq!(dice.faces(), before.faces());
        for i in taken {
            prop_assert!(!before.get(i).unwrap().consumed);
            prop_assert!(dice.get(i).unwrap().consumed);
        }
    }

    /// Locked dice keep their face through a roll; unlocked dice come back unspent.
    #[test]
    fn roll_respects_locks(seed in any::<u64>(), locks in prop::collection::vec(any::<bool>(), 6)) {
        let mut s = new_game(seed, Rules::default(), &[PlayerSpec::human("a")]).unwrap();
        roll(&mut s).unwrap();
        for (i, &l) in locks.iter().enumerate() {
            if l {
                toggle_lock(&mut s, i).unwrap();
            }
        }
        let before = s.dice.clone();
        roll(&mut s).unwrap();
        for (i, die) in s.dice.iter().enumerate() {
            if locks[i] {
                prop_assert_eq!(die.face, before.get(i).unwrap().face);
            } else {
                prop_assert!(!die.consumed);
            }
        }
        prop_assert!(s.turn.roll_count <= s.rules.max_rolls_per_turn);
    }

    /// A refused build leaves the whole snapshot untouched.
    #[test]
    fn refused_build_changes_nothing(dice in dice(), kind in build_kind()) {
        let mut s = new_game(1, Rules::default(), &[PlayerSpec::human("a")]).unwrap();
        s.dice = dice;
        let before = serde_json::to_value(&s).unwrap();
        if build(&mut s, kind).is_none() {
            prop_assert_eq!(serde_json::to_value(&s).unwrap(), before);
        }
    }
}
