//! Marks dice as spent for a build. Faces never change here.

use crate::ledger::tally;
use crate::model::DiceSet;
use crate::rules::{Material, ResourceKind, GOLD_EXCHANGE_RATE};

/// Spend dice for `requirement`, returning the indices marked consumed.
///
/// Exact matches are taken first, lowest index first. Whatever is still
/// short is then paid with gold at the exchange rate, again lowest index
/// first. Locked dice are eligible; consumed dice are never picked twice.
/// Callers check affordability beforehand; with too little gold the gold
/// pass simply spends what there is.
pub fn consume(dice: &mut DiceSet, requirement: &[Material]) -> Vec<usize> {
    let mut taken = Vec::new();
    let mut shortage = 0u32;

    for (material, need) in tally(requirement) {
        let found = take(dice, material.kind(), need, &mut taken);
        shortage += need - found;
    }

    if shortage > 0 {
        take(dice, ResourceKind::Gold, shortage * GOLD_EXCHANGE_RATE, &mut taken);
    }
    taken
}

fn take(dice: &mut DiceSet, kind: ResourceKind, want: u32, taken: &mut Vec<usize>) -> u32 {
    let mut found = 0;
    for (i, die) in dice.iter_mut().enumerate() {
        if found == want {
            break;
        }
        if !die.consumed && die.resource() == kind {
            die.consumed = true;
            taken.push(i);
            found += 1;
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{available_resources, can_build};
    use crate::rules::Material::*;

    fn flags(dice: &DiceSet) -> Vec<bool> {
        dice.iter().map(|d| d.consumed).collect()
    }

    #[test]
    fn exact_matches_take_lowest_indices() {
        let mut dice = DiceSet::from_faces(&[1, 2, 3, 4, 5, 6]).unwrap();
        let taken = consume(&mut dice, &[Lumber, Brick]);
        assert_eq!(taken, vec![0, 1]);
        assert_eq!(flags(&dice), vec![true, true, false, false, false, false]);
        assert_eq!(dice.faces(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn shortage_is_paid_with_two_gold_each() {
        let mut dice = DiceSet::from_faces(&[1, 6, 3, 6, 6, 4]).unwrap();
        let taken = consume(&mut dice, &[Lumber, Brick]);
        assert_eq!(taken, vec![0, 1, 3]);
        assert_eq!(flags(&dice), vec![true, true, false, true, false, false]);
    }

    #[test]
    fn already_consumed_dice_are_skipped() {
        let mut dice = DiceSet::from_faces(&[1, 1, 2, 2, 5, 5]).unwrap();
        dice.get_mut(0).unwrap().consumed = true;
        let taken = consume(&mut dice, &[Lumber, Brick]);
        assert_eq!(taken, vec![1, 2]);
    }

    #[test]
    fn locked_dice_can_be_spent() {
        let mut dice = DiceSet::from_faces(&[3, 5, 1, 1, 1, 1]).unwrap();
        dice.get_mut(0).unwrap().locked = true;
        let taken = consume(&mut dice, &[Wool, Ore]);
        assert_eq!(taken, vec![0, 1]);
        assert!(dice.get(0).unwrap().locked);
    }

    #[test]
    fn repeated_units_take_one_die_each() {
        let mut dice = DiceSet::from_faces(&[5, 4, 5, 4, 5, 5]).unwrap();
        let taken = consume(&mut dice, &[Wheat, Wheat, Ore, Ore, Ore]);
        assert_eq!(taken, vec![1, 3, 0, 2, 4]);
        assert!(!dice.get(5).unwrap().consumed);
    }

    #[test]
    fn affordable_build_leaves_consistent_ledger() {
        let mut dice = DiceSet::from_faces(&[4, 4, 5, 6, 6, 5]).unwrap();
        let city = [Wheat, Wheat, Ore, Ore, Ore];
        assert!(can_build(&city, &available_resources(&dice)));
        consume(&mut dice, &city);
        assert_eq!(available_resources(&dice).total(), 0);
    }
}
