//! Resource ledger and affordability checks.
//!
//! Counts come only from unconsumed dice. Gold stands in for any other
//! resource at [`GOLD_EXCHANGE_RATE`] gold per unit.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::model::DiceSet;
use crate::rules::{Material, ResourceKind, GOLD_EXCHANGE_RATE};

/// Per-kind resource counts, indexed by [`ResourceKind`].
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceCounts([u32; 6]);

impl ResourceCounts {
    pub fn from_pairs(pairs: &[(ResourceKind, u32)]) -> Self {
        let mut counts = Self::default();
        for &(kind, n) in pairs {
            counts[kind] += n;
        }
        counts
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        ResourceKind::ALL.into_iter().map(move |k| (k, self[k]))
    }
}

impl Index<ResourceKind> for ResourceCounts {
    type Output = u32;

    fn index(&self, kind: ResourceKind) -> &u32 {
        &self.0[kind.index()]
    }
}

impl IndexMut<ResourceKind> for ResourceCounts {
    fn index_mut(&mut self, kind: ResourceKind) -> &mut u32 {
        &mut self.0[kind.index()]
    }
}

/// Resources on the table: unconsumed dice only, locked or not.
pub fn available_resources(dice: &DiceSet) -> ResourceCounts {
    let mut counts = ResourceCounts::default();
    for die in dice.iter().filter(|d| !d.consumed) {
        counts[die.resource()] += 1;
    }
    counts
}

/// Collapse a recipe into `(material, count)` in order of first appearance.
pub(crate) fn tally(requirement: &[Material]) -> Vec<(Material, u32)> {
    let mut needed: Vec<(Material, u32)> = Vec::with_capacity(requirement.len());
    for &m in requirement {
        match needed.iter_mut().find(|(k, _)| *k == m) {
            Some((_, n)) => *n += 1,
            None => needed.push((m, 1)),
        }
    }
    needed
}

/// Units of each material the non-gold resources cannot cover.
fn shortages(requirement: &[Material], available: &ResourceCounts) -> Vec<(Material, u32)> {
    tally(requirement)
        .into_iter()
        .map(|(m, need)| (m, need.saturating_sub(available[m.kind()])))
        .collect()
}

pub fn total_shortage(requirement: &[Material], available: &ResourceCounts) -> u32 {
    shortages(requirement, available).iter().map(|(_, s)| s).sum()
}

/// True iff the available gold covers every shortage at the exchange rate.
pub fn can_build(requirement: &[Material], available: &ResourceCounts) -> bool {
    available[ResourceKind::Gold] >= total_shortage(requirement, available) * GOLD_EXCHANGE_RATE
}

/// Resources still missing once every gold pair has been spent. Pairs go to
/// shortages in recipe order; a kind short by `n` units appears `n` times.
pub fn missing_resources(requirement: &[Material], available: &ResourceCounts) -> Vec<Material> {
    let mut pairs = available[ResourceKind::Gold] / GOLD_EXCHANGE_RATE;
    let mut missing = Vec::new();
    for (m, short) in shortages(requirement, available) {
        let covered = short.min(pairs);
        pairs -= covered;
        missing.extend(std::iter::repeat(m).take((short - covered) as usize));
    }
    missing
}
