//! Victory points and the two contested bonus tracks.

use serde::{Deserialize, Serialize};

use crate::model::{BonusState, BonusTrack, Player, PlayerId};
use crate::rules::{BuildKind, Rules};

/// A bonus changing hands (or being claimed for the first time).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BonusTransfer {
    pub track: BonusTrack,
    pub from: Option<PlayerId>,
    pub to: PlayerId,
}

/// Re-evaluate both tracks after `acting` built something.
///
/// Only the acting player can claim a track: they need at least the
/// threshold and strictly more than the current holder. Ties keep the
/// incumbent, and other players are never recounted here.
pub fn evaluate_bonuses(
    acting: &Player,
    players: &[Player],
    bonus: &mut BonusState,
    rules: &Rules,
) -> Vec<BonusTransfer> {
    let mut transfers = Vec::new();
    for track in BonusTrack::ALL {
        let count = acting.builds.get(track.counted());
        if count < track.threshold(rules) {
            continue;
        }
        let slot = bonus.holder_mut(track);
        let claim = match slot.as_deref() {
            None => true,
            Some(holder) if holder == acting.id => false,
            Some(holder) => {
                let held = players
                    .iter()
                    .find(|p| p.id == holder)
                    .map_or(0, |p| p.builds.get(track.counted()));
                count > held
            }
        };
        if claim {
            let from = slot.replace(acting.id.clone());
            transfers.push(BonusTransfer { track, from, to: acting.id.clone() });
        }
    }
    transfers
}

/// Points one player has from builds plus held bonuses.
pub fn score(player: &Player, bonus: &BonusState, rules: &Rules) -> u32 {
    let builds: u32 = BuildKind::ALL
        .into_iter()
        .map(|k| player.builds.get(k) * rules.build(k).points)
        .sum();
    let bonuses = BonusTrack::ALL
        .into_iter()
        .filter(|&t| bonus.holds(t, &player.id))
        .count() as u32
        * rules.bonus_points;
    builds + bonuses
}

/// Refresh every player's total. A transfer moves points between two
/// players at once, so all of them are recomputed.
pub fn recompute(players: &mut [Player], bonus: &BonusState, rules: &Rules) {
    for player in players.iter_mut() {
        player.victory_points = score(player, bonus, rules);
    }
}
