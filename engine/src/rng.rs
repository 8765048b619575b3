//! Seeded dice stream. Each event gets its own generator derived from the
//! game seed and the event sequence number, so replaying the same commands
//! against the same seed reproduces every roll.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::model::Face;
use crate::rules::ResourceKind;

const EVENT_MIX: u64 = 7919;

pub fn event_rng(seed: u64, events_seq: u64) -> StdRng {
    StdRng::seed_from_u64(seed ^ events_seq.wrapping_mul(EVENT_MIX))
}

pub fn roll_face<R: Rng + ?Sized>(rng: &mut R) -> Face {
    Face::from(ResourceKind::ALL[rng.gen_range(0..ResourceKind::ALL.len())])
}

/// Six-character uppercase room code, e.g. `K3Q9ZD`.
pub fn game_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    (0..6).map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_and_seq_roll_the_same() {
        let (mut r1, mut r2) = (event_rng(42, 3), event_rng(42, 3));
        let a: Vec<u8> = (0..20).map(|_| roll_face(&mut r1).value()).collect();
        let b: Vec<u8> = (0..20).map(|_| roll_face(&mut r2).value()).collect();
        assert_eq!(a, b);
        assert!(a.iter().all(|f| (1..=6).contains(f)));
    }

    #[test]
    fn game_codes_are_six_uppercase_alphanumerics() {
        let code = game_code(&mut event_rng(7, 0));
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
