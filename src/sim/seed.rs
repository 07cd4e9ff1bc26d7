use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::model::Position;

/// Deterministic seed from a cell position plus a category discriminator.
pub fn make_seed(pos: Position, discriminator: &str) -> u64 {
    let mut hasher = std::hash::DefaultHasher::new();
    pos.x.hash(&mut hasher);
    pos.y.hash(&mut hasher);
    discriminator.hash(&mut hasher);
    hasher.finish()
}

/// Seeded RNG for anything that must look the same to every actor standing on
/// the same cell, such as a merchant's offers.
pub fn make_rng(pos: Position, discriminator: &str) -> SmallRng {
    SmallRng::seed_from_u64(make_seed(pos, discriminator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_same_seed() {
        assert_eq!(
            make_seed(Position::new(4, 9), "trade"),
            make_seed(Position::new(4, 9), "trade")
        );
    }

    #[test]
    fn axes_are_not_interchangeable() {
        assert_ne!(
            make_seed(Position::new(4, 9), "trade"),
            make_seed(Position::new(9, 4), "trade")
        );
    }

    #[test]
    fn different_discriminator_different_seed() {
        assert_ne!(
            make_seed(Position::new(1, 1), "trade"),
            make_seed(Position::new(1, 1), "loot")
        );
    }

    #[test]
    fn make_rng_deterministic() {
        use rand::Rng;
        let mut a = make_rng(Position::new(3, 3), "trade");
        let mut b = make_rng(Position::new(3, 3), "trade");
        let va: Vec<u32> = (0..10).map(|_| a.random()).collect();
        let vb: Vec<u32> = (0..10).map(|_| b.random()).collect();
        assert_eq!(va, vb);
    }
}
