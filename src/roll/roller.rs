use crate::common::{Sides, UInt};
use rand::{
    distributions::{DistIter, Distribution, Uniform},
    Rng,
};

/// A source of uniform die faces in `1..=sides`.
pub trait Roller {
    type RollIter<'a>: Iterator<Item = UInt> + 'a
    where
        Self: 'a;

    fn roll(&mut self, sides: Sides) -> UInt;

    fn roll_iter(&mut self, num: usize, sides: Sides) -> Self::RollIter<'_>;

    /// Two independent faces, in the order rolled. Advantage keeps the higher, disadvantage
    /// the lower.
    fn roll_pair(&mut self, sides: Sides) -> (UInt, UInt) {
        let first = self.roll(sides);
        (first, self.roll(sides))
    }
}

impl<R: Rng> Roller for R {
    type RollIter<'a> = std::iter::Take<DistIter<Uniform<UInt>, &'a mut Self, UInt>>
    where
        Self: 'a;

    fn roll(&mut self, sides: Sides) -> UInt {
        self.gen_range(1..=sides.get())
    }

    fn roll_iter(&mut self, num: usize, sides: Sides) -> Self::RollIter<'_> {
        Uniform::new_inclusive(1, sides.get())
            .sample_iter(self)
            .take(num)
    }
}

#[cfg(test)]
pub(crate) use step::StepRoller;


#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn sides(x: UInt) -> Sides {
        Sides::new(x).unwrap()
    }

    #[test]
    fn test_step_roller_wraps() {
        let mut roller = StepRoller::new(5, 1);
        let rolls: Vec<_> = roller.roll_iter(4, sides(6)).collect();
        assert_eq!(rolls, vec![5, 6, 1, 2]);
        assert_eq!(roller.roll(sides(6)), 3);
    }

    #[test]
    fn test_roll_pair_keeps_order() {
        let mut roller = StepRoller::new(6, 1);
        assert_eq!(roller.roll_pair(sides(6)), (6, 1));
        assert_eq!(roller.roll_pair(sides(6)), (2, 3));
    }

    #[test]
    fn test_rng_roll_pair_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let (a, b) = rng.roll_pair(sides(8));
            assert!((1..=8).contains(&a) && (1..=8).contains(&b));
        }
    }

    #[test]
    fn test_rng_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(rng.roll_iter(1000, sides(6)).all(|x| (1..=6).contains(&x)));
        assert!((0..1000).all(|_| (1..=20).contains(&rng.roll(sides(20)))));
    }

    #[test]
    fn test_rng_roll_iter_len() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(rng.roll_iter(17, sides(4)).count(), 17);
        assert_eq!(rng.roll_iter(0, sides(4)).count(), 0);
    }

    #[test]
    fn test_single_sided() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(rng.roll(sides(1)), 1);
    }
}
