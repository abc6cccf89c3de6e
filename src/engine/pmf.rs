//! Probability mass functions over contiguous integer totals
//!
//! A [`Pmf`] stores one mass per integer in `[min, max]`. Combining two
//! PMFs is a discrete convolution (or cross-correlation for a subtracted
//! die), and the result is renormalised to remove floating-point drift.

use super::die::{AdvantageMode, Die, Sign};
use crate::error::{EngineError, Result};

/// Tolerance within which the masses of a [`Pmf`] sum to one
pub const MASS_TOLERANCE: f64 = 1e-9;

/// Exact distribution over a contiguous range of integer totals
#[derive(Debug, Clone, PartialEq)]
pub struct Pmf {
    min: i32,
    probs: Vec<f64>,
}

impl Pmf {
    /// Build a PMF starting at `min` from non-negative weights.
    ///
    /// The weights are normalised to sum to one. Empty input, negative or
    /// non-finite weights and a zero total are rejected instead of being
    /// patched over.
    pub fn from_weights(min: i32, weights: Vec<f64>) -> Result<Self> {
        if weights.is_empty() {
            return Err(EngineError::InvalidDistribution(
                "distribution has no support".to_string(),
            ));
        }
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(EngineError::InvalidDistribution(format!(
                "mass {} is not a finite non-negative number",
                bad
            )));
        }
        let span = i32::try_from(weights.len() - 1).ok();
        if span.and_then(|span| min.checked_add(span)).is_none() {
            return Err(EngineError::TotalOutOfRange(format!(
                "a distribution of {} totals starting at {}",
                weights.len(),
                min
            )));
        }

        let total: f64 = weights.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(EngineError::InvalidDistribution(format!(
                "total mass {} cannot be normalised",
                total
            )));
        }

        let probs = weights.into_iter().map(|w| w / total).collect();
        Ok(Self { min, probs })
    }

    /// Smallest achievable total
    pub fn min(&self) -> i32 {
        self.min
    }

    /// Largest achievable total
    pub fn max(&self) -> i32 {
        self.min + (self.probs.len() - 1) as i32
    }

    /// Number of totals in the support
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    /// Always false; a valid PMF has at least one total
    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// Mass at `total`, zero outside the support
    pub fn probability(&self, total: i32) -> f64 {
        if total < self.min || total > self.max() {
            return 0.0;
        }
        self.probs[(i64::from(total) - i64::from(self.min)) as usize]
    }

    /// Masses in ascending order of total
    pub fn masses(&self) -> &[f64] {
        &self.probs
    }

    /// `(total, mass)` pairs in ascending order of total
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.probs
            .iter()
            .enumerate()
            .map(move |(i, &p)| (self.min + i as i32, p))
    }

    /// Expected total
    pub fn mean(&self) -> f64 {
        self.iter().map(|(total, p)| total as f64 * p).sum()
    }

    /// Same masses, every total moved by `offset`
    pub fn shifted(&self, offset: i32) -> Result<Self> {
        let out_of_range = || {
            EngineError::TotalOutOfRange(format!(
                "{}..={} shifted by {}",
                self.min,
                self.max(),
                offset
            ))
        };
        let min = self.min.checked_add(offset).ok_or_else(out_of_range)?;
        self.max().checked_add(offset).ok_or_else(out_of_range)?;

        Ok(Self {
            min,
            probs: self.probs.clone(),
        })
    }
}

/// Distribution of a single die under an advantage mode
pub fn base_distribution(die: Die, advantage: AdvantageMode) -> Pmf {
    let n = die.sides() as f64;
    let weights: Vec<f64> = (1..=die.sides())
        .map(|v| {
            let v = v as f64;
            match advantage {
                AdvantageMode::None => 1.0,
                // Ways for the higher of two rolls to equal v
                AdvantageMode::Advantage => 2.0 * (v - 1.0) + 1.0,
                AdvantageMode::Disadvantage => 2.0 * (n - v) + 1.0,
            }
        })
        .collect();

    let total = match advantage {
        AdvantageMode::None => n,
        _ => n * n,
    };

    Pmf {
        min: 1,
        probs: weights.into_iter().map(|w| w / total).collect(),
    }
}

/// Same as [`base_distribution`] from a raw side count
pub fn base_distribution_for_sides(sides: i64, advantage: AdvantageMode) -> Result<Pmf> {
    let sides = u32::try_from(sides).map_err(|_| EngineError::InvalidDie { sides })?;
    Ok(base_distribution(Die::new(sides)?, advantage))
}

/// Distribution of `a + sign * b` for independent `a` and `b`
pub fn combine(a: &Pmf, b: &Pmf, sign: Sign) -> Result<Pmf> {
    if a.is_empty() || b.is_empty() {
        return Err(EngineError::InvalidDistribution(
            "cannot combine an empty distribution".to_string(),
        ));
    }

    let len = a.len() + b.len() - 1;
    let mut weights = vec![0.0; len];
    let last_b = b.len() - 1;

    for (i, &pa) in a.masses().iter().enumerate() {
        for (j, &pb) in b.masses().iter().enumerate() {
            let k = match sign {
                Sign::Plus => i + j,
                // b reflected: its largest value lands first
                Sign::Minus => i + (last_b - j),
            };
            weights[k] += pa * pb;
        }
    }

    let min = match sign {
        Sign::Plus => a.min().checked_add(b.min()),
        Sign::Minus => a.min().checked_sub(b.max()),
    }
    .ok_or_else(|| {
        EngineError::TotalOutOfRange(format!(
            "{}..={} combined with {}..={}",
            a.min(),
            a.max(),
            b.min(),
            b.max()
        ))
    })?;

    Pmf::from_weights(min, weights)
}

/// Probability of meeting or beating each total in the support.
///
/// The first entry is exactly `1.0` and the sequence never increases.
/// Thresholds above the support succeed with probability `0.0`.
pub fn cumulative_success(pmf: &Pmf) -> Vec<(i32, f64)> {
    let mut tail = 0.0;
    let mut survival: Vec<f64> = pmf
        .masses()
        .iter()
        .rev()
        .map(|p| {
            tail += p;
            tail.clamp(0.0, 1.0)
        })
        .collect();
    survival.reverse();

    if let Some(first) = survival.first_mut() {
        *first = 1.0;
    }

    survival
        .into_iter()
        .enumerate()
        .map(|(i, p)| (pmf.min() + i as i32, p))
        .collect()
}

/// Probability that the total is at least `dc`
pub fn success_probability(pmf: &Pmf, dc: i32) -> f64 {
    if dc <= pmf.min() {
        return 1.0;
    }
    if dc > pmf.max() {
        return 0.0;
    }
    let start = (i64::from(dc) - i64::from(pmf.min())) as usize;
    let tail: f64 = pmf.masses()[start..].iter().rev().sum();
    tail.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_uniform_base() {
        let pmf = base_distribution(Die::D20, AdvantageMode::None);
        assert_eq!(pmf.min(), 1);
        assert_eq!(pmf.max(), 20);
        for (_, p) in pmf.iter() {
            assert_close(p, 0.05);
        }
    }

    #[test]
    fn test_advantage_base() {
        let pmf = base_distribution(Die::D4, AdvantageMode::Advantage);
        let expected = [1.0 / 16.0, 3.0 / 16.0, 5.0 / 16.0, 7.0 / 16.0];
        for (p, e) in pmf.masses().iter().zip(expected) {
            assert_close(*p, e);
        }
    }

    #[test]
    fn test_disadvantage_mirrors_advantage() {
        for sides in [1, 4, 6, 20, 100] {
            let die = Die::new(sides).unwrap();
            let adv = base_distribution(die, AdvantageMode::Advantage);
            let dis = base_distribution(die, AdvantageMode::Disadvantage);
            for v in 1..=sides as i32 {
                assert_eq!(adv.probability(v), dis.probability(sides as i32 + 1 - v));
            }
        }
    }

    #[test]
    fn test_advantage_favours_top_face() {
        let none = base_distribution(Die::D20, AdvantageMode::None);
        let adv = base_distribution(Die::D20, AdvantageMode::Advantage);
        let dis = base_distribution(Die::D20, AdvantageMode::Disadvantage);
        assert!(adv.probability(20) > none.probability(20));
        assert!(dis.probability(20) < none.probability(20));
        assert!(dis.probability(1) > none.probability(1));
    }

    #[test]
    fn test_one_sided_die() {
        for mode in AdvantageMode::all() {
            let pmf = base_distribution(Die::new(1).unwrap(), *mode);
            assert_eq!(pmf.len(), 1);
            assert_eq!(pmf.probability(1), 1.0);
        }
    }

    #[test]
    fn test_raw_sides_rejected() {
        assert_eq!(
            base_distribution_for_sides(0, AdvantageMode::None),
            Err(EngineError::InvalidDie { sides: 0 })
        );
        assert_eq!(
            base_distribution_for_sides(-6, AdvantageMode::Advantage),
            Err(EngineError::InvalidDie { sides: -6 })
        );
        assert_eq!(base_distribution_for_sides(6, AdvantageMode::None).unwrap().len(), 6);
    }

    #[test]
    fn test_two_d6_triangular() {
        let d6 = base_distribution(Die::D6, AdvantageMode::None);
        let sum = combine(&d6, &d6, Sign::Plus).unwrap();
        assert_eq!((sum.min(), sum.max()), (2, 12));
        assert_close(sum.probability(2), 1.0 / 36.0);
        assert_close(sum.probability(7), 6.0 / 36.0);
        assert_close(sum.probability(12), 1.0 / 36.0);
    }

    #[test]
    fn test_subtract_support_and_shape() {
        let d20 = base_distribution(Die::D20, AdvantageMode::None);
        let d4 = base_distribution(Die::D4, AdvantageMode::None);
        let diff = combine(&d20, &d4, Sign::Minus).unwrap();
        assert_eq!((diff.min(), diff.max()), (-3, 19));
        // Only 1 - 4 reaches -3
        assert_close(diff.probability(-3), 1.0 / 80.0);
        assert_close(diff.probability(19), 1.0 / 80.0);
        assert_close(diff.probability(10), 4.0 / 80.0);
    }

    #[test]
    fn test_subtract_is_not_symmetric_for_skewed_kernel() {
        let d2 = base_distribution(Die::new(2).unwrap(), AdvantageMode::None);
        let skewed = Pmf::from_weights(1, vec![3.0, 1.0]).unwrap();
        let diff = combine(&d2, &skewed, Sign::Minus).unwrap();
        // d2 - X with P(X=1)=0.75, P(X=2)=0.25
        assert_eq!((diff.min(), diff.max()), (-1, 1));
        assert_close(diff.probability(-1), 0.5 * 0.25);
        assert_close(diff.probability(0), 0.5 * 0.75 + 0.5 * 0.25);
        assert_close(diff.probability(1), 0.5 * 0.75);
    }

    #[test]
    fn test_from_weights_rejects_malformed() {
        assert!(matches!(
            Pmf::from_weights(0, vec![]),
            Err(EngineError::InvalidDistribution(_))
        ));
        assert!(matches!(
            Pmf::from_weights(0, vec![0.0, 0.0]),
            Err(EngineError::InvalidDistribution(_))
        ));
        assert!(matches!(
            Pmf::from_weights(0, vec![1.0, -0.5]),
            Err(EngineError::InvalidDistribution(_))
        ));
        assert!(matches!(
            Pmf::from_weights(0, vec![f64::NAN]),
            Err(EngineError::InvalidDistribution(_))
        ));
    }

    #[test]
    fn test_from_weights_normalises() {
        let pmf = Pmf::from_weights(-2, vec![1.0, 2.0, 1.0]).unwrap();
        assert_eq!((pmf.min(), pmf.max()), (-2, 0));
        assert_close(pmf.probability(-1), 0.5);
        assert_eq!(pmf.probability(5), 0.0);
    }

    #[test]
    fn test_cumulative_success_d20() {
        let pmf = base_distribution(Die::D20, AdvantageMode::None);
        let curve = cumulative_success(&pmf);
        assert_eq!(curve.len(), 20);
        assert_eq!(curve[0], (1, 1.0));
        assert_close(curve[14].1, 0.30);
        assert_eq!(curve[14].0, 15);
        assert_close(curve[19].1, 0.05);
        for pair in curve.windows(2) {
            assert!(pair[1].1 <= pair[0].1);
        }
    }

    #[test]
    fn test_success_probability_bounds() {
        let pmf = base_distribution(Die::D20, AdvantageMode::None);
        assert_eq!(success_probability(&pmf, -10), 1.0);
        assert_eq!(success_probability(&pmf, 1), 1.0);
        assert_close(success_probability(&pmf, 15), 0.30);
        assert_close(success_probability(&pmf, 20), 0.05);
        assert_eq!(success_probability(&pmf, 21), 0.0);
    }

    #[test]
    fn test_shift_and_mean() {
        let pmf = base_distribution(Die::D6, AdvantageMode::None)
            .shifted(3)
            .unwrap();
        assert_eq!((pmf.min(), pmf.max()), (4, 9));
        assert_close(pmf.mean(), 6.5);
    }

    #[test]
    fn test_shift_past_integer_range() {
        let d20 = base_distribution(Die::D20, AdvantageMode::None);
        assert!(matches!(
            d20.shifted(i32::MAX),
            Err(EngineError::TotalOutOfRange(_))
        ));
        assert!(matches!(
            d20.shifted(i32::MIN),
            Ok(ref pmf) if pmf.min() == i32::MIN + 1
        ));
        assert!(matches!(
            d20.shifted(i32::MIN).unwrap().shifted(-2),
            Err(EngineError::TotalOutOfRange(_))
        ));
        // Largest shift that keeps the top face representable
        assert_eq!(d20.shifted(i32::MAX - 20).unwrap().max(), i32::MAX);
    }

    #[test]
    fn test_combine_past_integer_range() {
        let d4 = base_distribution(Die::D4, AdvantageMode::None);
        let low = d4.shifted(i32::MIN).unwrap();
        assert!(matches!(
            combine(&low, &d4, Sign::Minus),
            Err(EngineError::TotalOutOfRange(_))
        ));
        let high = d4.shifted(i32::MAX - 4).unwrap();
        assert!(matches!(
            combine(&high, &d4, Sign::Plus),
            Err(EngineError::TotalOutOfRange(_))
        ));
    }
}
