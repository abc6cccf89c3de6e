//! Roll configuration and the full distribution build

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::die::{AdvantageMode, Die, SignedDie};
use super::pmf::{base_distribution, combine, Pmf};
use crate::error::{EngineError, Result};

/// Everything that determines a check's outcome distribution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RollConfiguration {
    /// The die advantage and disadvantage apply to
    pub main_die: Die,
    pub advantage: AdvantageMode,
    /// Extra dice in display order
    #[serde(default)]
    pub extras: Vec<SignedDie>,
    /// Flat bonus or penalty
    #[serde(default)]
    pub modifier: i32,
}

impl RollConfiguration {
    /// A plain roll of `main_die`
    pub fn new(main_die: Die) -> Self {
        Self {
            main_die,
            advantage: AdvantageMode::None,
            extras: Vec::new(),
            modifier: 0,
        }
    }

    pub fn with_advantage(mut self, advantage: AdvantageMode) -> Self {
        self.advantage = advantage;
        self
    }

    pub fn with_extra(mut self, extra: SignedDie) -> Self {
        self.extras.push(extra);
        self
    }

    pub fn with_extras(mut self, extras: impl IntoIterator<Item = SignedDie>) -> Self {
        self.extras.extend(extras);
        self
    }

    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
    }

    /// Smallest achievable total
    pub fn min_total(&self) -> Result<i32> {
        let extras: i64 = self
            .extras
            .iter()
            .map(|e| i64::from(e.min_contribution()))
            .sum();
        self.fit_total(1 + extras + i64::from(self.modifier))
    }

    /// Largest achievable total
    pub fn max_total(&self) -> Result<i32> {
        let extras: i64 = self
            .extras
            .iter()
            .map(|e| i64::from(e.max_contribution()))
            .sum();
        self.fit_total(i64::from(self.main_die.sides()) + extras + i64::from(self.modifier))
    }

    fn fit_total(&self, total: i64) -> Result<i32> {
        i32::try_from(total).map_err(|_| EngineError::TotalOutOfRange(self.to_string()))
    }
}

impl Default for RollConfiguration {
    fn default() -> Self {
        Self::new(Die::D20)
    }
}

impl fmt::Display for RollConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.main_die)?;
        match self.advantage {
            AdvantageMode::Advantage => write!(f, "(adv)")?,
            AdvantageMode::Disadvantage => write!(f, "(dis)")?,
            AdvantageMode::None => {}
        }
        for extra in &self.extras {
            write!(f, " {}", extra)?;
        }
        if self.modifier > 0 {
            write!(f, " +{}", self.modifier)?;
        } else if self.modifier < 0 {
            write!(f, " {}", self.modifier)?;
        }
        Ok(())
    }
}

/// Exact distribution of totals for `config`.
///
/// Advantage shapes the main die only; extras are always plain rolls.
pub fn build_distribution(config: &RollConfiguration) -> Result<Pmf> {
    let mut pmf = base_distribution(config.main_die, config.advantage);

    for extra in &config.extras {
        let kernel = base_distribution(extra.die, AdvantageMode::None);
        pmf = combine(&pmf, &kernel, extra.sign)?;
    }

    let pmf = pmf.shifted(config.modifier)?;
    debug!(
        config = %config,
        min = pmf.min(),
        max = pmf.max(),
        "built roll distribution"
    );
    Ok(pmf)
}
