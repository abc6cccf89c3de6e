//! Concrete rolls
//!
//! Sampling draws one outcome from an injected random source. It is kept
//! apart from the exact distribution code, which never touches randomness.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::RollConfiguration;
use super::die::{AdvantageMode, Die, Sign};
use crate::error::{EngineError, Result};

/// How a concrete roll treats advantage, signs and the modifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleMode {
    /// Behaves like the classic one-click roll: the main die is rolled once
    /// whatever the advantage mode, every extra die is added even when it
    /// is marked as subtracted, and the modifier is left out. Totals can
    /// therefore fall outside the charted distribution.
    ///
    /// Not a bug-for-bug copy: every draw here covers the full
    /// `1..=sides`, whereas the one-click roll never came up on a die's
    /// top face.
    Faithful,
    /// Rolls twice under advantage or disadvantage, honours each extra's
    /// sign and adds the modifier, so every total lies in the charted
    /// range.
    #[default]
    Corrected,
}

impl FromStr for SampleMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "faithful" => Ok(SampleMode::Faithful),
            "corrected" => Ok(SampleMode::Corrected),
            _ => Err(EngineError::InvalidNotation {
                input: s.to_string(),
                reason: "expected faithful or corrected".to_string(),
            }),
        }
    }
}

impl fmt::Display for SampleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleMode::Faithful => f.write_str("faithful"),
            SampleMode::Corrected => f.write_str("corrected"),
        }
    }
}

/// One concrete roll and how its total was made up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roll {
    /// Every face rolled on the main die (two under advantage/disadvantage)
    pub main_rolls: Vec<u32>,
    /// The main die value that counts
    pub main: u32,
    /// Signed contribution of each extra die, in configuration order
    pub extras: Vec<i32>,
    /// Modifier that was applied
    pub modifier: i32,
    pub total: i32,
}

impl Roll {
    /// Success means meeting or beating the DC
    pub fn succeeds(&self, dc: i32) -> bool {
        self.total >= dc
    }
}

fn roll_die<R: Rng + ?Sized>(die: Die, rng: &mut R) -> u32 {
    rng.random_range(1..=die.sides())
}

/// Roll `config` once using `rng`.
///
/// Fails only when the total does not fit in an `i32`.
pub fn sample<R: Rng + ?Sized>(
    config: &RollConfiguration,
    mode: SampleMode,
    rng: &mut R,
) -> Result<Roll> {
    let (main_rolls, main) = match (mode, config.advantage) {
        (SampleMode::Faithful, _) | (SampleMode::Corrected, AdvantageMode::None) => {
            let value = roll_die(config.main_die, rng);
            (vec![value], value)
        }
        (SampleMode::Corrected, AdvantageMode::Advantage) => {
            let first = roll_die(config.main_die, rng);
            let second = roll_die(config.main_die, rng);
            (vec![first, second], first.max(second))
        }
        (SampleMode::Corrected, AdvantageMode::Disadvantage) => {
            let first = roll_die(config.main_die, rng);
            let second = roll_die(config.main_die, rng);
            (vec![first, second], first.min(second))
        }
    };

    let extras: Vec<i32> = config
        .extras
        .iter()
        .map(|extra| {
            // Die::MAX_SIDES keeps every face within i32
            let value = roll_die(extra.die, rng) as i32;
            match (mode, extra.sign) {
                (SampleMode::Corrected, Sign::Minus) => -value,
                _ => value,
            }
        })
        .collect();

    let modifier = match mode {
        SampleMode::Faithful => 0,
        SampleMode::Corrected => config.modifier,
    };

    let total = i64::from(main)
        + extras.iter().map(|v| i64::from(*v)).sum::<i64>()
        + i64::from(modifier);
    let total =
        i32::try_from(total).map_err(|_| EngineError::TotalOutOfRange(config.to_string()))?;

    Ok(Roll {
        main_rolls,
        main,
        extras,
        modifier,
        total,
    })
}
