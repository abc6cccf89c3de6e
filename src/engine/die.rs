//! Dice and their notation
//!
//! Parses die notation like "d20", "+d4", "-d6" and advantage names like
//! "adv" or "disadvantage".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// A fair die with faces numbered `1..=sides`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Die {
    sides: u32,
}

impl Die {
    /// The dice a tabletop check normally offers
    pub const STANDARD: [u32; 6] = [4, 6, 8, 10, 12, 20];

    pub const D4: Die = Die { sides: 4 };
    pub const D6: Die = Die { sides: 6 };
    pub const D8: Die = Die { sides: 8 };
    pub const D10: Die = Die { sides: 10 };
    pub const D12: Die = Die { sides: 12 };
    pub const D20: Die = Die { sides: 20 };

    /// Largest side count a die may have; every face fits in an `i32` total
    pub const MAX_SIDES: u32 = i32::MAX as u32;

    /// Create a die, rejecting a zero or oversized side count
    pub fn new(sides: u32) -> Result<Self> {
        if sides == 0 || sides > Self::MAX_SIDES {
            return Err(EngineError::InvalidDie {
                sides: i64::from(sides),
            });
        }
        Ok(Self { sides })
    }

    /// Number of faces
    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// Whether this is one of [`Die::STANDARD`]
    pub fn is_standard(&self) -> bool {
        Self::STANDARD.contains(&self.sides)
    }
}

impl TryFrom<u32> for Die {
    type Error = EngineError;

    fn try_from(sides: u32) -> Result<Self> {
        Die::new(sides)
    }
}

impl From<Die> for u32 {
    fn from(die: Die) -> u32 {
        die.sides
    }
}

impl FromStr for Die {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        parse_die(s)
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides)
    }
}

/// Parse "d20", "1d20", "D20" or a bare "20"
pub fn parse_die(notation: &str) -> Result<Die> {
    let trimmed = notation.trim().to_lowercase();
    let invalid = |reason: &str| EngineError::InvalidNotation {
        input: notation.to_string(),
        reason: reason.to_string(),
    };

    let sides_str = match trimmed.find('d') {
        Some(d_pos) => {
            // A single die only: "d6" and "1d6" are fine, "2d6" is a pool
            let count_str = &trimmed[..d_pos];
            if !count_str.is_empty() && count_str != "1" {
                return Err(invalid("only a single die is allowed per entry"));
            }
            &trimmed[d_pos + 1..]
        }
        None => trimmed.as_str(),
    };

    if sides_str.is_empty() {
        return Err(invalid("missing side count"));
    }

    let sides: i64 = sides_str
        .parse()
        .map_err(|_| invalid(&format!("invalid side count: {}", sides_str)))?;

    if sides < 1 {
        return Err(EngineError::InvalidDie { sides });
    }
    let sides = u32::try_from(sides).map_err(|_| invalid("side count too large"))?;

    Die::new(sides)
}

/// How the main die is rolled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvantageMode {
    /// Roll twice, keep the higher
    Advantage,
    /// Roll once
    #[default]
    None,
    /// Roll twice, keep the lower
    Disadvantage,
}

impl AdvantageMode {
    pub fn all() -> &'static [AdvantageMode] {
        &[
            AdvantageMode::Advantage,
            AdvantageMode::None,
            AdvantageMode::Disadvantage,
        ]
    }
}

impl FromStr for AdvantageMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "advantage" | "adv" => Ok(AdvantageMode::Advantage),
            "none" | "normal" => Ok(AdvantageMode::None),
            "disadvantage" | "dis" => Ok(AdvantageMode::Disadvantage),
            _ => Err(EngineError::InvalidAdvantage(s.to_string())),
        }
    }
}

impl fmt::Display for AdvantageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdvantageMode::Advantage => "advantage",
            AdvantageMode::None => "none",
            AdvantageMode::Disadvantage => "disadvantage",
        };
        f.write_str(name)
    }
}

/// Whether an extra die is added to or subtracted from the total
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    #[default]
    Plus,
    Minus,
}

/// An extra die with the sign it enters the total with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SignedDie {
    pub die: Die,
    pub sign: Sign,
}

impl SignedDie {
    pub fn new(die: Die, sign: Sign) -> Self {
        Self { die, sign }
    }

    pub fn plus(die: Die) -> Self {
        Self::new(die, Sign::Plus)
    }

    pub fn minus(die: Die) -> Self {
        Self::new(die, Sign::Minus)
    }

    /// Smallest contribution to the total
    pub fn min_contribution(&self) -> i32 {
        match self.sign {
            Sign::Plus => 1,
            Sign::Minus => -(self.die.sides() as i32),
        }
    }

    /// Largest contribution to the total
    pub fn max_contribution(&self) -> i32 {
        match self.sign {
            Sign::Plus => self.die.sides() as i32,
            Sign::Minus => -1,
        }
    }
}

impl FromStr for SignedDie {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (sign, rest) = if let Some(rest) = trimmed.strip_prefix('-') {
            (Sign::Minus, rest)
        } else if let Some(rest) = trimmed.strip_prefix('+') {
            (Sign::Plus, rest)
        } else {
            (Sign::Plus, trimmed)
        };

        let die = parse_die(rest).map_err(|e| match e {
            EngineError::InvalidNotation { reason, .. } => EngineError::InvalidNotation {
                input: s.to_string(),
                reason,
            },
            other => other,
        })?;

        Ok(SignedDie { die, sign })
    }
}

impl TryFrom<String> for SignedDie {
    type Error = EngineError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<SignedDie> for String {
    fn from(extra: SignedDie) -> String {
        extra.to_string()
    }
}

impl fmt::Display for SignedDie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sign {
            Sign::Plus => write!(f, "+{}", self.die),
            Sign::Minus => write!(f, "-{}", self.die),
        }
    }
}
