//! Layered settings
//!
//! Defaults, then an optional TOML file, then `DICESTAT_*` environment
//! variables. The settings also carry the limits the presentation layer
//! enforces before handing a configuration to the engine.

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::engine::{AdvantageMode, Die, RollConfiguration, SampleMode, SignedDie};
use crate::error::{EngineError, Result};

/// File picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "dicestat.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "DICESTAT_";

/// Maximum number of extra dice offered by default
pub const DEFAULT_MAX_EXTRAS: usize = 5;

/// Presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub main_die: Die,
    pub advantage: AdvantageMode,
    pub modifier: i32,
    pub extras: Vec<SignedDie>,
    /// Difficulty class; the middle of the range when unset
    pub dc: Option<i32>,
    pub sample_mode: SampleMode,
    pub max_extras: usize,
    /// Accept dice outside d4/d6/d8/d10/d12/d20
    pub allow_nonstandard_dice: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            main_die: Die::D20,
            advantage: AdvantageMode::None,
            modifier: 0,
            extras: Vec::new(),
            dc: None,
            sample_mode: SampleMode::Corrected,
            max_extras: DEFAULT_MAX_EXTRAS,
            allow_nonstandard_dice: false,
        }
    }
}

impl Settings {
    /// Figment with every provider layered in order
    pub fn figment(file: Option<&Path>) -> Figment {
        let file = file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load settings, reading `file` (or `dicestat.toml`) if it exists
    pub fn load(file: Option<&Path>) -> std::result::Result<Self, figment::Error> {
        Self::figment(file).extract()
    }

    /// Check presentation limits and build the engine configuration
    pub fn roll_configuration(&self) -> Result<RollConfiguration> {
        if self.extras.len() > self.max_extras {
            return Err(EngineError::TooManyExtras {
                count: self.extras.len(),
                max: self.max_extras,
            });
        }

        if !self.allow_nonstandard_dice {
            let dice = std::iter::once(self.main_die).chain(self.extras.iter().map(|e| e.die));
            for die in dice {
                if !die.is_standard() {
                    return Err(EngineError::NonStandardDie { sides: die.sides() });
                }
            }
        }

        Ok(RollConfiguration::new(self.main_die)
            .with_advantage(self.advantage)
            .with_extras(self.extras.iter().copied())
            .with_modifier(self.modifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let settings = Settings::load(None)?;
            assert_eq!(settings, Settings::default());
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "dicestat.toml",
                r#"
                main_die = 12
                advantage = "disadvantage"
                modifier = 4
                extras = ["+d4", "-d6"]
                dc = 10
                "#,
            )?;
            jail.set_env("DICESTAT_MODIFIER", "-1");
            jail.set_env("DICESTAT_SAMPLE_MODE", "faithful");

            let settings = Settings::load(None)?;
            assert_eq!(settings.main_die, Die::D12);
            assert_eq!(settings.advantage, AdvantageMode::Disadvantage);
            assert_eq!(settings.modifier, -1);
            assert_eq!(
                settings.extras,
                vec![SignedDie::plus(Die::D4), SignedDie::minus(Die::D6)]
            );
            assert_eq!(settings.dc, Some(10));
            assert_eq!(settings.sample_mode, SampleMode::Faithful);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_path() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "main_die = 8\nallow_nonstandard_dice = true")?;
            let settings = Settings::load(Some(Path::new("custom.toml")))?;
            assert_eq!(settings.main_die, Die::D8);
            assert!(settings.allow_nonstandard_dice);
            Ok(())
        });
    }

    #[test]
    fn test_bad_die_in_file() {
        Jail::expect_with(|jail| {
            jail.create_file("dicestat.toml", "main_die = 0")?;
            assert!(Settings::load(None).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_too_many_extras() {
        let settings = Settings {
            extras: vec![SignedDie::plus(Die::D4); 6],
            ..Settings::default()
        };
        assert_eq!(
            settings.roll_configuration(),
            Err(EngineError::TooManyExtras { count: 6, max: 5 })
        );
    }

    #[test]
    fn test_nonstandard_die() {
        let settings = Settings {
            extras: vec![SignedDie::minus(Die::new(3).unwrap())],
            ..Settings::default()
        };
        assert_eq!(
            settings.roll_configuration(),
            Err(EngineError::NonStandardDie { sides: 3 })
        );

        let settings = Settings {
            allow_nonstandard_dice: true,
            ..settings
        };
        assert!(settings.roll_configuration().is_ok());
    }

    #[test]
    fn test_roll_configuration() {
        let settings = Settings {
            advantage: AdvantageMode::Advantage,
            modifier: 3,
            extras: vec![SignedDie::plus(Die::D4)],
            ..Settings::default()
        };
        let config = settings.roll_configuration().unwrap();
        assert_eq!(config.main_die, Die::D20);
        assert_eq!(config.advantage, AdvantageMode::Advantage);
        assert_eq!(config.extras, vec![SignedDie::plus(Die::D4)]);
        assert_eq!(config.modifier, 3);
    }
}
