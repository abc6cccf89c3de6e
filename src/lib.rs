//! dicestat - odds for tabletop dice checks
//!
//! Exact outcome distributions for a main die with advantage or
//! disadvantage, signed extra dice and a flat modifier, plus the chance of
//! meeting a difficulty class.

pub mod engine;
pub mod error;
pub mod report;
pub mod settings;

pub use engine::{
    build_distribution, cumulative_success, sample, success_probability, AdvantageMode, Die, Pmf,
    Roll, RollConfiguration, SampleMode, Sign, SignedDie,
};
pub use error::EngineError;
pub use report::{Report, RollReport};
pub use settings::Settings;
