//! Distribution engine
//!
//! Exact outcome distributions for tabletop checks:
//! - Dice and notation ("d20", "+d4", "-d6")
//! - Advantage/disadvantage on the main die
//! - Signed extra dice combined by convolution
//! - Cumulative success against a difficulty class
//! - Concrete rolls from an injected random source

mod config;
mod die;
mod pmf;
mod sample;

pub use config::{build_distribution, RollConfiguration};
pub use die::{parse_die, AdvantageMode, Die, Sign, SignedDie};
pub use pmf::{
    base_distribution, base_distribution_for_sides, combine, cumulative_success,
    success_probability, Pmf, MASS_TOLERANCE,
};
pub use sample::{sample, Roll, SampleMode};
