//! Chart and roll reports
//!
//! Turns engine output into something a person reads: a probability table
//! with bars, the cumulative success curve, and the success chance at the
//! chosen difficulty class.

use std::fmt::Write;

use serde::Serialize;

use crate::engine::{
    build_distribution, cumulative_success, success_probability, Pmf, Roll, RollConfiguration,
};
use crate::error::Result;

/// Width of the longest probability bar
const BAR_WIDTH: usize = 40;

/// Default difficulty class: the middle of the achievable range
pub fn default_dc(pmf: &Pmf) -> i32 {
    pmf.min() + (pmf.len() / 2) as i32
}

/// Express a probability as a percentage rounded to two decimals
pub fn percent(probability: f64) -> f64 {
    (probability * 10_000.0).round() / 100.0
}

/// One total in the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub total: i32,
    /// Chance of rolling exactly this total
    pub probability: f64,
    /// Chance of meeting or beating this total
    pub success: f64,
}

/// Distribution, success curve and the odds at one DC
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub config: RollConfiguration,
    pub notation: String,
    pub min: i32,
    pub max: i32,
    pub mean: f64,
    pub dc: i32,
    pub success_probability: f64,
    /// Success probability as a percentage, two decimals
    pub success_percent: f64,
    pub rows: Vec<ChartRow>,
}

impl Report {
    /// Evaluate `config` against `dc` (or the default DC)
    pub fn build(config: &RollConfiguration, dc: Option<i32>) -> Result<Self> {
        let pmf = build_distribution(config)?;
        let dc = dc.unwrap_or_else(|| default_dc(&pmf));
        let success = success_probability(&pmf, dc);

        let rows = pmf
            .iter()
            .zip(cumulative_success(&pmf))
            .map(|((total, probability), (_, success))| ChartRow {
                total,
                probability,
                success,
            })
            .collect();

        Ok(Self {
            config: config.clone(),
            notation: config.to_string(),
            min: pmf.min(),
            max: pmf.max(),
            mean: pmf.mean(),
            dc,
            success_probability: success,
            success_percent: percent(success),
            rows,
        })
    }

    /// Text chart, one line per total
    pub fn render(&self) -> String {
        let peak = self
            .rows
            .iter()
            .map(|row| row.probability)
            .fold(0.0_f64, f64::max);
        let width = self
            .min
            .to_string()
            .len()
            .max(self.max.to_string().len());

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}  range {}..={}  mean {:.2}",
            self.notation, self.min, self.max, self.mean
        );
        let _ = writeln!(out, "{:>width$}  {:>7}  {:>7}", "DC", "roll %", "succ %");

        for row in &self.rows {
            let bar_len = if peak > 0.0 {
                ((row.probability / peak) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            let marker = if row.total == self.dc { " <" } else { "" };
            let _ = writeln!(
                out,
                "{:>width$}  {:>7.2}  {:>7.2}  {}{}",
                row.total,
                percent(row.probability),
                percent(row.success),
                "#".repeat(bar_len),
                marker
            );
        }

        let _ = writeln!(
            out,
            "success at DC {}: {:.2}%",
            self.dc, self.success_percent
        );
        out
    }
}

/// A concrete roll judged against a DC
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollReport {
    pub notation: String,
    pub dc: i32,
    pub roll: Roll,
    pub success: bool,
}

impl RollReport {
    pub fn new(config: &RollConfiguration, dc: i32, roll: Roll) -> Self {
        Self {
            notation: config.to_string(),
            dc,
            success: roll.succeeds(dc),
            roll,
        }
    }

    pub fn outcome(&self) -> &'static str {
        if self.success {
            "Success"
        } else {
            "Failure"
        }
    }

    pub fn render(&self) -> String {
        let mut parts = vec![format!("{:?} -> {}", self.roll.main_rolls, self.roll.main)];
        parts.extend(self.roll.extras.iter().map(|v| format!("{:+}", v)));
        if self.roll.modifier != 0 {
            parts.push(format!("{:+}", self.roll.modifier));
        }
        format!(
            "{}: {} = {} vs DC {}: {}",
            self.notation,
            parts.join(" "),
            self.roll.total,
            self.dc,
            self.outcome()
        )
    }
}
