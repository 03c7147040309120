//! Argument parsing and formatting shared by the commands.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::Args;
use cyclewake_core::{parse_wall_clock, Config, QualityTier, ValidationError};
use serde::Serialize;

/// clap value parser for `HH:MM`.
pub fn clock_arg(input: &str) -> Result<NaiveTime, String> {
    parse_wall_clock(input).map_err(|e| e.to_string())
}

/// Flags that describe the night itself.
#[derive(Args, Debug, Clone)]
pub struct NightArgs {
    /// Bedtime (HH:MM); falls back to `defaults.bedtime`
    #[arg(short, long, value_parser = clock_arg)]
    pub bedtime: Option<NaiveTime>,
    /// Cycle length in minutes; falls back to `cycle.length_minutes`
    #[arg(long)]
    pub cycle_length: Option<i64>,
    /// Number of cycles; falls back to `cycle.count`
    #[arg(long)]
    pub cycles: Option<usize>,
    /// Day the night starts on (YYYY-MM-DD, default today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

/// Night flags merged with the configuration.
pub struct Night {
    pub date: NaiveDate,
    pub bedtime: NaiveTime,
    pub cycle_length: i64,
    pub cycle_count: usize,
}

impl NightArgs {
    pub fn resolve(&self, config: &Config) -> Result<Night, ValidationError> {
        let bedtime = match self.bedtime {
            Some(t) => t,
            None => config.defaults.bedtime()?.ok_or(ValidationError::MissingBedtime)?,
        };
        Ok(Night {
            date: self.date.unwrap_or_else(|| Local::now().date_naive()),
            bedtime,
            cycle_length: self.cycle_length.unwrap_or(config.cycle.length_minutes),
            cycle_count: self.cycles.unwrap_or(config.cycle.count),
        })
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn hm(instant: NaiveDateTime) -> String {
    instant.format("%H:%M").to_string()
}

pub fn tier_label(tier: QualityTier) -> &'static str {
    match tier {
        QualityTier::Best => "BEST",
        QualityTier::Okay => "okay",
        QualityTier::Bad => "bad",
    }
}

pub fn hours(value: f64) -> String {
    let total = (value * 60.0).round() as i64;
    format!("{}h{:02}", total / 60, total % 60)
}
