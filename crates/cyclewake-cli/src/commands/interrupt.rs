use chrono::{Local, NaiveDate, NaiveTime};
use clap::Args;
use cyclewake_core::interruption::InterruptionAdvisory;
use cyclewake_core::{analyze_interruption, Config, CycleGenerator, DayAnchor};

use super::common::{clock_arg, hm, print_json};

#[derive(Args)]
pub struct InterruptArgs {
    /// When the second sleep starts (HH:MM)
    #[arg(long, value_parser = clock_arg)]
    pub from: NaiveTime,
    /// Fixed time the sleep must end (HH:MM); rolls to the next day if earlier
    #[arg(long, value_parser = clock_arg)]
    pub until: NaiveTime,
    /// Cycle length in minutes; falls back to `cycle.length_minutes`
    #[arg(long)]
    pub cycle_length: Option<i64>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Emit JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: InterruptArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let cycle_length = CycleGenerator::new(args.cycle_length.unwrap_or(config.cycle.length_minutes))?
        .cycle_length_minutes();

    let anchor = DayAnchor::new(args.date.unwrap_or_else(|| Local::now().date_naive()));
    let onset = anchor.date().and_time(args.from);
    let next_event = anchor.after(onset, args.until);
    let result = analyze_interruption(onset, next_event, cycle_length);

    if args.json {
        return print_json(&result);
    }

    println!(
        "{} -> {}: {:.0} min available",
        hm(onset),
        hm(next_event),
        result.available_minutes
    );
    let verdict = match result.advisory() {
        InterruptionAdvisory::Critical => "too short for a cycle; stay awake instead",
        InterruptionAdvisory::Warning => "ends in deep sleep; expect heavy grogginess",
        InterruptionAdvisory::Caution => "ends in REM; some grogginess",
        InterruptionAdvisory::Fine => "ends in light sleep; fine",
    };
    println!("  severity {:?}: {verdict}", result.severity);
    if let (Some(progress), Some(fraction)) = (result.cycle_progress_minutes, result.fraction) {
        println!("  {progress:.0} min into a cycle ({:.0}%)", fraction * 100.0);
    }
    Ok(())
}
