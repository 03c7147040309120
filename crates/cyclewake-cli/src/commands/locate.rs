use chrono::NaiveTime;
use clap::Args;
use cyclewake_core::{analyze_fixed_target, generate_cycles, Config, DayAnchor};

use super::common::{clock_arg, hm, print_json, tier_label, NightArgs};

#[derive(Args)]
pub struct LocateArgs {
    /// Time to look up (HH:MM)
    #[arg(long, value_parser = clock_arg)]
    pub at: NaiveTime,
    #[command(flatten)]
    pub night: NightArgs,
    /// Emit JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: LocateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let night = args.night.resolve(&config)?;

    let anchor = DayAnchor::new(night.date);
    let bedtime = anchor.bedtime(night.bedtime);
    let instant = anchor.after(bedtime, args.at);
    let cycles = generate_cycles(bedtime, night.cycle_length, night.cycle_count)?;
    let analysis = analyze_fixed_target(instant, &cycles);

    if args.json {
        return print_json(&analysis);
    }

    match analysis {
        Some(a) => {
            println!(
                "{} is in cycle {}, {} min in: {} ({})",
                hm(instant),
                a.matched.cycle,
                a.minutes_into_cycle,
                a.matched.region.label(),
                tier_label(a.matched.tier)
            );
            println!("  {}", a.matched.reason);
            if let Some(next) = a.next_best_wake {
                println!("  next REM wake-up at {}", hm(next));
            }
        }
        None => println!("{} is not within any cycle", hm(instant)),
    }
    Ok(())
}
