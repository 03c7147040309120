use clap::Args;
use cyclewake_core::{classify_stages, CycleGenerator, Config, DayAnchor, QualityTier};

use super::common::{hm, print_json, tier_label, NightArgs};

#[derive(Args)]
pub struct CyclesArgs {
    #[command(flatten)]
    pub night: NightArgs,
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: CyclesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let night = args.night.resolve(&config)?;

    let bedtime = DayAnchor::new(night.date).bedtime(night.bedtime);
    let cycles = CycleGenerator::new(night.cycle_length)?
        .with_count(night.cycle_count)?
        .generate(bedtime);
    let windows = classify_stages(&cycles);

    if args.json {
        return print_json(&serde_json::json!({
            "bedtime": bedtime,
            "cycles": cycles,
            "windows": windows,
        }));
    }

    println!("Bedtime {}  ({} min cycles)", hm(bedtime), night.cycle_length);
    for cycle in &cycles {
        println!();
        println!("Cycle {}  {} - {}", cycle.index(), hm(cycle.start()), hm(cycle.end()));
        for stage in cycle.stages() {
            let tier = QualityTier::for_stage(stage.kind);
            println!(
                "  {} - {}  {:<5} {}",
                hm(stage.interval.start()),
                hm(stage.interval.end()),
                tier_label(tier),
                stage.kind.label()
            );
        }
    }
    println!();
    println!(
        "{} best, {} okay, {} to avoid",
        windows.best.len(),
        windows.okay.len(),
        windows.worst.len()
    );
    Ok(())
}
