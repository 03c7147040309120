use chrono::NaiveTime;
use clap::Args;
use cyclewake_core::intersection::{IntersectionStatus, RankedPairing};
use cyclewake_core::optimizer::OptimizationStatus;
use cyclewake_core::planner::IntersectionPlan;
use cyclewake_core::{plan, Config, PlanRequest, PrayerConstraint, SleepPlan, ValidationError};

use super::common::{clock_arg, hm, hours, print_json, tier_label, NightArgs};

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub night: NightArgs,
    /// Fixed prayer time (HH:MM)
    #[arg(long, value_parser = clock_arg, conflicts_with_all = ["prayer_start", "prayer_end"])]
    pub prayer_time: Option<NaiveTime>,
    /// Prayer window start (HH:MM)
    #[arg(long, value_parser = clock_arg, requires = "prayer_end")]
    pub prayer_start: Option<NaiveTime>,
    /// Prayer window end (HH:MM)
    #[arg(long, value_parser = clock_arg, requires = "prayer_start")]
    pub prayer_end: Option<NaiveTime>,
    /// Work wake-up time (HH:MM)
    #[arg(short, long, value_parser = clock_arg)]
    pub work: Option<NaiveTime>,
    /// Latest acceptable wake-up (HH:MM)
    #[arg(long, value_parser = clock_arg)]
    pub must_wake_by: Option<NaiveTime>,
    /// Pairings shown per tier; falls back to `ranking.per_tier_cap`
    #[arg(long)]
    pub cap: Option<usize>,
    /// Emit the whole plan as JSON
    #[arg(long)]
    pub json: bool,
}

impl PlanArgs {
    /// Flags first, then config presets; a fixed time wins over a window.
    fn prayer(&self, config: &Config) -> Result<PrayerConstraint, ValidationError> {
        if let Some(time) = self.prayer_time {
            return Ok(PrayerConstraint::Fixed(time));
        }
        if let (Some(start), Some(end)) = (self.prayer_start, self.prayer_end) {
            return Ok(PrayerConstraint::Window { start, end });
        }
        if let Some(time) = config.defaults.prayer_time()? {
            return Ok(PrayerConstraint::Fixed(time));
        }
        Ok(match config.defaults.prayer_window()? {
            Some((start, end)) => PrayerConstraint::Window { start, end },
            None => PrayerConstraint::None,
        })
    }

    fn request(&self, config: &Config) -> Result<PlanRequest, ValidationError> {
        let night = self.night.resolve(config)?;
        Ok(PlanRequest {
            date: night.date,
            bedtime: Some(night.bedtime),
            cycle_length_minutes: night.cycle_length,
            cycle_count: night.cycle_count,
            prayer: self.prayer(config)?,
            work_time: match self.work {
                Some(t) => Some(t),
                None => config.defaults.work_time()?,
            },
            must_wake_by: match self.must_wake_by {
                Some(t) => Some(t),
                None => config.defaults.must_wake_by()?,
            },
            per_tier_cap: self.cap.unwrap_or(config.ranking.per_tier_cap),
        })
    }
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let request = args.request(&config)?;
    tracing::debug!(?request, "resolved plan request");
    let night = plan(&request)?;

    if args.json {
        return print_json(&night);
    }

    render(&night);
    Ok(())
}

fn render(night: &SleepPlan) {
    let last = night.cycles.last().map(|c| c.end()).unwrap_or(night.bedtime);
    println!(
        "Bedtime {}  {} cycles of {} min, last ends {}",
        hm(night.bedtime),
        night.cycles.len(),
        night.cycle_length_minutes,
        hm(last)
    );

    if let Some(check) = night.reality_check {
        let marker = if check.is_critical() { "!!" } else { "!" };
        println!("{marker} {check}");
    }

    if let Some(fixed) = &night.fixed_prayer {
        println!();
        match &fixed.analysis {
            Some(a) => {
                println!(
                    "Prayer at {}: cycle {}, {} ({})",
                    hm(fixed.instant),
                    a.matched.cycle,
                    a.matched.region.label(),
                    tier_label(a.matched.tier)
                );
                if let Some(next) = a.next_best_wake {
                    println!("  next REM wake-up at {}", hm(next));
                }
            }
            None => println!("Prayer at {} is not within any cycle", hm(fixed.instant)),
        }
    }

    if let Some(inter) = &night.intersection {
        render_intersection(inter);
    }

    if let Some(opt) = &night.optimization {
        println!();
        let status = match opt.status {
            OptimizationStatus::NoOverlap => "no stage overlaps the prayer window",
            OptimizationStatus::NotViable { cycle_conflicts: true } => {
                "not viable: sleeping again ends in deep sleep"
            }
            OptimizationStatus::NotViable { cycle_conflicts: false } => "not viable",
            OptimizationStatus::Optimal => "optimal",
            OptimizationStatus::Good => "good",
            OptimizationStatus::Acceptable => "acceptable",
            OptimizationStatus::Problematic => "problematic",
            OptimizationStatus::AcceptableWithWarning => "acceptable with warning",
        };
        println!("Prayer window wake-ups: {status}");
        for rec in &opt.recommendations {
            println!(
                "  {} - {}  {:<5} cycle {}  {} sleep{}",
                hm(rec.wake_time),
                hm(rec.latest_wake_time),
                tier_label(rec.tier),
                rec.cycle,
                hours(rec.sleep_duration_hours),
                if rec.feasible { "" } else { "  (not feasible)" }
            );
        }
    }

    if let Some(deadline) = &night.deadline {
        println!();
        match &deadline.recommendation {
            Some(rec) => println!(
                "Wake by {}: {} - {} ({}, cycle {})",
                hm(deadline.must_wake_by),
                hm(rec.window.interval.start()),
                hm(rec.window.interval.end()),
                rec.window.stage.label(),
                rec.window.cycle
            ),
            None => println!("Wake by {}: no good window ends in time", hm(deadline.must_wake_by)),
        }
    }
}

fn render_ranked(title: &str, ranked: &[RankedPairing]) {
    if ranked.is_empty() {
        return;
    }
    println!("  {title}:");
    for r in ranked {
        let p = &r.pairing;
        println!(
            "    prayer {} - {} ({}, cycle {})  work {} ({}, cycle {})  {} sleep{}",
            hm(p.prayer_overlap.start()),
            hm(p.prayer_overlap.end()),
            p.prayer_stage.label(),
            p.prayer_cycle,
            hm(p.work_instant),
            p.work_region.label(),
            p.work_cycle,
            hours(p.sleep_duration_hours),
            if p.viable { "" } else { "  (too close to work)" }
        );
    }
}

fn render_intersection(inter: &IntersectionPlan) {
    let result = &inter.result;
    println!();
    let status = match result.analysis.status {
        IntersectionStatus::NoIntersections => "no intersections",
        IntersectionStatus::NoViable => "no viable pairing",
        IntersectionStatus::Optimal => "optimal",
        IntersectionStatus::Acceptable => "acceptable",
    };
    println!(
        "Prayer {} - {} with work at {}: {status} ({} options, {} viable)",
        hm(inter.prayer_window.start()),
        hm(inter.prayer_window.end()),
        hm(inter.work_time),
        result.analysis.total_options,
        result.analysis.viable_options
    );
    render_ranked("best", &inter.ranked.best);
    render_ranked("okay", &inter.ranked.okay);
    render_ranked("avoid", &inter.ranked.bad);

    for suggestion in &result.analysis.suggestions {
        println!("  - {suggestion}");
    }

    if let Some(alt) = &inter.alternatives {
        if !alt.coupled_pairs.is_empty() {
            println!("  Alternatives:");
        }
        for pair in &alt.coupled_pairs {
            println!(
                "    prayer {} - {} ({})  work {} - {} ({}){}  {}",
                hm(pair.prayer.window.start()),
                hm(pair.prayer.window.end()),
                pair.prayer.stage.label(),
                hm(pair.work.window.start()),
                hm(pair.work.window.end()),
                pair.work.stage.label(),
                if pair.work_misaligned { " shifted" } else { "" },
                tier_label(pair.tier)
            );
        }
    }
}
