use std::error::Error;
use std::process::ExitCode;

use log::{error, info};

use sail_guidance::config::{self, Config};
use sail_guidance::gnc::{Controller, LineFollowController};
use sail_guidance::io::{self, RunSummary};
use sail_guidance::sim::{self, SimOutput};

const USAGE: &str = "usage: sail-guidance [CONFIG.toml] [--csv FILE] [--json FILE]";

struct Args {
    config: Option<String>,
    csv: Option<String>,
    json: Option<String>,
}

fn main() -> ExitCode {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                error!("    caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = parse_args(std::env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path);
            config::load(path)?
        }
        None => {
            info!("No configuration given, running the reference scenario");
            Config::default()
        }
    };

    // -----------------------------------------------------------------------
    // Run closed loop
    // -----------------------------------------------------------------------
    let leg = config.leg()?;
    let mut controller = LineFollowController::new(config.params()?, config.initial_tack());
    let mut wind = config.wind();
    let output = sim::simulate_with(
        config.initial_state(),
        &leg,
        &mut wind,
        &config.sim,
        &mut controller,
    )?;
    let summary = RunSummary::from_output(controller.name(), &output);

    print_report(&config, &output, &summary);

    if let Some(path) = &args.csv {
        io::write_trajectory_file(path, &output.samples)?;
        info!("Trajectory written to {}", path);
    }
    if let Some(path) = &args.json {
        io::write_summary_file(path, &summary)?;
        info!("Summary written to {}", path);
    }

    Ok(())
}

fn parse_args<I: Iterator<Item = String>>(mut it: I) -> Result<Args, String> {
    let mut args = Args { config: None, csv: None, json: None };
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--csv" => args.csv = Some(it.next().ok_or(USAGE)?),
            "--json" => args.json = Some(it.next().ok_or(USAGE)?),
            "-h" | "--help" => return Err(USAGE.to_string()),
            other if other.starts_with('-') => {
                return Err(format!("unknown option {}\n{}", other, USAGE))
            }
            other if args.config.is_none() => args.config = Some(other.to_string()),
            _ => return Err(USAGE.to_string()),
        }
    }
    Ok(args)
}

fn print_report(config: &Config, output: &SimOutput, summary: &RunSummary) {
    let c = &config.controller;

    println!();
    println!("====================================================================");
    println!("  SAILBOAT LINE FOLLOWING — {}", summary.controller);
    println!("====================================================================");
    println!();
    println!("  Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Cutoff r:      {:>8.1}       Incidence:    {:>8.1} deg",
        c.cutoff_distance, c.incidence_angle_deg
    );
    println!(
        "  Close-hauled:  {:>8.1} deg   Initial tack: {:>9}",
        c.close_hauled_angle_deg, config.initial_tack()
    );
    println!(
        "  Leg:           ({:.1}, {:.1}) -> ({:.1}, {:.1})",
        config.leg.start[0], config.leg.start[1], config.leg.end[0], config.leg.end[1]
    );
    println!();

    println!("  Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    for ev in &output.events {
        println!("  step {:>5}   t={:>7.1}   {:?}", ev.step, ev.time, ev.kind);
    }
    if output.events.is_empty() {
        println!("  (none)");
    }
    println!();

    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>5}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}  {:>9}",
        "step", "x", "y", "e", "hdg", "rudder", "tack"
    );
    println!("  {}", "─".repeat(64));

    let sample_interval = (output.samples.len() / 25).max(1);
    for (i, s) in output.samples.iter().enumerate() {
        if i % sample_interval != 0 && i != output.samples.len() - 1 {
            continue;
        }
        println!(
            "  {:>5}  {:>8.1}  {:>8.1}  {:>8.1}  {:>8.1}  {:>8.2}  {:>9}",
            s.step,
            s.state.pos.x,
            s.state.pos.y,
            s.cross_track,
            sail_guidance::geometry::wrap_pi(s.state.heading).to_degrees(),
            s.command.rudder.to_degrees(),
            s.tack.map_or("-".to_string(), |t| t.to_string()),
        );
    }
    println!();

    println!("  Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Ticks:          {:>8}       Arrived:      {:>8}", summary.ticks, summary.arrived);
    println!(
        "  Tack switches:  {:>8}       Close-hauled: {:>8} ticks",
        summary.tack_switches, summary.close_hauled_ticks
    );
    println!(
        "  Max |e|:        {:>8.1}       Final e:      {:>8.1}",
        summary.max_abs_cross_track, summary.final_cross_track
    );
    println!("====================================================================");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_config_and_outputs() {
        let a = args(&["run.toml", "--csv", "out.csv", "--json", "out.json"]).unwrap();
        assert_eq!(a.config.as_deref(), Some("run.toml"));
        assert_eq!(a.csv.as_deref(), Some("out.csv"));
        assert_eq!(a.json.as_deref(), Some("out.json"));
    }

    #[test]
    fn rejects_unknown_and_dangling_options() {
        assert!(args(&["--fast"]).is_err());
        assert!(args(&["--csv"]).is_err());
        assert!(args(&["a.toml", "b.toml"]).is_err());
    }
}
