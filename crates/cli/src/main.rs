//! MC146818 RTC simulator CLI.
//!
//! This binary drives one simulated RTC through a deterministic event loop. It performs:
//! 1. **Run:** Load a JSON device config, program interrupts, inject host stalls and suspends,
//!    and report the device statistics as text or JSON.
//! 2. **Rates:** Print the periodic interrupt rate table.
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (e.g. `RUST_LOG=rtcsim_core=debug`).

use std::process;
use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rtcsim_core::common::constants::RTC_CLOCK_HZ;
use rtcsim_core::config::RtcConfig;
use rtcsim_core::sim::Simulator;
use rtcsim_core::soc::devices::cmos_rtc::codec::to_bcd;
use rtcsim_core::soc::devices::cmos_rtc::periodic::ticks_to_ns;
use rtcsim_core::soc::devices::cmos_rtc::regs::{ALARM_WILDCARD_MIN, PERIODIC_RATE_TICKS};

#[derive(Parser, Debug)]
#[command(
    name = "rtcsim",
    author,
    version,
    about = "MC146818 CMOS RTC simulator",
    long_about = "Drive a simulated MC146818 RTC on a deterministic host clock.\n\nExamples:\n  rtcsim run --seconds 5 --rate 6\n  rtcsim run --config rtc.json --rate 3 --stall 1000:5000 --json\n  rtcsim run --update --alarm '*:*:30' --seconds 120\n  rtcsim rates"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the event loop and print statistics.
    Run {
        /// JSON device configuration (defaults when omitted).
        #[arg(short, long)]
        config: Option<String>,

        /// Simulated host seconds to run.
        #[arg(short, long, default_value_t = 10)]
        seconds: u64,

        /// Periodic rate-select code (1-15) to program with PIE.
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=15))]
        rate: Option<u8>,

        /// Enable the update-ended interrupt.
        #[arg(short, long)]
        update: bool,

        /// Alarm as HH:MM:SS; `*` makes a field match anything.
        #[arg(long)]
        alarm: Option<AlarmArg>,

        /// Host stall as AT_MS:DURATION_MS (repeatable).
        #[arg(long)]
        stall: Vec<HostEvent>,

        /// Host suspend as AT_MS:DURATION_MS (repeatable).
        #[arg(long)]
        suspend: Vec<HostEvent>,

        /// Do not acknowledge interrupts (leave register C unread).
        #[arg(long)]
        no_ack: bool,

        /// Emit the report as JSON.
        #[arg(long)]
        json: bool,

        /// Statistics sections to print (periodic, update, irq, host); all when omitted.
        #[arg(long, value_delimiter = ',')]
        stats: Vec<String>,
    },

    /// Print the periodic interrupt rate table.
    Rates,
}

/// Raw alarm register values.
#[derive(Debug, Clone, Copy)]
struct AlarmArg {
    hours: u8,
    minutes: u8,
    seconds: u8,
}

impl FromStr for AlarmArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(':').collect();
        let [h, m, sec] = fields.as_slice() else {
            return Err(format!("expected HH:MM:SS, got `{s}`"));
        };
        let field = |text: &str, max: u8| -> Result<u8, String> {
            if text == "*" {
                return Ok(ALARM_WILDCARD_MIN);
            }
            let v: u8 = text.parse().map_err(|e| format!("`{text}`: {e}"))?;
            if v > max {
                return Err(format!("`{text}` exceeds {max}"));
            }
            Ok(to_bcd(v))
        };
        Ok(Self {
            hours: field(*h, 23)?,
            minutes: field(*m, 59)?,
            seconds: field(*sec, 59)?,
        })
    }
}

/// Host event at a point of the run.
#[derive(Debug, Clone, Copy)]
struct HostEvent {
    at: Duration,
    duration: Duration,
}

impl FromStr for HostEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (at, duration) = s
            .split_once(':')
            .ok_or_else(|| format!("expected AT_MS:DURATION_MS, got `{s}`"))?;
        let ms = |text: &str| -> Result<Duration, String> {
            text.parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| format!("`{text}`: {e}"))
        };
        Ok(Self {
            at: ms(at)?,
            duration: ms(duration)?,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum EventKind {
    Stall,
    Suspend,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            seconds,
            rate,
            update,
            alarm,
            stall,
            suspend,
            no_ack,
            json,
            stats,
        } => {
            let config = match config {
                Some(path) => RtcConfig::from_file(&path).unwrap_or_else(|e| {
                    eprintln!("\n[!] FATAL: {e}");
                    if let Some(source) = std::error::Error::source(&e) {
                        eprintln!("    caused by: {source}");
                    }
                    process::exit(1);
                }),
                None => RtcConfig::default(),
            };
            let mut events: Vec<(HostEvent, EventKind)> = stall
                .into_iter()
                .map(|e| (e, EventKind::Stall))
                .chain(suspend.into_iter().map(|e| (e, EventKind::Suspend)))
                .collect();
            events.sort_by_key(|(e, _)| e.at);
            cmd_run(
                config,
                Duration::from_secs(seconds),
                rate,
                update,
                alarm,
                &events,
                !no_ack,
                json,
                &stats,
            );
        }
        Commands::Rates => cmd_rates(),
    }
}

/// Builds the simulator, programs the requested interrupts, and runs it around the host events.
#[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
fn cmd_run(
    config: RtcConfig,
    total: Duration,
    rate: Option<u8>,
    update: bool,
    alarm: Option<AlarmArg>,
    events: &[(HostEvent, EventKind)],
    ack: bool,
    json: bool,
    sections: &[String],
) {
    let mut sim = Simulator::new(config).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: {e}");
        process::exit(1);
    });
    sim.set_auto_ack(ack);
    if let Some(rate) = rate {
        sim.enable_periodic(rate);
    }
    if update {
        sim.enable_update();
    }
    if let Some(alarm) = alarm {
        sim.enable_alarm(alarm.hours, alarm.minutes, alarm.seconds);
    }

    let mut elapsed = Duration::ZERO;
    for (event, kind) in events {
        if event.at > total {
            break;
        }
        sim.run_for(event.at.saturating_sub(elapsed));
        elapsed = event.at;
        info!(?kind, at = ?event.at, duration = ?event.duration, "host event");
        match kind {
            EventKind::Stall => {
                sim.stall(event.duration);
                elapsed += event.duration;
            }
            EventKind::Suspend => sim.suspend(event.duration),
        }
    }
    sim.run_for(total.saturating_sub(elapsed));

    let report = sim.report();
    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("\n[!] FATAL: could not encode report: {e}");
                process::exit(1);
            }
        }
    } else {
        println!("guest time               {}", report.guest_time);
        println!("host seconds             {:.3}", report.host_ns as f64 / 1e9);
        println!(
            "isr acks                 {} (pf {}, uf {}, af {})",
            report.isr.acks, report.isr.periodic, report.isr.update, report.isr.alarm
        );
        report.rtc.print_sections(sections);
    }
}

/// Prints every rate-select code with its period and frequency.
fn cmd_rates() {
    println!("code  ticks   period          frequency");
    for (code, &ticks) in PERIODIC_RATE_TICKS.iter().enumerate() {
        if ticks == 0 {
            println!("{code:>4}  {:>5}   {:<15} disabled", "-", "-");
            continue;
        }
        let period_us = ticks_to_ns(u128::from(ticks)) as f64 / 1000.0;
        let hz = RTC_CLOCK_HZ as f64 / f64::from(ticks);
        println!("{code:>4}  {ticks:>5}   {period_us:>10.3} us   {hz:>10.3} Hz");
    }
}
