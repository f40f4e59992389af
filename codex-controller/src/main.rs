//! Codex card sorter binary
//!
//! Usage:
//!   codex-sorter
//!   codex-sorter --config rig.toml --cycles 5
//!   codex-sorter --fast
//!   codex-sorter --smoke-test
//!
//! Drives the simulated rig: the stage dead-reckons the jogs it is sent, the
//! contact switch closes on the simulated card stack, and the operator
//! presses the button whenever asked.
//!
//! # Environment Variables
//!
//! - `CODEX_STAGE_URL` - Stage controller URL
//! - `CODEX_STAGE_API_KEY` - Stage controller API key
//! - `RUST_LOG` - Log filter (default: info)

use std::num::NonZeroU32;
use std::path::PathBuf;

use anyhow::{bail, Context};
use codex_controller::config::{load_config, RigConfig, ENV_STAGE_API_KEY, ENV_STAGE_URL};
use codex_controller::delay::StdDelay;
use codex_controller::sim::{
    default_deck, share, SimContactPin, SimHandle, SimStage, SimSuctionPin, SimVision, SimWorld,
};
use codex_controller::smoke::{smoke_test, SMOKE_HOLD_MS};
use codex_controller::{CycleOrchestrator, MotionDriver, Rig};
use codex_drivers::{GpioContactSensor, GpioSuction};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Cycles run when none are given
const DEFAULT_CYCLES: NonZeroU32 = match NonZeroU32::new(10) {
    Some(n) => n,
    None => panic!("default cycle count must be non-zero"),
};

/// Operator presses needed before the first cycle
const SETUP_PRESSES: usize = 3;

struct Args {
    config_path: Option<PathBuf>,
    cycles: NonZeroU32,
    fast: bool,
    smoke: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = match parse_args()? {
        Some(args) => args,
        None => return Ok(()),
    };

    let mut config = load_config(args.config_path.as_deref())?;
    if args.fast {
        config = config.without_waits();
    }
    tracing::info!(stage = %config.stage.url, "rig configuration loaded");

    let world = share(SimWorld::for_rig(&config.motion, default_deck()));

    if args.smoke {
        run_smoke_test(&config, &world, args.fast)?;
    } else {
        run_sorter(&config, &world, args.cycles)?;
    }

    Ok(())
}

fn run_sorter(config: &RigConfig, world: &SimHandle, cycles: NonZeroU32) -> anyhow::Result<()> {
    world.borrow_mut().press_button(SETUP_PRESSES);

    let pins = &config.pins;
    let rig = Rig {
        stage: SimStage::new(world.clone()),
        sensor: GpioContactSensor::new(
            SimContactPin::new(world.clone(), &pins.contact),
            pins.contact,
        ),
        suction: GpioSuction::new(
            SimSuctionPin::new(world.clone(), &pins.suction),
            StdDelay,
            pins.suction,
            config.timing.suction_spin_ms,
        ),
        vision: SimVision::new(world.clone()),
    };

    let mut orchestrator = CycleOrchestrator::new(rig, StdDelay, config);
    let summary = orchestrator.run(cycles).context("sorting run aborted")?;

    let world = world.borrow();
    tracing::info!(
        dropped = world.dropped.len(),
        left_in_stack = world.deck.len(),
        retries = summary.retries,
        "simulated run complete"
    );
    Ok(())
}

fn run_smoke_test(config: &RigConfig, world: &SimHandle, fast: bool) -> anyhow::Result<()> {
    let mut driver = MotionDriver::new(
        SimStage::new(world.clone()),
        StdDelay,
        config.motion.post_home,
        &config.timing,
    );
    let mut suction = GpioSuction::new(
        SimSuctionPin::new(world.clone(), &config.pins.suction),
        StdDelay,
        config.pins.suction,
        config.timing.suction_spin_ms,
    );

    let hold_ms = if fast { 0 } else { SMOKE_HOLD_MS };
    smoke_test(&mut driver, &mut suction, hold_ms).context("smoke test failed")?;
    Ok(())
}

/// Parse command line arguments; `None` means help was printed
fn parse_args() -> anyhow::Result<Option<Args>> {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        config_path: None,
        cycles: DEFAULT_CYCLES,
        fast: false,
        smoke: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                let Some(path) = args.get(i + 1) else {
                    bail!("{} needs a path", args[i]);
                };
                parsed.config_path = Some(PathBuf::from(path));
                i += 1;
            }
            "--cycles" | "-n" => {
                let Some(value) = args.get(i + 1) else {
                    bail!("{} needs a number", args[i]);
                };
                parsed.cycles = value
                    .parse()
                    .with_context(|| format!("invalid cycle count '{}'", value))?;
                i += 1;
            }
            "--fast" => parsed.fast = true,
            "--smoke-test" => parsed.smoke = true,
            "--help" | "-h" => {
                print_help();
                return Ok(None);
            }
            other => bail!("unknown argument '{}' (try --help)", other),
        }
        i += 1;
    }

    Ok(Some(parsed))
}

fn print_help() {
    println!("Codex card sorter");
    println!();
    println!("Usage: codex-sorter [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <FILE>   Rig configuration (default: embedded rig.toml)");
    println!("  -n, --cycles <N>      Sort cycles to run (default: {})", DEFAULT_CYCLES);
    println!("      --fast            Skip all settle and pause intervals");
    println!("      --smoke-test      Home, jog, pulse suction, then exit");
    println!("  -h, --help            Show this help message");
    println!();
    println!("Environment variables:");
    println!("  {:<22}Stage controller URL", ENV_STAGE_URL);
    println!("  {:<22}Stage controller API key", ENV_STAGE_API_KEY);
    println!("  RUST_LOG              Log filter (default: info)");
}
