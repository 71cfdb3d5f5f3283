//! stretch-io - command line front end for the Stretch lifecycle shim
//!
//! Usage:
//!   stretch-io calibrate
//!   stretch-io --config stretch.toml status
//!   stretch-io teleoperate --fps 30 --duration-s 60 --record
//!
//! Without `--config` the built-in defaults are used (mock body, three
//! synthetic cameras).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use stretch_io::{create_robot, with_session, AppConfig, Error, Result, RobotDevice, StretchRobot};

#[derive(Parser, Debug)]
#[command(name = "stretch-io", version, about = "Stretch data-collection shim")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Connect, home if needed, disconnect
    Calibrate,
    /// Print the vendor status as JSON
    Status,
    /// Run the gamepad teleop loop
    Teleoperate {
        /// Loop rate (defaults to `[teleop] fps`)
        #[arg(long)]
        fps: Option<u32>,
        /// Stop after this many seconds (runs until Ctrl-C when absent)
        #[arg(long)]
        duration_s: Option<f64>,
        /// Capture observations and actions on every step
        #[arg(long)]
        record: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path),
        None => Ok(AppConfig::default()),
    }
}

fn teleoperate(
    robot: &mut StretchRobot,
    fps: u32,
    duration_s: Option<f64>,
    record: bool,
    running: &AtomicBool,
) -> Result<()> {
    if fps == 0 {
        return Err(Error::InvalidParameter("fps must be > 0".to_string()));
    }
    robot.run_calibration()?;

    let period = Duration::from_secs_f64(1.0 / fps as f64);
    let start = Instant::now();
    let mut steps = 0u64;
    let mut overruns = 0u64;

    log::info!(
        "Teleoperating at {} Hz{}",
        fps,
        if record { " (recording)" } else { "" }
    );

    while running.load(Ordering::Relaxed) {
        if let Some(limit) = duration_s {
            if start.elapsed().as_secs_f64() >= limit {
                break;
            }
        }

        let step_start = Instant::now();
        if let Some((observation, action)) = robot.teleop_step(record)? {
            for (key, tensor) in observation.iter() {
                log::debug!("step {}: {} {:?}", steps, key, tensor.shape());
            }
            if let Some(action) = action.action() {
                log::debug!("step {}: action {:?}", steps, action.shape());
            }
        }
        steps += 1;

        let elapsed = step_start.elapsed();
        if elapsed < period {
            thread::sleep(period - elapsed);
        } else {
            overruns += 1;
        }
    }

    let wall = start.elapsed().as_secs_f64();
    log::info!(
        "Teleop finished: {} steps in {:.1}s ({:.1} Hz, {} overruns)",
        steps,
        wall,
        if wall > 0.0 { steps as f64 / wall } else { 0.0 },
        overruns
    );
    if record {
        robot.print_logs();
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.logging.level))
        .init();

    log::info!("stretch-io v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &cli.config {
        log::info!("Using config: {}", path.display());
    }

    let mut robot = create_robot(&config)?;
    log::info!(
        "Robot: {} (cameras: {})",
        robot.robot_type(),
        robot.camera_names().collect::<Vec<_>>().join(", ")
    );

    match cli.command {
        Commands::Calibrate => with_session(&mut robot, |robot| robot.run_calibration()),
        Commands::Status => with_session(&mut robot, |robot| {
            let status = robot.read_status()?;
            println!("{}", serde_json::to_string_pretty(&status)?);
            Ok(())
        }),
        Commands::Teleoperate {
            fps,
            duration_s,
            record,
        } => {
            let running = Arc::new(AtomicBool::new(true));
            let r = Arc::clone(&running);
            ctrlc::set_handler(move || {
                log::info!("Received shutdown signal");
                r.store(false, Ordering::Relaxed);
            })
            .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

            let fps = fps.unwrap_or(config.teleop.fps);
            with_session(&mut robot, |robot| {
                teleoperate(robot, fps, duration_s, record, &running)
            })
        }
    }
}
