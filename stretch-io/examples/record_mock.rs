//! Record a short mock teleop episode and summarise the tensors
//!
//! ```sh
//! RUST_LOG=info cargo run --example record_mock -- --steps 60
//! ```

use clap::Parser;
use stretch_io::config::AppConfig;
use stretch_io::{create_robot, with_session, RobotDevice};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of recorded steps
    #[arg(short, long, default_value_t = 30)]
    steps: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut robot = create_robot(&AppConfig::default())?;
    for (key, feature) in robot.features() {
        log::info!("{}: {:?} {:?}", key, feature.dtype, feature.shape);
    }

    let mut lift = Vec::with_capacity(args.steps);
    with_session(&mut robot, |robot| {
        robot.run_calibration()?;
        for _ in 0..args.steps {
            if let Some((obs, _action)) = robot.teleop_step(true)? {
                if let Some(state) = obs.state().and_then(|t| t.as_f32()) {
                    lift.push(state[2]);
                }
            }
        }
        robot.print_logs();
        Ok(())
    })?;

    if let (Some(first), Some(last)) = (lift.first(), lift.last()) {
        log::info!(
            "Recorded {} steps, lift {:.3} -> {:.3} m",
            lift.len(),
            first,
            last
        );
    }
    Ok(())
}
