//! Define the trail recording command
use crate::config::Config;
use crate::controller::LifecycleController;
use crate::Error;
use log::{info, warn};
use std::time::{Duration, Instant};
use structopt::StructOpt;

/// Record a trail until a sample count or time limit is reached
#[derive(Debug, StructOpt)]
pub struct RecordOpts {
    /// Stop the session once this many samples have been recorded
    #[structopt(short = "n", long)]
    samples: Option<usize>,
    /// Stop the session after this many seconds
    #[structopt(short, long)]
    duration: Option<f64>,
    /// Clear the recorded trail once the session has ended
    #[structopt(long)]
    reset: bool,
}

/// Implementation of the `record` subcommand
pub fn record_command(config: Config, opts: RecordOpts) -> Result<(), Box<dyn std::error::Error>> {
    if opts.samples.is_none() && opts.duration.is_none() {
        return Err(Box::new(Error::Other(
            "provide --samples and/or --duration to bound the recording session".to_string(),
        )));
    }

    let mut controller = LifecycleController::from_config(&config)?;
    controller.user_requests_start()?;
    let deadline = opts
        .duration
        .map(|secs| Instant::now() + Duration::from_secs_f64(secs));

    let mut total = 0;
    loop {
        total += controller.pump_samples(Duration::from_millis(250))?;
        if opts.samples.map_or(false, |limit| total >= limit) {
            info!("sample limit reached after {} recorded fixes", total);
            break;
        }
        if deadline.map_or(false, |d| Instant::now() >= d) {
            info!("time limit reached with {} recorded fixes", total);
            break;
        }
        if !controller.is_source_running() {
            warn!("location source stopped delivering before the session limit");
            break;
        }
    }

    controller.user_requests_stop()?;
    // drain fixes that raced the stop request, the tracker discards them
    controller.pump_samples(Duration::from_millis(0))?;
    info!(
        "session ended, tracker is {} with {} trail points",
        controller.recording_state()?,
        controller.snapshot()?.coordinates().len()
    );
    controller.render_snapshot()?;

    if opts.reset {
        controller.user_requests_reset()?;
    }
    Ok(())
}
