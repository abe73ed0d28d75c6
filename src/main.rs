//! Accelerometer reader - live console readout
//!
//! Subscribes to the accelerometer stream and continuously displays the
//! current x/y/z reading with bar graphs. The sampling preset is selectable
//! on the command line; Ctrl+C tears the subscription down cleanly.
//!
//! Usage:
//!   accel-reader --interval fast --duration 30

use clap::Parser;
use motion_viewfinder::{
    create_bar, AccelSample, Accelerometer, SamplingInterval, SimulatedMotion,
    SubscriptionController, TimeKeeper,
};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "accel-reader")]
#[command(about = "Live accelerometer console readout", long_about = None)]
struct Args {
    /// Sampling preset: "slow" (1000 ms) or "fast" (16 ms)
    #[arg(short, long, default_value = "fast")]
    interval: String,

    /// Duration in seconds (optional, runs until Ctrl+C if omitted)
    #[arg(short, long)]
    duration: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let preset: SamplingInterval = match args.interval.parse() {
        Ok(preset) => preset,
        Err(_) => {
            eprintln!("Error: interval must be 'slow' or 'fast'");
            std::process::exit(1);
        }
    };

    println!("Accelerometer Reader");
    println!("====================");
    println!("Preset: {} ({} ms)", preset, preset.millis());
    println!(
        "Started: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    if let Some(duration) = args.duration {
        println!("Duration: {} seconds", duration);
    } else {
        println!("Duration: continuous (Ctrl+C to stop)");
    }
    println!();

    // Setup Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    // Subscribe; active from here until the controller is dropped.
    let stream = Accelerometer::new(SimulatedMotion::new());
    let (controller, samples) = SubscriptionController::new(stream);
    controller.set_interval(preset);

    let timer = TimeKeeper::new();
    let end_time = args.duration.map(|d| d as f64);
    let mut sample_count = 0u64;
    let mut latest = AccelSample::default();

    // Clear screen once at start
    print!("\x1B[2J\x1B[H");
    io::stdout().flush()?;

    while running.load(Ordering::SeqCst) {
        if let Some(end) = end_time {
            if timer.elapsed_secs() >= end {
                break;
            }
        }

        // Wait briefly for the next sample so the loop also redraws the
        // header clock while the stream idles at the slow preset.
        match samples.recv_timeout(Duration::from_millis(50)) {
            Ok(sample) => {
                latest = sample;
                sample_count += 1;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        let elapsed = timer.elapsed_secs();
        let sample_rate = if elapsed > 0.0 {
            sample_count as f64 / elapsed
        } else {
            0.0
        };

        // Move cursor to top without clearing (reduces flicker)
        print!("\x1B[H");

        println!("Accelerometer Reader - Live Data                                ");
        println!("================================                                ");
        println!(
            "Time: {:.2}s | Samples: {} | Rate: {:.1} Hz                    ",
            elapsed, sample_count, sample_rate
        );
        println!();

        println!("ACCELEROMETER (g)                    -2g ◄─────────┼─────────► +2g");
        println!("  X: {:7.3}g  [{}]", latest.x, create_bar(latest.x, 2.0, 40));
        println!("  Y: {:7.3}g  [{}]", latest.y, create_bar(latest.y, 2.0, 40));
        println!("  Z: {:7.3}g  [{}]", latest.z, create_bar(latest.z, 2.0, 40));

        println!();
        println!("Press Ctrl+C to exit                                           ");

        io::stdout().flush()?;
    }

    // Explicit for the normal exit path; drop covers every other one.
    drop(controller);

    let elapsed = timer.elapsed_secs();
    println!("\nStopped after {:.2}s, {} samples", elapsed, sample_count);

    Ok(())
}
