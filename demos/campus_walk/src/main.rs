//! campus_walk — replays a walk across campus to the library.
//!
//! The walker starts at the hostel gate facing north, turns toward the
//! library while walking, and the session reports distance, turn arrow, and
//! ETA on every accepted reading until arrival.
//!
//! ```text
//! RUST_LOG=info cargo run -p campus_walk -- --jitter --trace-dir ./trace
//! ```

mod args;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use nav_core::{GeoPoint, NavConfig, NavigationState, TurnDirection};
use nav_output::{CsvTraceWriter, TraceObserver};
use nav_sensors::{ScriptedHeadingSource, ScriptedPositionSource, load_track_csv};
use nav_session::{SessionBuilder, SessionPhase};

use args::WalkArgs;

// ── Constants ─────────────────────────────────────────────────────────────────

const START:              (f64, f64) = (12.9230, 77.5010); // hostel gate
const LIBRARY:            (f64, f64) = (12.9240, 77.4995);
const JITTER_POSITION_M:  f64        = 4.0;
const JITTER_ACCURACY_M:  f64        = 6.0;
const JITTER_HEADING_DEG: f64        = 8.0;

// ── Output ────────────────────────────────────────────────────────────────────

fn arrow(direction: TurnDirection) -> &'static str {
    match direction {
        TurnDirection::Straight   => "^",
        TurnDirection::Right      => ">",
        TurnDirection::Left       => "<",
        TurnDirection::TurnAround => "v",
    }
}

fn print_state(state: &NavigationState) {
    if state.arrived {
        println!("  arrived ({:.1} m from the entrance)", state.distance_m);
        return;
    }
    let heading = if state.heading_available {
        format!("{} {:<11}", arrow(state.turn_direction), state.turn_direction.as_str())
    } else {
        "  no compass ".to_owned()
    };
    println!(
        "  {heading} {:>6.1} m  bearing {:>5.1}°  rel {:>5.1}°  ±{:>4.1} m  {}",
        state.distance_m,
        state.bearing_deg,
        state.relative_bearing_deg,
        state.gps_accuracy_m,
        state.eta_label,
    );
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();
    let args = WalkArgs::parse();

    let config = match &args.config {
        Some(path) => NavConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => NavConfig::default(),
    };

    let start = GeoPoint::new(START.0, START.1);
    let destination = config.destination(LIBRARY.0, LIBRARY.1, "Library", None);
    let interval = Duration::from_millis(args.interval_ms);

    // ── Sensors ───────────────────────────────────────────────────────────
    let mut gps = match &args.track {
        Some(path) => {
            let fixes = load_track_csv(path)
                .with_context(|| format!("loading track {}", path.display()))?;
            info!("replaying {} recorded fixes from {}", fixes.len(), path.display());
            ScriptedPositionSource::new(fixes)
        }
        None => ScriptedPositionSource::walk(start, destination.point, args.steps, args.accuracy),
    }
    .with_interval(interval);

    let mut compass = if args.no_compass {
        ScriptedHeadingSource::unsupported()
    } else {
        // Turn from north to face the library over the first few readings.
        ScriptedHeadingSource::sweep(0.0, start.bearing_deg(destination.point), args.steps.min(8))
            .with_interval(interval)
    };

    if args.jitter {
        gps = gps.with_jitter(args.seed, JITTER_POSITION_M, JITTER_ACCURACY_M);
        compass = compass.with_jitter(args.seed, JITTER_HEADING_DEG);
    }

    // ── Session ───────────────────────────────────────────────────────────
    let trace = match &args.trace_dir {
        Some(dir) => Some(TraceObserver::new(
            CsvTraceWriter::new(dir).with_context(|| format!("creating {}", dir.display()))?,
        )),
        None => None,
    };

    let frames = Arc::new(AtomicU64::new(0));
    let mut builder = SessionBuilder::new(gps, compass)
        .config(config)
        .on_state_change(print_state);
    if let Some(trace) = &trace {
        builder = builder.observer(trace.clone());
    }
    if args.render {
        let frames = Arc::clone(&frames);
        builder = builder.frame_loop(move |_| {
            frames.fetch_add(1, Ordering::Relaxed);
        });
    }
    let mut session = builder.build()?;

    println!("Walking to {destination}");
    let t0 = Instant::now();
    session.start(destination)?;
    let phase = session.run()?;
    session.stop();

    // ── Report ────────────────────────────────────────────────────────────
    let stats = session.filter_stats();
    println!();
    println!("Finished in {:.2}s: {phase}", t0.elapsed().as_secs_f64());
    println!("  fixes accepted {}, rejected {}", stats.accepted, stats.rejected);
    if args.render {
        println!("  frames drawn   {}", frames.load(Ordering::Relaxed));
    }
    if phase != SessionPhase::Arrived {
        warn!("track ended before reaching the destination");
    }

    if let Some(trace) = trace {
        trace.finish();
        if let Some(e) = trace.take_error() {
            warn!("trace output error: {e}");
        } else if let Some(dir) = &args.trace_dir {
            println!("  trace written to {}", dir.display());
        }
    }

    Ok(())
}
