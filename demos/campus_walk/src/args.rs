// Command-line arguments for the campus walk demo

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser, Clone)]
#[command(version, about)]
pub struct WalkArgs {
    /// RON file overriding the default engine configuration
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Number of fixes on the synthetic walk, endpoints included
    #[arg(short = 'n', long = "steps", default_value_t = 20)]
    pub steps: usize,

    /// Reported accuracy of every synthetic fix, in metres
    #[arg(short = 'a', long = "accuracy", default_value_t = 5.0)]
    pub accuracy: f64,

    /// Replay a recorded track (lat,lon,accuracy_m,captured_at_ms) instead of the synthetic walk
    #[arg(short = 't', long = "track")]
    pub track: Option<PathBuf>,

    /// Add seeded GPS and compass noise
    #[arg(short = 'j', long = "jitter")]
    pub jitter: bool,

    /// Seed for the jitter generator
    #[arg(long = "seed", default_value_t = 42)]
    pub seed: u64,

    /// Delay between sensor deliveries, in milliseconds
    #[arg(short = 'i', long = "interval-ms", default_value_t = 250)]
    pub interval_ms: u64,

    /// Simulate a device without a compass
    #[arg(long = "no-compass")]
    pub no_compass: bool,

    /// Run the redraw loop alongside the sensors and report its frame count
    #[arg(long = "render")]
    pub render: bool,

    /// Directory for the CSV navigation trace
    #[arg(short = 'o', long = "trace-dir")]
    pub trace_dir: Option<PathBuf>,
}
