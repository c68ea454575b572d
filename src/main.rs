//! Body pointing application: depth-camera pointing and touch gestures.

use anyhow::{bail, Context, Result};
use body_pointer::{
    app::PointingApp,
    config::{Config, EXAMPLE_CONFIG},
    operation::InteractionMechanism,
    screen::EnvironmentPreset,
    source::ReplaySource,
};
use clap::Parser;
use log::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Replay recorded tracker frames (JSON lines) instead of a camera
    #[arg(short, long)]
    replay: Option<String>,

    /// Screen environment preset (single_above, single_below, curved, wrap_around)
    #[arg(short, long)]
    environment: Option<String>,

    /// Interaction mechanism (select_right_pan_left, select_left_pan_right, select_both_pan_both)
    #[arg(short, long)]
    mechanism: Option<String>,

    /// Enable touch injection
    #[arg(short, long)]
    touch: bool,

    /// 1€ filter minimum cutoff
    #[arg(long)]
    min_cutoff: Option<f64>,

    /// 1€ filter speed coefficient
    #[arg(long)]
    beta: Option<f64>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print an example configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn parse_mechanism(name: &str) -> Result<InteractionMechanism> {
    Ok(match name {
        "select_right_pan_left" => InteractionMechanism::SelectRightPanLeft,
        "select_left_pan_right" => InteractionMechanism::SelectLeftPanRight,
        "select_both_pan_both" => InteractionMechanism::SelectBothPanBoth,
        _ => bail!("Unknown interaction mechanism: {name}"),
    })
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Body Pointer");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {config_path}");
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {e}. Using defaults.");
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    // Command line overrides
    if let Some(name) = &args.environment {
        config.environment.preset = EnvironmentPreset::from_name(name)?;
        config.environment.screens.clear();
    }
    if let Some(name) = &args.mechanism {
        config.interaction.mechanism = parse_mechanism(name)?;
    }
    if args.touch {
        config.touch.enabled = true;
    }
    if let Some(min_cutoff) = args.min_cutoff {
        config.filter.min_cutoff = min_cutoff;
    }
    if let Some(beta) = args.beta {
        config.filter.beta = beta;
    }

    let Some(replay) = args.replay else {
        bail!("No tracking device backend is built in; pass --replay <recording.jsonl>");
    };
    let source = ReplaySource::open(&replay).with_context(|| format!("Cannot replay {replay}"))?;

    // Create and run application
    let mut app = PointingApp::new(config, Box::new(source))?;
    app.start()?;
    let summary = app.run()?;
    info!("Processed {} frames, last operation {}", summary.frames, summary.last_operation);

    Ok(())
}
