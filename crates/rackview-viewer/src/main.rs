//! Rackview - Native entry point

#[cfg(not(target_arch = "wasm32"))]
use anyhow::Result;
#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
#[cfg(not(target_arch = "wasm32"))]
use tracing::{info, Level};
#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::FmtSubscriber;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "rackview")]
#[command(about = "Interactive 3D/2D data-center floor viewer")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "rackview.toml")]
    config: PathBuf,

    /// Layout table to show instead of the configured one
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Print the resolved layout as JSON and exit
    #[arg(long)]
    print_layout: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&args.log_level))
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Rackview v{}", env!("CARGO_PKG_VERSION"));

    let mut config = rackview_core::config::load_config(&args.config)?;

    // Override layout if specified
    if let Some(layout) = args.layout {
        config.layout = Some(layout);
    }

    let layout = config.resolve_layout()?;
    info!(
        equipment = layout.equipment.len(),
        globes = layout.globe.len(),
        "Layout loaded"
    );

    if args.print_layout {
        println!("{}", layout.to_json_pretty()?);
        return Ok(());
    }

    rackview_viewer::app::run(config, layout);
    Ok(())
}

// The browser build starts from the library's wasm_bindgen entry point
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("verbose"), Level::INFO);
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["rackview"]);
        assert_eq!(args.config, PathBuf::from("rackview.toml"));
        assert!(args.layout.is_none());
        assert!(!args.print_layout);

        let args = Args::parse_from(["rackview", "--layout", "hall.toml", "--print-layout", "-l", "debug"]);
        assert_eq!(args.layout, Some(PathBuf::from("hall.toml")));
        assert!(args.print_layout);
        assert_eq!(args.log_level, "debug");
    }
}
