//! Command-line interface of the headless gallery runner.
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "gallery-xr")]
#[command(about = "Headless run of the VR gallery controller loop", long_about = None)]
pub struct Cli {
    /// JSON config file; defaults are used when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Artwork catalog JSON; the bundled catalog is used when omitted
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Number of simulated frames
    #[arg(long, default_value_t = 720)]
    pub frames: u64,

    /// Refresh rate of the simulated headset
    #[arg(long, default_value_t = crate::frame::DEFAULT_REFRESH_HZ)]
    pub hz: f32,

    /// Only log warnings and errors
    #[arg(long, short = 'q', default_value = "false")]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["gallery-xr"]);
        assert_eq!(cli.frames, 720);
        assert!(cli.config.is_none());
        assert!(!cli.quiet);
    }

    #[test]
    fn explicit_paths() {
        let cli = Cli::parse_from(["gallery-xr", "--config", "xr.json", "--frames", "10", "-q"]);
        assert_eq!(cli.config, Some(PathBuf::from("xr.json")));
        assert_eq!(cli.frames, 10);
        assert!(cli.quiet);
    }
}
