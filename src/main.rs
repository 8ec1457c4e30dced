//! Move the cursor to whichever monitor your head is facing.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use head_screen_switch::{
    app::{discover_monitors, SwitchApp},
    config::{Config, FacingLandmark},
    shutdown::ShutdownFlag,
};
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use
    #[arg(long)]
    cam: Option<i32>,

    /// Path to the SCRFD face detector ONNX model
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// GUI display mode (all, none)
    #[arg(short, long, value_enum)]
    gui: Option<GuiMode>,

    /// Do not mirror camera frames
    #[arg(long)]
    no_mirror: bool,

    /// Face point used as the facing coordinate
    #[arg(short, long, value_enum)]
    landmark: Option<LandmarkArg>,

    /// Print the discovered monitors and exit
    #[arg(long)]
    list_monitors: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GuiMode {
    /// Show the camera preview
    All,
    /// Headless
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LandmarkArg {
    /// Nose tip keypoint
    Nose,
    /// Center of the face box
    Center,
}

impl Args {
    /// Layer command line flags over the file configuration
    fn apply_to(&self, config: &mut Config) {
        if let Some(cam) = self.cam {
            config.camera.index = cam;
        }
        if self.no_mirror {
            config.camera.mirror = false;
        }
        if let Some(model) = &self.model {
            config.detection.model.clone_from(model);
        }
        if let Some(gui) = self.gui {
            config.display.show_preview = gui == GuiMode::All;
        }
        if let Some(landmark) = self.landmark {
            config.detection.landmark = match landmark {
                LandmarkArg::Nose => FacingLandmark::NoseTip,
                LandmarkArg::Center => FacingLandmark::BoxCenter,
            };
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(default_level));

    info!("Head Screen Switch");

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_file(path)?
        }
        None => Config::default(),
    };
    args.apply_to(&mut config);

    if args.list_monitors {
        for m in discover_monitors(&config)? {
            let (cx, cy) = m.center();
            println!(
                "screen {}: {}x{} at ({}, {}), center ({}, {})",
                m.index, m.width, m.height, m.x, m.y, cx, cy
            );
        }
        return Ok(());
    }

    let shutdown = ShutdownFlag::install()?;
    let mut app = SwitchApp::new(config, shutdown)?;
    app.run()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "head-screen-switch",
            "--cam",
            "2",
            "--gui",
            "none",
            "--no-mirror",
            "--landmark",
            "center",
            "--model",
            "models/scrfd.onnx",
        ])
        .unwrap();
        let mut config = Config::default();
        args.apply_to(&mut config);

        assert_eq!(config.camera.index, 2);
        assert!(!config.camera.mirror);
        assert!(!config.display.show_preview);
        assert_eq!(config.detection.landmark, FacingLandmark::BoxCenter);
        assert_eq!(config.detection.model, PathBuf::from("models/scrfd.onnx"));
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = Args::try_parse_from(["head-screen-switch"]).unwrap();
        let mut config = Config::default();
        config.camera.index = 3;
        args.apply_to(&mut config);
        assert_eq!(config.camera.index, 3);
        assert!(config.camera.mirror);
        assert!(config.display.show_preview);
    }

    #[test]
    fn test_rejects_unknown_gui_mode() {
        assert!(Args::try_parse_from(["head-screen-switch", "--gui", "pointers"]).is_err());
    }
}
