// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "snowfield")]
#[command(about = "Walk a procedural snowfield through a day/night cycle", long_about = None)]
pub struct Cli {
    /// JSON scene configuration; defaults apply when absent
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Terrain seed, overrides the config
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run the simulation without a window
    #[arg(long, default_value = "false")]
    pub headless: bool,

    /// Frames to simulate in headless mode
    #[arg(long, default_value = "600")]
    pub frames: u64,

    /// Fixed time step in seconds for headless mode
    #[arg(long, default_value = "0.016")]
    pub dt: f32,

    /// Hold the forward key, turning away from anything that blocks the way
    #[arg(long, default_value = "false")]
    pub autowalk: bool,

    /// glTF model to fly around, overrides the config
    #[arg(long)]
    pub model: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["snowfield"]);
        assert!(!cli.headless);
        assert_eq!(cli.frames, 600);
        assert!(cli.config.is_none());
    }

    #[test]
    fn headless_flags() {
        let cli = Cli::parse_from([
            "snowfield", "--headless", "--frames", "10", "--dt", "0.1", "--seed", "9", "--autowalk",
        ]);
        assert!(cli.headless && cli.autowalk);
        assert_eq!(cli.frames, 10);
        assert_eq!(cli.dt, 0.1);
        assert_eq!(cli.seed, Some(9));
    }
}
