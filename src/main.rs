//! # Warren Main Entry Point
//!
//! Generates a floor from the command line and prints it as ASCII art or JSON.

use clap::Parser;
use log::{error, info, LevelFilter};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use warren::{
    describe_tile, AsciiRenderer, Floor, FloorGenerator, GenerationConfig, Grid, Phase,
    PhaseFailure, PhaseObserver, Position, RoomSets, WarrenError, WarrenResult,
};

/// Command line arguments for the Warren floor generator.
#[derive(Parser, Debug)]
#[command(name = "warren")]
#[command(about = "Procedural room-grid dungeon floor generator")]
#[command(version)]
struct Args {
    /// Random seed; a random one is chosen when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Level difficulty (0-10)
    #[arg(short, long)]
    difficulty: Option<u32>,

    /// Grid width, must be odd
    #[arg(long)]
    width: Option<u32>,

    /// Grid height, must be odd
    #[arg(long)]
    height: Option<u32>,

    /// Full restarts allowed before giving up
    #[arg(long)]
    max_attempts: Option<u32>,

    /// JSON file with a generation config; flags override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the floor as JSON instead of ASCII
    #[arg(long)]
    json: bool,

    /// Write the floor as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overlay secret chances on empty tiles
    #[arg(long)]
    chances: bool,

    /// Print the grid after every phase
    #[arg(long)]
    visualize: bool,

    /// Describe the tile at X,Y
    #[arg(long, value_parser = parse_position)]
    inspect: Option<Position>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = initialize_logging(&args.log_level) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) -> WarrenResult<()> {
    let level = parse_log_level(log_level)?;
    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .init();
    Ok(())
}

fn parse_log_level(log_level: &str) -> WarrenResult<LevelFilter> {
    match log_level.to_lowercase().as_str() {
        "off" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        other => Err(WarrenError::InvalidArgument(format!(
            "unknown log level '{}'",
            other
        ))),
    }
}

fn run(args: &Args) -> WarrenResult<()> {
    info!("Starting Warren v{}", warren::VERSION);

    let config = build_config(args)?;
    info!(
        "Generating {}x{} floor at difficulty {} with seed {}",
        config.width, config.height, config.difficulty, config.seed
    );

    let renderer = AsciiRenderer::new().with_chances(args.chances);
    let mut rng = warren::generation::utils::create_rng(&config);
    let mut observer = ConsoleObserver { renderer };
    let floor = FloorGenerator::new().generate_observed(&config, &mut rng, &mut observer)?;

    if let Some(path) = &args.output {
        save_floor(&floor, path)?;
        info!("Floor written to {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&floor)?);
    } else {
        print!("{}", renderer.render(&floor.grid));
        println!("{}", renderer.summary(&floor.rooms));
        println!(
            "seed {} | difficulty {} | {} attempt(s)",
            floor.seed, floor.parameters.difficulty, floor.attempts
        );
    }

    if let Some(pos) = args.inspect {
        print!("{}", describe_tile(floor.tile(pos)?));
    }

    Ok(())
}

/// Merges the optional config file with command line overrides.
fn build_config(args: &Args) -> WarrenResult<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GenerationConfig::new(rand::random()),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(max_attempts) = args.max_attempts {
        config.max_attempts = max_attempts;
    }
    config.visualize |= args.visualize;

    config.validate()?;
    Ok(config)
}

fn load_config(path: &Path) -> WarrenResult<GenerationConfig> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn save_floor(floor: &Floor, path: &Path) -> WarrenResult<()> {
    fs::write(path, serde_json::to_string_pretty(floor)?)?;
    Ok(())
}

fn parse_position(text: &str) -> Result<Position, String> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{}'", text))?;
    let x = x.trim().parse().map_err(|_| format!("bad x in '{}'", text))?;
    let y = y.trim().parse().map_err(|_| format!("bad y in '{}'", text))?;
    Ok(Position::new(x, y))
}

/// Prints every completed phase to stderr so stdout stays parseable.
struct ConsoleObserver {
    renderer: AsciiRenderer,
}

impl PhaseObserver for ConsoleObserver {
    fn phase_completed(&mut self, phase: Phase, grid: &Grid, rooms: &RoomSets) {
        eprintln!("== {:?}", phase);
        eprint!("{}", self.renderer.render(grid));
        eprintln!("{}", self.renderer.summary(rooms));
    }

    fn attempt_restarted(&mut self, attempt: u32, failure: &PhaseFailure) {
        eprintln!("== attempt {} restarted: {}", attempt, failure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["warren"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("3,4"), Ok(Position::new(3, 4)));
        assert_eq!(parse_position(" 7 , 0 "), Ok(Position::new(7, 0)));
        assert!(parse_position("3").is_err());
        assert!(parse_position("a,1").is_err());
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("DEBUG").unwrap(), LevelFilter::Debug);
        assert!(parse_log_level("loud").is_err());
    }

    #[test]
    fn test_flags_build_config() {
        let config = build_config(&args(&["--seed", "9", "--difficulty", "4", "--visualize"])).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.difficulty, 4);
        assert!(config.visualize);
    }

    #[test]
    fn test_even_width_is_rejected() {
        let result = build_config(&args(&["--seed", "1", "--width", "14"]));
        assert!(matches!(result, Err(WarrenError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "seed": 3, "difficulty": 2, "width": 11, "height": 11 }}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = build_config(&args(&["--config", &path, "--difficulty", "6"])).unwrap();
        assert_eq!(config.seed, 3);
        assert_eq!(config.width, 11);
        assert_eq!(config.difficulty, 6);
    }

    #[test]
    fn test_save_floor_writes_json() {
        let floor = warren::generate(1, 55).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floor.json");

        save_floor(&floor, &path).unwrap();
        let restored: Floor = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(restored, floor);
    }
}
