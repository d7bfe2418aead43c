use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wallsmith_core::{
    AppConfig, ModelObject, ModelPiece, Text, WallConverter, WallDescriptor, WallsmithError,
};

fn main() -> wallsmith_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let walls = match cli.command {
        Commands::Text {
            model,
            text,
            start,
            end,
        } => run_text(&config, &model, &text, start, end)?,
        Commands::Walls { model, start, end } => run_walls(&config, &model, start, end)?,
    };

    write_walls(&walls, cli.output.as_deref())
}

fn run_text(
    config: &AppConfig,
    model: &Path,
    text: &str,
    start: f64,
    end: f64,
) -> wallsmith_core::Result<Vec<WallDescriptor>> {
    tracing::info!(?model, text, start, end, "generating text walls");

    let pieces: Vec<ModelPiece> = read_json(model)?;
    let layout = Text::from_config(pieces, config.text.clone())?;

    let mut converter = WallConverter::new(config.walls);
    let mut walls: Vec<WallDescriptor> = Vec::new();
    layout.to_walls(text, start, end, &mut converter, |_| {}, &mut walls)?;
    Ok(walls)
}

fn run_walls(
    config: &AppConfig,
    model: &Path,
    start: f64,
    end: f64,
) -> wallsmith_core::Result<Vec<WallDescriptor>> {
    tracing::info!(?model, start, end, "converting model objects to walls");

    let objects: Vec<ModelObject> = read_json(model)?;
    let mut converter = WallConverter::new(config.walls);
    let mut walls: Vec<WallDescriptor> = Vec::new();
    converter.convert(&objects, start, end, |_| {}, &mut walls)?;
    Ok(walls)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> wallsmith_core::Result<T> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(WallsmithError::from)
}

fn write_walls(walls: &[WallDescriptor], output: Option<&Path>) -> wallsmith_core::Result<()> {
    let json = serde_json::to_string_pretty(walls)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!(?path, walls = walls.len(), "wrote walls");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Build beatmap walls from text and box models", long_about = None)]
struct Cli {
    /// JSON configuration for text layout and wall conversion.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Write the walls here instead of stdout.
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Spell a string with a letter model.
    Text {
        /// JSON array of model pieces, each tagged with its character's track.
        #[arg(short, long)]
        model: PathBuf,
        /// The text to spell.
        #[arg(short, long)]
        text: String,
        /// Beat the walls appear at.
        #[arg(long)]
        start: f64,
        /// Beat the walls disappear at.
        #[arg(long)]
        end: f64,
    },
    /// Convert a list of (optionally animated) model objects.
    Walls {
        /// JSON array of model objects.
        #[arg(short, long)]
        model: PathBuf,
        #[arg(long)]
        start: f64,
        #[arg(long)]
        end: f64,
    },
}
