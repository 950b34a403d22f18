//! chromaqueen CLI: solve a Queens puzzle from a screenshot, or from a board written as text.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chromaqueen::{Board, Config, ErrorKind, GridLines, Pipeline};
use clap::Parser;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "chromaqueen")]
#[command(about = "Solve color-region Queens puzzles from screenshots")]
#[command(version)]
struct Cli {
    /// Screenshot or photo of the puzzle.
    #[arg(required_unless_present = "board")]
    image: Option<PathBuf>,

    /// Solve a text board instead: one line per row, one character per region.
    #[arg(long, conflicts_with = "image")]
    board: Option<PathBuf>,

    /// Image drawn on every solved cell.
    #[arg(long, default_value = "utils/golden_crown.png")]
    marker: PathBuf,

    /// Where to write the rendered solution (PNG).
    #[arg(long, default_value = "solution.png")]
    output: PathBuf,

    /// Pixels ignored along each cell edge when sampling its color.
    #[arg(long, default_value = "15")]
    padding: u32,

    /// Which cell edges get grid lines.
    #[arg(long, default_value_t = GridLines::AllEdges)]
    grid_lines: GridLines,
}

fn exit_code(kind: ErrorKind) -> ExitCode {
    match kind {
        ErrorKind::Io => ExitCode::from(1),
        ErrorKind::Extraction => ExitCode::from(2),
        ErrorKind::Unsatisfiable => ExitCode::from(3),
        ErrorKind::Asset => ExitCode::from(4),
    }
}

fn solve_text(path: &Path) -> ExitCode {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            error!("could not read {}: {e}", path.display());
            return ExitCode::from(1);
        }
    };

    let board: Board = match text.parse() {
        Ok(board) => board,
        Err(reasons) => {
            error!("malformed board: {reasons:?}");
            return exit_code(ErrorKind::Extraction);
        }
    };

    match board.solve() {
        Ok(solved) => {
            print!("{solved}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            exit_code(ErrorKind::Unsatisfiable)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(path) = &cli.board {
        return solve_text(path);
    }
    let Some(image) = &cli.image else {
        return ExitCode::from(1);
    };

    let mut config = Config::new(cli.marker.clone(), cli.output.clone());
    config.extractor.cell_padding = cli.padding;
    config.render.grid_lines = cli.grid_lines;

    match Pipeline::new(config).run(image) {
        Ok(output) => {
            info!("wrote {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            exit_code(e.kind())
        }
    }
}
