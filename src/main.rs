//! Cube Painter
//!
//! Paint the six faces of a 3x3x3 cube in a 3D view and ask an external
//! two-phase solver for the moves that restore it. The painted cube is checked
//! and encoded as a canonical facelet string before the solver is called.

mod visualization;

use std::str::FromStr;

use clap::{Parser, Subcommand};
use eyre::{bail, WrapErr};
use log::LevelFilter;

use cubepaint::{encoder, facelets, CommandSolver, CubeState, Session};
use cubepaint::{Color, Face, Position};

/// Paints a 3x3x3 cube and solves it with an external solver.
#[derive(Parser)]
#[command(name = "cubepaint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Solver program; receives the facelet string as its last argument.
    #[arg(long, global = true, default_value = "kociemba")]
    solver: String,

    /// Extra argument for the solver program, passed before the facelet string.
    #[arg(long = "solver-arg", global = true, allow_hyphen_values = true)]
    solver_args: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive 3D painter.
    Paint,
    /// Print the facelet string of a painted cube.
    Encode {
        /// Facelet to paint, as `x_y_z:slot:color` (e.g. `1_1_1:2:red`).
        #[arg(long)]
        paint: Vec<PaintArg>,
        /// Print an unfolded cube net instead of the raw string.
        #[arg(long)]
        net: bool,
    },
    /// Solve a painted cube with the solver program.
    Solve {
        /// Facelet to paint, as `x_y_z:slot:color`.
        #[arg(long)]
        paint: Vec<PaintArg>,
    },
    /// Print which cubelet slot feeds each position of the facelet string.
    Facelets,
}

/// A single paint instruction given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PaintArg {
    position: Position,
    face: Face,
    color: Color,
}

impl FromStr for PaintArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [position, face, color] = parts.as_slice() else {
            return Err(format!("expected x_y_z:slot:color, got {s:?}"));
        };
        Ok(Self {
            position: position.parse().map_err(|e| format!("{e}"))?,
            face: face.parse().map_err(|e| format!("{e}"))?,
            color: color.parse().map_err(|e| format!("{e}"))?,
        })
    }
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .parse_default_env()
        .init();

    let solver = CommandSolver::new(&cli.solver).with_args(&cli.solver_args);

    match cli.command.unwrap_or(Command::Paint) {
        Command::Paint => {
            println!("Controls: arrows move, C cycle color, Space paint, S solve, R reset");
            visualization::display(Session::new(solver));
        }
        Command::Encode { paint, net } => run_encode(&paint, net)?,
        Command::Solve { paint } => run_solve(solver, &paint)?,
        Command::Facelets => print!("{}", facelets::format_facelet_map()),
    }

    Ok(())
}

/// Applies paint instructions to the solved cube.
fn painted_state(paint: &[PaintArg]) -> CubeState {
    paint.iter().fold(CubeState::initial(), |state, arg| {
        if !arg.position.is_visible(arg.face) {
            log::warn!("{} {} is internal, not painting", arg.position, arg.face);
        }
        state.with_facelet_set(arg.position, arg.face, arg.color)
    })
}

/// Prints the facelet string (or net) of a painted cube.
fn run_encode(paint: &[PaintArg], net: bool) -> eyre::Result<()> {
    let facelets = encoder::encode(&painted_state(paint)).wrap_err("cube cannot be encoded")?;

    match encoder::format_net(&facelets) {
        Some(rendered) if net => print!("{rendered}"),
        _ => println!("{facelets}"),
    }
    Ok(())
}

/// Starts the solver, paints the cube, and prints the solution.
fn run_solve(solver: CommandSolver, paint: &[PaintArg]) -> eyre::Result<()> {
    let session = Session::new(solver);

    let result = pollster::block_on(async {
        session.start().await;
        for arg in paint {
            session.notify_facelet_clicked(arg.position, arg.face, arg.color);
        }
        session.notify_solve_requested().await
    });

    match result {
        Some(Ok(outcome)) => {
            println!("{outcome}");
            Ok(())
        }
        Some(Err(e)) => Err(e).wrap_err("could not solve cube"),
        None => bail!("solve result was discarded"),
    }
}
