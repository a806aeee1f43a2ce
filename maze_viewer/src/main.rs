// main.rs - Interactive terminal client for the maze generation/solving service.
// Reads one command per line from stdin and routes it through the session controller.

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use std::io::{Stdout, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use maze_viewer::{
    BitmapChartBackend, GenerateOptions, GridStyle, HttpMazeService, MazeSize, SessionController,
    SessionError, TerminalSurface, UserEvent,
};

type Controller = SessionController<HttpMazeService, TerminalSurface<Stdout>, BitmapChartBackend>;

/// CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Base URL of the maze generation/solving service
    #[arg(long, env = "MAZE_SERVICE_URL", default_value = "http://127.0.0.1:5000")]
    pub service_url: String,

    /// Initial maze size; even values step down to the next odd one
    #[arg(short, long, env = "MAZE_SIZE", default_value = "15")]
    pub size: u32,

    /// HTTP request timeout in seconds
    #[arg(long, env = "MAZE_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    /// Ask the generator for mazes with more than one route
    #[arg(long, env = "MAZE_MULTIPLE_PATHS")]
    pub multiple_paths: Option<bool>,

    /// Probability of knocking out extra walls (0.0 - 1.0)
    #[arg(long, env = "MAZE_WALL_REMOVAL_PROBABILITY")]
    pub wall_removal_probability: Option<f64>,

    /// Plain characters instead of ANSI colors
    #[arg(long)]
    pub ascii: bool,

    /// Directory for grid.png and chart.png snapshots
    #[arg(long)]
    pub snapshot_dir: Option<PathBuf>,

    /// Pixel size of one cell in grid snapshots (1-64)
    #[arg(long, default_value = "15", value_parser = clap::value_parser!(u32).range(1..=64))]
    pub cell_px: u32,
}

impl Args {
    fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            multiple_paths: self.multiple_paths,
            wall_removal_probability: self.wall_removal_probability,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Size(u32),
    Generate(Option<u32>),
    Solve,
    View(String),
    State,
    Help,
    Quit,
}

const HELP: &str = "\
Commands:
  size N        set the maze size (odd, 5-101)
  generate [N]  generate a new maze, optionally at size N
  solve         solve the current maze with every heuristic
  view NAME     show the solution path of heuristic NAME
  state         print the session phase and results
  help          show this message
  quit          exit
";

/// Parse one input line. Blank lines yield `None`.
fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    if let Some(extra) = words.next() {
        bail!("Unexpected argument '{}'", extra);
    }

    let number = |raw: &str| {
        raw.parse::<u32>()
            .with_context(|| format!("'{}' is not a valid size", raw))
    };

    let command = match (verb.to_ascii_lowercase().as_str(), arg) {
        ("size", Some(raw)) => Command::Size(number(raw)?),
        ("size", None) => bail!("Usage: size N"),
        ("generate" | "gen" | "g", raw) => Command::Generate(raw.map(number).transpose()?),
        ("solve" | "s", None) => Command::Solve,
        ("view" | "v", Some(name)) => Command::View(name.to_string()),
        ("view" | "v", None) => bail!("Usage: view NAME"),
        ("state", None) => Command::State,
        ("help" | "?", None) => Command::Help,
        ("quit" | "exit" | "q", None) => Command::Quit,
        (other, _) => return Err(anyhow!("Unknown command '{}', try 'help'", other)),
    };
    Ok(Some(command))
}

fn print_state(controller: &Controller) {
    let state = controller.state();
    let mut out = format!("phase {:?}, size {}", controller.phase(), controller.size());
    if let Some(maze) = state.maze() {
        out.push_str(&format!(
            ", maze {} from {} to {}",
            maze.dimensions(),
            state.start(),
            state.end()
        ));
    }
    if let Some(comparison) = controller.comparison() {
        let names: Vec<&str> = comparison.names().collect();
        out.push_str(&format!(
            ", heuristics [{}], fastest {}",
            names.join(", "),
            comparison.fastest
        ));
    }
    if let Some(selected) = state.selected() {
        out.push_str(&format!(", viewing {}", selected));
    }
    println!("{}", out);
}

/// Why `command` cannot run against the current session, if it cannot.
/// `available` lists the heuristic names of the current results.
fn rejection(command: &Command, solve_enabled: bool, available: &[&str]) -> Option<String> {
    match command {
        Command::Solve if !solve_enabled => {
            Some("Nothing to solve yet, run 'generate' first".to_string())
        }
        Command::View(_) if available.is_empty() => {
            Some("No results yet, run 'solve' first".to_string())
        }
        Command::View(name) if !available.contains(&name.as_str()) => Some(format!(
            "No result named '{}', choose one of: {}",
            name,
            available.join(", ")
        )),
        _ => None,
    }
}

async fn run_command(controller: &mut Controller, command: Command) -> Result<bool, SessionError> {
    let refused = {
        let available: Vec<&str> = controller
            .comparison()
            .map(|c| c.names().collect())
            .unwrap_or_default();
        rejection(&command, controller.controls().solve.enabled, &available)
    };
    if let Some(reason) = refused {
        println!("{}", reason);
        return Ok(true);
    }

    match command {
        Command::Size(n) => controller.dispatch(UserEvent::SizeChanged(n)).await?,
        Command::Generate(n) => {
            if let Some(n) = n {
                controller.dispatch(UserEvent::SizeChanged(n)).await?;
            }
            controller.dispatch(UserEvent::Generate).await?;
        }
        Command::Solve => controller.dispatch(UserEvent::Solve).await?,
        Command::View(name) => controller.dispatch(UserEvent::ViewSolution(name)).await?,
        Command::State => print_state(controller),
        Command::Help => print!("{}", HELP),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    info!("Starting with {args:?}");

    let service = HttpMazeService::new(&args.service_url, Duration::from_secs(args.timeout_secs))
        .context("Failed to build HTTP client")?;

    let style = if args.ascii { GridStyle::Ascii } else { GridStyle::Ansi };
    let mut surface = TerminalSurface::new(std::io::stdout(), style);
    let mut chart_backend = BitmapChartBackend::default();
    if let Some(dir) = &args.snapshot_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        surface = surface.with_snapshots(dir, args.cell_px);
        chart_backend = chart_backend.with_output(dir.join("chart.png"));
        info!("Writing snapshots to {}", dir.display());
    }

    let mut controller = SessionController::new(service, surface, chart_backend)
        .with_generate_options(args.generate_options());
    let size = controller.set_size(args.size);
    if size.get() != args.size {
        warn!("Size {} adjusted to {}", args.size, size);
    }
    info!("Talking to {}", args.service_url);
    print!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed reading stdin")? else {
            break;
        };
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match run_command(&mut controller, command).await {
            Ok(true) => {}
            Ok(false) => break,
            // failures are already on screen via the surface
            Err(e) if e.is_user_facing() => debug!("Command failed: {}", e),
            Err(e) => println!("{}", e),
        }
    }

    info!("Bye");
    Ok(())
}
