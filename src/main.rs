//! maze-viz - terminal front end
//!
//! ```bash
//! maze-viz --algorithm dijkstra --seed 7
//! maze-viz --trace recorded.json --steps 20 --speed 0
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use maze_viz::app::App;
use maze_viz::{config, renderer};
use maze_viz::playback::autoplay::ThreadClock;
use maze_viz::playback::{PlaybackConfig, PlaybackState, Progress};
use maze_viz::solver::{HttpSolver, RecordedSolver, Solver};
use maze_viz::trace::Algorithm;

#[derive(Parser)]
#[command(name = "maze-viz")]
#[command(author, version, about = "Terrain maze generator and search replay")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// bfs, astar, dijkstra, gbfs or bidirectional_astar
    #[arg(long, short = 'a', default_value = "astar")]
    algorithm: Algorithm,

    /// Seed for a reproducible maze
    #[arg(long)]
    seed: Option<u64>,

    /// Extra walls to knock out after carving
    #[arg(long)]
    imperfection: Option<usize>,

    /// Path step delay in milliseconds, search steps wait a fifth of it
    #[arg(long)]
    speed: Option<u64>,

    /// Replay a recorded solver response instead of calling the service
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Single steps to take before playing the rest
    #[arg(long, default_value = "0")]
    steps: usize,

    /// Base URL of the search service
    #[arg(long)]
    solver_url: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = config::load_or_default(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.generator.seed = Some(seed);
    }
    if let Some(imperfection) = args.imperfection {
        config.generator.imperfection_count = imperfection;
    }
    if let Some(url) = args.solver_url {
        config.solver.url = url;
    }

    let mut app = App::new(config)?;
    if let Some(speed) = args.speed {
        app.set_playback(PlaybackConfig::from_speed(speed));
    }
    app.generate_maze()?;
    println!("{}", renderer::legend());
    println!("{}", app.render_board());

    let solver: Box<dyn Solver> = match &args.trace {
        Some(path) => Box::new(RecordedSolver::from_file(path)?),
        None => Box::new(HttpSolver::new(
            app.config().solver.url.clone(),
            app.config().solver.timeout(),
        )?),
    };

    app.visualize(solver.as_ref(), args.algorithm)?;

    for _ in 0..args.steps {
        if let Progress::Completed(_) = app.step()? {
            break;
        }
    }
    if app.state() == PlaybackState::Paused {
        app.play(&ThreadClock)?;
    }

    for line in app.story() {
        println!("{}", line);
    }
    println!();
    println!("{}", app.render_board());
    print!("{}", app.comparison().render());

    Ok(())
}
