use crate::config::Config;
use crate::error::{PlaybackError, Result};
use crate::generators::{GenerationReport, MazeGenerator};
use crate::grids::terrain_grid::TerrainGrid;
use crate::grids::{Position, TerrainKind};
use crate::playback::autoplay::{autoplay, AutoplayOutcome, Clock};
use crate::playback::{
    AutoplayTicket, PlaybackConfig, PlaybackController, PlaybackState, Progress,
};
use crate::renderer::TextRenderer;
use crate::solver::{SolveRequest, Solver};
use crate::stats::ComparisonTable;
use crate::trace::Algorithm;
use futures::executor::block_on;
use std::cell::{Ref, RefCell};

pub struct App {
    grid: TerrainGrid,
    config: Config,
    generator: MazeGenerator,
    player: RefCell<PlaybackController<TextRenderer>>,
    comparison: RefCell<ComparisonTable>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        Self::with_grid(TerrainGrid::new(), config)
    }

    /// Starts from `grid`, applying any marker overrides from `config.board`.
    pub fn with_grid(mut grid: TerrainGrid, config: Config) -> Result<Self> {
        if let Some(start) = config.board.start {
            grid.move_start(start)?;
        }
        if let Some(goal) = config.board.goal {
            grid.move_goal(goal)?;
        }

        let player = PlaybackController::with_dims(
            TextRenderer::new(grid.dims),
            config.playback,
            grid.dims,
        );

        Ok(Self {
            generator: MazeGenerator::from_config(&config.generator),
            player: RefCell::new(player),
            comparison: RefCell::new(ComparisonTable::new()),
            grid,
            config,
        })
    }

    pub fn grid(&self) -> &TerrainGrid {
        &self.grid
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn player(&self) -> Ref<'_, PlaybackController<TextRenderer>> {
        self.player.borrow()
    }

    pub fn comparison(&self) -> Ref<'_, ComparisonTable> {
        self.comparison.borrow()
    }

    pub fn state(&self) -> PlaybackState {
        self.player.borrow().state()
    }

    pub fn story(&self) -> Vec<String> {
        self.player.borrow().renderer().story.lines().to_vec()
    }

    pub fn render_board(&self) -> String {
        self.player.borrow().renderer().board.render(&self.grid)
    }

    fn note(&self, line: impl Into<String>) {
        self.player.borrow_mut().renderer_mut().story.note(line);
    }

    fn ensure_editable(&self, operation: &'static str) -> std::result::Result<(), PlaybackError> {
        let state = self.state();
        if state == PlaybackState::Playing {
            log::warn!("{} refused while a replay is playing", operation);
            return Err(PlaybackError::invalid(operation, state));
        }
        Ok(())
    }

    pub fn generate_maze(&mut self) -> Result<GenerationReport> {
        self.ensure_editable("generate_maze")?;
        self.reset_board()?;
        self.note("Generating a new, imperfect maze...");

        let report = self.generator.generate(&mut self.grid, &self.config.generator);
        if self.config.generator.imperfection_count > 0 {
            self.note(format!(
                "Carved {} extra paths to create loops.",
                report.loops_carved
            ));
        }
        self.note("Maze generated! You can now visualize the path.");

        Ok(report)
    }

    /// Plain board, markers kept, replay and comparison table cleared.
    pub fn reset_board(&mut self) -> Result<()> {
        self.ensure_editable("reset_board")?;

        self.grid.clear();
        self.comparison.borrow_mut().clear();

        let mut player = self.player.borrow_mut();
        player.reset();
        let story = &mut player.renderer_mut().story;
        story.clear();
        story.note("Board has been reset. Create a maze or start visualizing!");

        Ok(())
    }

    pub fn paint(&mut self, position: Position, kind: TerrainKind) -> Result<TerrainKind> {
        self.ensure_editable("paint")?;
        Ok(self.grid.paint(position, kind)?)
    }

    pub fn move_start(&mut self, position: Position) -> Result<()> {
        self.ensure_editable("move_start")?;
        Ok(self.grid.move_start(position)?)
    }

    pub fn move_goal(&mut self, position: Position) -> Result<()> {
        self.ensure_editable("move_goal")?;
        Ok(self.grid.move_goal(position)?)
    }

    pub fn set_playback(&mut self, playback: PlaybackConfig) {
        self.config.playback = playback;
        self.player.borrow_mut().set_config(playback);
    }

    /// Asks `solver` for a trace of the current board and loads it. On any
    /// failure the previous replay is left in place.
    pub fn visualize(&self, solver: &dyn Solver, algorithm: Algorithm) -> Result<()> {
        self.ensure_editable("visualize")?;

        let request = SolveRequest::new(&self.grid, algorithm);
        let loaded = solver
            .solve(&request)
            .and_then(|trace| self.player.borrow_mut().load(trace));

        if let Err(e) = loaded {
            log::error!("visualize failed: {}", e);
            self.note(format!("An error occurred: {}", e));
            return Err(e.into());
        }

        Ok(())
    }

    pub fn step(&self) -> Result<Progress> {
        let progress = self.player.borrow_mut().step_forward()?;
        self.record(&progress);
        Ok(progress)
    }

    pub fn resume(&self) -> Result<AutoplayTicket> {
        Ok(self.player.borrow_mut().resume()?)
    }

    pub fn pause(&self) -> bool {
        self.player.borrow_mut().pause()
    }

    /// Autoplay for `ticket`, recording the run if it completes.
    pub async fn run_autoplay<C: Clock>(&self, ticket: AutoplayTicket, clock: &C) -> AutoplayOutcome {
        let outcome = autoplay(&self.player, ticket, clock).await;
        if let AutoplayOutcome::Completed(summary) = &outcome {
            self.comparison.borrow_mut().record(summary);
        }
        outcome
    }

    /// Resumes and blocks until the replay completes or is superseded.
    pub fn play<C: Clock>(&self, clock: &C) -> Result<AutoplayOutcome> {
        let ticket = self.resume()?;
        Ok(block_on(self.run_autoplay(ticket, clock)))
    }

    pub fn clear_comparison(&self) {
        self.comparison.borrow_mut().clear();
        self.note("Comparison data cleared.");
    }

    fn record(&self, progress: &Progress) {
        if let Progress::Completed(summary) = progress {
            self.comparison.borrow_mut().record(summary);
        }
    }
}
