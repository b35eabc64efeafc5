use crate::grids::terrain_grid::TerrainGrid;
use crate::grids::{Dimensions, Position, TerrainKind};
use crate::playback::Renderer;
use crate::trace::{format_score, Algorithm, SearchDirection, SearchTrace, Summary, TraceEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Closed,
    Path,
}

/// Scores shown on a visited cell. Breadth-first only carries `g`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    pub g: f64,
    pub h: Option<f64>,
    pub f: Option<f64>,
}

impl Annotation {
    fn of(event: &TraceEvent) -> Self {
        match event.scores() {
            Some(scores) => Self {
                g: scores.g,
                h: Some(scores.h),
                f: Some(scores.f),
            },
            None => Self {
                g: event.g(),
                h: None,
                f: None,
            },
        }
    }
}

pub fn terrain_glyph(kind: TerrainKind) -> char {
    match kind {
        TerrainKind::Plain => '.',
        TerrainKind::Wall => '#',
        TerrainKind::Water => '~',
        TerrainKind::Mud => '%',
        TerrainKind::Forest => '^',
    }
}

/// Glyph, name and entry cost of every terrain kind, plus the overlay glyphs.
pub fn legend() -> String {
    let mut parts: Vec<String> = TerrainKind::ALL
        .iter()
        .map(|kind| match kind.cost() {
            Some(cost) => format!("{} {} ({})", terrain_glyph(*kind), kind.name(), cost),
            None => format!("{} {}", terrain_glyph(*kind), kind.name()),
        })
        .collect();
    parts.extend(
        ["S start", "G goal", "o closed", "* path"]
            .iter()
            .map(|part| part.to_string()),
    );
    parts.join("  ")
}

/// Closed and path marks layered over the terrain.
#[derive(Debug, Clone)]
pub struct BoardView {
    dims: Dimensions,
    start: Option<Position>,
    goal: Option<Position>,
    marks: Vec<Option<Mark>>,
    annotations: Vec<Option<Annotation>>,
}

impl BoardView {
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            start: None,
            goal: None,
            marks: vec![None; dims.len()],
            annotations: vec![None; dims.len()],
        }
    }

    pub fn clear(&mut self) {
        self.marks = vec![None; self.dims.len()];
        self.annotations = vec![None; self.dims.len()];
    }

    pub fn mark(&self, position: Position) -> Option<Mark> {
        self.index(position).and_then(|index| self.marks[index])
    }

    pub fn annotation(&self, position: Position) -> Option<Annotation> {
        self.index(position).and_then(|index| self.annotations[index])
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.marks.iter().filter(|m| **m == Some(mark)).count()
    }

    fn index(&self, position: Position) -> Option<usize> {
        if self.dims.contains(position) {
            Some(self.dims.index_of(position))
        } else {
            None
        }
    }

    fn is_marker(&self, position: Position) -> bool {
        Some(position) == self.start || Some(position) == self.goal
    }

    fn begin(&mut self, trace: &SearchTrace) {
        self.clear();
        self.start = Some(trace.start);
        self.goal = Some(trace.goal);
    }

    fn visit(&mut self, event: &TraceEvent) {
        let position = event.position();
        if self.is_marker(position) {
            return;
        }
        if let Some(index) = self.index(position) {
            self.marks[index] = Some(Mark::Closed);
            self.annotations[index] = Some(Annotation::of(event));
        }
    }

    fn trace_path(&mut self, position: Position) {
        if let Some(index) = self.index(position) {
            self.marks[index] = Some(Mark::Path);
        }
    }

    /// One line per row. Markers win over marks, marks over terrain.
    pub fn render(&self, grid: &TerrainGrid) -> String {
        let mut out = String::with_capacity(grid.dims.len() + grid.dims.rows);

        for row in 0..grid.dims.rows {
            for column in 0..grid.dims.columns {
                let position = (row, column);
                let glyph = if position == grid.start() {
                    'S'
                } else if position == grid.goal() {
                    'G'
                } else {
                    match self.mark(position) {
                        Some(Mark::Path) => '*',
                        Some(Mark::Closed) => 'o',
                        None => grid
                            .get_cell(position)
                            .map(terrain_glyph)
                            .unwrap_or(' '),
                    }
                };
                out.push(glyph);
            }
            out.push('\n');
        }

        out
    }
}

/// Narrative lines in the order a reader would follow the search.
#[derive(Debug, Clone, Default)]
pub struct StoryLog {
    lines: Vec<String>,
    algorithm: Option<Algorithm>,
    tracing: bool,
}

impl StoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn note(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn begin(&mut self, trace: &SearchTrace) {
        self.clear();
        self.algorithm = Some(trace.algorithm);
        self.tracing = false;
        self.note(format!("Starting {}...", trace.algorithm.display_name()));
    }

    fn visit(&mut self, event: &TraceEvent) {
        let (row, column) = event.position();

        let line = match *event {
            TraceEvent::Uninformed { g, .. } => {
                format!("Visiting [{}, {}], steps: {}.", row, column, format_score(g))
            }
            TraceEvent::Informed { scores, .. } if self.algorithm == Some(Algorithm::Gbfs) => {
                format!(
                    "Evaluating [{}, {}] based on heuristic. H: {:.0}, G: {}.",
                    row,
                    column,
                    scores.h,
                    format_score(scores.g)
                )
            }
            TraceEvent::Informed { scores, .. } => format!(
                "Evaluating [{}, {}]. G: {}, H: {:.0}, F: {:.0}.",
                row,
                column,
                format_score(scores.g),
                scores.h,
                scores.f
            ),
            TraceEvent::Bidirectional {
                scores, direction, ..
            } => {
                let side = match direction {
                    SearchDirection::Forward => "fwd",
                    SearchDirection::Backward => "bwd",
                };
                format!(
                    "Evaluating [{}, {}] (Bi-A*, {}). G: {}, H: {:.0}, F: {:.0}.",
                    row,
                    column,
                    side,
                    format_score(scores.g),
                    scores.h,
                    scores.f
                )
            }
        };

        self.note(line);
    }

    fn trace_path(&mut self) {
        if !self.tracing {
            self.tracing = true;
            self.note("Tracing the optimal path back to the start...");
        }
    }

    fn finish(&mut self, summary: &Summary) {
        let elapsed = format_score(summary.elapsed_ms);

        if summary.path_found {
            let cost = summary
                .cost
                .map(format_score)
                .unwrap_or_else(|| "N/A".to_string());
            self.note(format!(
                "Path Found! Total cost: {}, Steps: {}.",
                cost, summary.path_length
            ));
            self.note(format!(
                "Stats: Explored {} nodes in {}ms.",
                summary.nodes_explored, elapsed
            ));
        } else {
            self.note(format!(
                "No path could be found. Explored {} nodes in {}ms.",
                summary.nodes_explored, elapsed
            ));
        }
    }
}

/// Board overlay and story log driven together by the playback controller.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    pub board: BoardView,
    pub story: StoryLog,
}

impl TextRenderer {
    pub fn new(dims: Dimensions) -> Self {
        Self {
            board: BoardView::new(dims),
            story: StoryLog::new(),
        }
    }
}

impl Renderer for TextRenderer {
    fn on_load(&mut self, trace: &SearchTrace) {
        self.board.begin(trace);
        self.story.begin(trace);
    }

    fn on_search_event(&mut self, event: &TraceEvent) {
        log::debug!("closed {:?}", event.position());
        self.board.visit(event);
        self.story.visit(event);
    }

    fn on_path_step(&mut self, position: Position) {
        log::debug!("path {:?}", position);
        self.board.trace_path(position);
        self.story.trace_path();
    }

    fn on_complete(&mut self, summary: &Summary) {
        log::debug!("complete {:?}", summary);
        self.story.finish(summary);
    }

    fn on_reset(&mut self) {
        self.board.clear();
    }
}
