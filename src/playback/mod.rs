//! Replays a [`SearchTrace`] against a [`Renderer`]. Every load, reset, pause
//! or resume bumps a token; autoplay holding an older token stops emitting.

pub mod autoplay;

use crate::error::{PlaybackError, SolverError};
use crate::grids::{Dimensions, Position};
use crate::trace::{SearchTrace, Summary, TraceEvent};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Receives emissions, once each and in trace order.
pub trait Renderer {
    fn on_load(&mut self, _trace: &SearchTrace) {}
    fn on_search_event(&mut self, event: &TraceEvent);
    fn on_path_step(&mut self, position: Position);
    fn on_complete(&mut self, summary: &Summary);
    fn on_reset(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    /// Loaded and waiting for a step or resume.
    Paused,
    Playing,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Search,
    Path,
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Nothing,
    Advanced,
    Completed(Summary),
}

/// Handed out by `resume`; only the newest ticket may drive emissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplayTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub search_delay_ms: u64,
    pub path_delay_ms: u64,
}

impl PlaybackConfig {
    pub const DEFAULT_SPEED_MS: u64 = 50;

    /// Path steps wait `speed_ms`, search events a fifth of that.
    pub fn from_speed(speed_ms: u64) -> Self {
        Self {
            search_delay_ms: speed_ms / 5,
            path_delay_ms: speed_ms,
        }
    }

    /// Speed slider in 1..=200, higher is faster.
    pub fn from_slider(value: u64) -> Self {
        Self::from_speed(201 - value.max(1).min(200))
    }

    pub fn delay_for(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Search => Duration::from_millis(self.search_delay_ms),
            Phase::Path | Phase::Done => Duration::from_millis(self.path_delay_ms),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self::from_speed(Self::DEFAULT_SPEED_MS)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    pub trace: SearchTrace,
    pub phase: Phase,
    pub cursor: usize,
}

impl PlaybackSession {
    fn new(trace: SearchTrace) -> Self {
        Self {
            trace,
            phase: Phase::Search,
            cursor: 0,
        }
    }

    fn enter_path(&mut self) {
        self.phase = Phase::Path;
        self.cursor = 0;
    }

    pub fn remaining(&self) -> usize {
        match self.phase {
            Phase::Search => self.trace.events.len() - self.cursor + self.trace.path.len(),
            Phase::Path => self.trace.path.len() - self.cursor,
            Phase::Done => 0,
        }
    }
}

pub struct PlaybackController<R: Renderer> {
    renderer: R,
    config: PlaybackConfig,
    dims: Dimensions,
    session: Option<PlaybackSession>,
    state: PlaybackState,
    token: u64,
}

impl<R: Renderer> PlaybackController<R> {
    pub fn new(renderer: R, config: PlaybackConfig) -> Self {
        Self::with_dims(renderer, config, Dimensions::default())
    }

    /// Traces are checked against `dims` on load.
    pub fn with_dims(renderer: R, config: PlaybackConfig, dims: Dimensions) -> Self {
        Self {
            renderer,
            config,
            dims,
            session: None,
            state: PlaybackState::Idle,
            token: 0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.session.as_ref().map(|session| session.phase)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.session.as_ref().map(|session| session.cursor)
    }

    pub fn config(&self) -> PlaybackConfig {
        self.config
    }

    pub fn set_config(&mut self, config: PlaybackConfig) {
        self.config = config;
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Summary of the finished replay.
    pub fn summary(&self) -> Option<Summary> {
        match (self.state, &self.session) {
            (PlaybackState::Completed, Some(session)) => Some(session.trace.summary()),
            _ => None,
        }
    }

    /// Replaces any session. Pending autoplay is cancelled first, so a refused
    /// trace leaves the previous session in place but paused.
    pub fn load(&mut self, trace: SearchTrace) -> Result<(), SolverError> {
        self.token += 1;
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }

        trace.validate(self.dims)?;

        log::info!(
            "Loaded {} trace: {} events, {} path steps",
            trace.algorithm.display_name(),
            trace.events.len(),
            trace.path.len()
        );
        self.renderer.on_load(&trace);
        self.session = Some(PlaybackSession::new(trace));
        self.state = PlaybackState::Paused;

        Ok(())
    }

    pub fn reset(&mut self) {
        self.token += 1;
        self.session = None;
        self.state = PlaybackState::Idle;
        self.renderer.on_reset();
    }

    /// Emits one event while paused. Idle and completed sessions have
    /// nothing to emit; stepping during autoplay is refused.
    pub fn step_forward(&mut self) -> Result<Progress, PlaybackError> {
        match self.state {
            PlaybackState::Idle | PlaybackState::Completed => Ok(Progress::Nothing),
            PlaybackState::Playing => {
                log::warn!("step_forward ignored while playing");
                Err(PlaybackError::invalid("step_forward", self.state))
            }
            PlaybackState::Paused => Ok(self.emit_next()),
        }
    }

    pub fn resume(&mut self) -> Result<AutoplayTicket, PlaybackError> {
        if self.state != PlaybackState::Paused {
            return Err(PlaybackError::invalid("resume", self.state));
        }

        self.token += 1;
        self.state = PlaybackState::Playing;
        Ok(AutoplayTicket(self.token))
    }

    /// Stops autoplay at its next boundary. Returns false when not playing.
    pub fn pause(&mut self) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }

        self.token += 1;
        self.state = PlaybackState::Paused;
        true
    }

    pub fn is_current(&self, ticket: AutoplayTicket) -> bool {
        self.state == PlaybackState::Playing && ticket.0 == self.token
    }

    /// How long the autoplay loop waits before its next emission, `None`
    /// once `ticket` has been superseded.
    pub fn next_delay(&self, ticket: AutoplayTicket) -> Option<Duration> {
        if !self.is_current(ticket) {
            return None;
        }

        self.session
            .as_ref()
            .map(|session| self.config.delay_for(session.phase))
    }

    /// One autoplay emission, exactly as `step_forward` would emit it.
    pub fn advance(&mut self, ticket: AutoplayTicket) -> Progress {
        if !self.is_current(ticket) {
            return Progress::Nothing;
        }

        self.emit_next()
    }

    fn emit_next(&mut self) -> Progress {
        let session = match self.session.as_mut() {
            Some(session) => session,
            None => return Progress::Nothing,
        };

        if session.phase == Phase::Search && session.cursor >= session.trace.events.len() {
            session.enter_path();
        }

        let finished = match session.phase {
            Phase::Search => {
                let event = &session.trace.events[session.cursor];
                log::debug!("search event {} at {:?}", session.cursor, event.position());
                self.renderer.on_search_event(event);
                session.cursor += 1;

                if session.cursor == session.trace.events.len() {
                    session.enter_path();
                    session.trace.path.is_empty()
                } else {
                    false
                }
            }
            Phase::Path => {
                if let Some(position) = session.trace.path.get(session.cursor).copied() {
                    log::debug!("path step {} at {:?}", session.cursor, position);
                    self.renderer.on_path_step(position);
                    session.cursor += 1;
                }

                session.cursor >= session.trace.path.len()
            }
            Phase::Done => return Progress::Nothing,
        };

        if finished {
            self.complete()
        } else {
            Progress::Advanced
        }
    }

    fn complete(&mut self) -> Progress {
        let summary = match self.session.as_mut() {
            Some(session) => {
                session.phase = Phase::Done;
                session.trace.summary()
            }
            None => return Progress::Nothing,
        };

        self.token += 1;
        self.state = PlaybackState::Completed;
        log::info!(
            "{} replay complete, path found: {}",
            summary.algorithm.display_name(),
            summary.path_found
        );
        self.renderer.on_complete(&summary);

        Progress::Completed(summary)
    }
}


#[cfg(test)]
mod test_playback {
    use super::test_support::*;
    use super::*;
    use crate::trace::Algorithm;

    fn controller() -> PlaybackController<Recorder> {
        PlaybackController::new(Recorder::default(), PlaybackConfig::default())
    }

    fn three_by_three() -> SearchTrace {
        SearchTrace {
            algorithm: Algorithm::Bfs,
            start: (0, 0),
            goal: (1, 1),
            events: vec![
                TraceEvent::Uninformed { position: (0, 0), g: 0.0 },
                TraceEvent::Uninformed { position: (0, 1), g: 1.0 },
                TraceEvent::Uninformed { position: (1, 1), g: 2.0 },
            ],
            path: vec![(0, 0), (0, 1), (1, 1)],
            total_cost: None,
            node_count: 3,
            elapsed_ms: 0.4,
        }
    }

    #[test]
    fn steps_through_search_then_path() {
        let mut player = controller();
        player.load(three_by_three()).unwrap();
        assert_eq!(player.state(), PlaybackState::Paused);
        assert_eq!(player.phase(), Some(Phase::Search));
        assert!(player.renderer().emissions.is_empty());

        assert_eq!(player.step_forward(), Ok(Progress::Advanced));
        assert_eq!(player.step_forward(), Ok(Progress::Advanced));
        assert_eq!(player.phase(), Some(Phase::Search));
        assert_eq!(player.cursor(), Some(2));

        assert_eq!(player.step_forward(), Ok(Progress::Advanced));
        assert_eq!(player.phase(), Some(Phase::Path));
        assert_eq!(player.cursor(), Some(0));

        player.step_forward().unwrap();
        player.step_forward().unwrap();
        assert_eq!(player.phase(), Some(Phase::Path));

        let summary = match player.step_forward() {
            Ok(Progress::Completed(summary)) => summary,
            other => panic!("expected completion, got {:?}", other),
        };
        assert!(summary.path_found);
        assert_eq!(summary.path_length, 3);
        assert_eq!(summary.nodes_explored, 3);
        assert_eq!(summary.cost, Some(2.0));
        assert_eq!(player.state(), PlaybackState::Completed);
        assert_eq!(player.summary(), Some(summary));
        assert_eq!(player.renderer().emissions, expected(&three_by_three()));
    }

    #[test]
    fn empty_path_completes_with_last_search_event() {
        let mut player = controller();
        player.load(sample_trace(2, 0)).unwrap();

        assert_eq!(player.step_forward(), Ok(Progress::Advanced));
        match player.step_forward() {
            Ok(Progress::Completed(summary)) => assert!(!summary.path_found),
            other => panic!("expected completion, got {:?}", other),
        }
        assert_eq!(
            player.renderer().emissions,
            vec![
                Emission::Search((0, 0)),
                Emission::Search((0, 1)),
                Emission::Complete(false)
            ]
        );
    }

    #[test]
    fn empty_trace_completes_on_first_step() {
        let mut player = controller();
        player.load(sample_trace(0, 0)).unwrap();
        assert!(matches!(player.step_forward(), Ok(Progress::Completed(_))));
        assert_eq!(player.renderer().emissions, vec![Emission::Complete(false)]);
    }

    #[test]
    fn path_without_events_starts_on_path() {
        let mut player = controller();
        player.load(sample_trace(0, 2)).unwrap();
        player.step_forward().unwrap();
        assert_eq!(player.phase(), Some(Phase::Path));
        assert_eq!(player.renderer().emissions, vec![Emission::Path((1, 0))]);
    }

    #[test]
    fn idle_and_completed_steps_are_no_ops() {
        let mut player = controller();
        assert_eq!(player.step_forward(), Ok(Progress::Nothing));
        assert_eq!(player.state(), PlaybackState::Idle);

        player.load(sample_trace(1, 1)).unwrap();
        while player.state() != PlaybackState::Completed {
            player.step_forward().unwrap();
        }
        let before = player.renderer().emissions.clone();

        assert_eq!(player.step_forward(), Ok(Progress::Nothing));
        assert_eq!(player.state(), PlaybackState::Completed);
        assert_eq!(player.renderer().emissions, before);
    }

    #[test]
    fn stepping_while_playing_is_refused() {
        let mut player = controller();
        player.load(sample_trace(3, 1)).unwrap();
        player.resume().unwrap();

        assert_eq!(
            player.step_forward(),
            Err(PlaybackError::invalid("step_forward", PlaybackState::Playing))
        );
        assert_eq!(player.cursor(), Some(0));
        assert!(player.renderer().emissions.is_empty());
    }

    #[test]
    fn resume_and_pause_guard_their_states() {
        let mut player = controller();
        assert!(player.resume().is_err());
        assert!(!player.pause());

        player.load(sample_trace(3, 1)).unwrap();
        let ticket = player.resume().unwrap();
        assert!(player.resume().is_err());
        assert!(player.pause());
        assert!(!player.pause());
        assert!(!player.is_current(ticket));
        assert_eq!(player.advance(ticket), Progress::Nothing);
        assert_eq!(player.state(), PlaybackState::Paused);
    }

    #[test]
    fn newer_resume_supersedes_older_ticket() {
        let mut player = controller();
        player.load(sample_trace(3, 1)).unwrap();

        let old = player.resume().unwrap();
        player.pause();
        let new = player.resume().unwrap();

        assert_eq!(player.next_delay(old), None);
        assert_eq!(player.next_delay(new), Some(Duration::from_millis(10)));
        assert_eq!(player.advance(old), Progress::Nothing);
        assert_eq!(player.advance(new), Progress::Advanced);
        assert_eq!(player.renderer().emissions.len(), 1);
    }

    #[test]
    fn load_replaces_session_and_invalidates_autoplay() {
        let mut player = controller();
        player.load(sample_trace(3, 1)).unwrap();
        let ticket = player.resume().unwrap();
        player.advance(ticket);

        player.load(sample_trace(2, 2)).unwrap();
        assert_eq!(player.state(), PlaybackState::Paused);
        assert_eq!(player.cursor(), Some(0));
        assert_eq!(player.advance(ticket), Progress::Nothing);
        assert_eq!(player.renderer().emissions.len(), 1);
        assert_eq!(player.renderer().loads, 2);
    }

    #[test]
    fn invalid_trace_keeps_previous_state() {
        let mut player = controller();
        let mut trace = sample_trace(2, 0);
        trace.events.push(TraceEvent::Uninformed {
            position: (25, 0),
            g: 0.0,
        });

        assert!(player.load(trace).is_err());
        assert_eq!(player.state(), PlaybackState::Idle);
        assert!(player.session().is_none());
        assert_eq!(player.renderer().loads, 0);
    }

    #[test]
    fn invalid_trace_still_cancels_autoplay() {
        let mut player = controller();
        player.load(sample_trace(3, 1)).unwrap();
        let ticket = player.resume().unwrap();
        player.advance(ticket);

        let mut trace = sample_trace(1, 0);
        trace.path.push((0, 99));
        assert!(player.load(trace).is_err());

        assert!(!player.is_current(ticket));
        assert_eq!(player.advance(ticket), Progress::Nothing);
        assert_eq!(player.state(), PlaybackState::Paused);
        assert_eq!(player.cursor(), Some(1));
        assert_eq!(player.renderer().loads, 1);

        player.step_forward().unwrap();
        assert_eq!(player.cursor(), Some(2));
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut player = controller();
        player.load(sample_trace(3, 1)).unwrap();
        let ticket = player.resume().unwrap();

        player.reset();
        assert_eq!(player.state(), PlaybackState::Idle);
        assert!(player.session().is_none());
        assert_eq!(player.advance(ticket), Progress::Nothing);
        assert_eq!(player.step_forward(), Ok(Progress::Nothing));
    }

    #[test]
    fn delays_follow_phase() {
        let config = PlaybackConfig::from_slider(151);
        assert_eq!(config.path_delay_ms, 50);
        assert_eq!(config.search_delay_ms, 10);
        assert_eq!(config.delay_for(Phase::Path), Duration::from_millis(50));
        assert_eq!(PlaybackConfig::from_slider(0).path_delay_ms, 200);
        assert_eq!(PlaybackConfig::from_slider(500).path_delay_ms, 1);
        assert_eq!(PlaybackConfig::default(), PlaybackConfig::from_speed(50));
    }

    #[test]
    fn remaining_counts_down() {
        let mut player = controller();
        player.load(sample_trace(2, 2)).unwrap();
        assert_eq!(player.session().unwrap().remaining(), 4);
        player.step_forward().unwrap();
        player.step_forward().unwrap();
        assert_eq!(player.session().unwrap().remaining(), 2);
    }
}
