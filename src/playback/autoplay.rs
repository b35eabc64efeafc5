use crate::playback::{AutoplayTicket, PlaybackController, Progress, Renderer};
use crate::trace::Summary;
use futures::future::{self, Ready};
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};
use std::time::Duration;

pub trait Clock {
    type Sleep: Future<Output = ()>;

    fn sleep(&self, duration: Duration) -> Self::Sleep;
}

/// Blocks the calling thread for each delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadClock;

impl Clock for ThreadClock {
    type Sleep = Ready<()>;

    fn sleep(&self, duration: Duration) -> Self::Sleep {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
        future::ready(())
    }
}

/// Virtual time for headless runs: sleeps resolve only once `advance` has
/// moved the clock past their deadline.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    inner: Rc<RefCell<ManualTime>>,
}

#[derive(Debug, Default)]
struct ManualTime {
    now: Duration,
    sleepers: Vec<Waker>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    pub fn advance(&self, by: Duration) {
        let sleepers = {
            let mut time = self.inner.borrow_mut();
            time.now += by;
            std::mem::take(&mut time.sleepers)
        };

        for waker in sleepers {
            waker.wake();
        }
    }
}

pub struct ManualSleep {
    inner: Rc<RefCell<ManualTime>>,
    deadline: Duration,
}

impl Future for ManualSleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut time = self.inner.borrow_mut();
        if time.now >= self.deadline {
            Poll::Ready(())
        } else {
            time.sleepers.push(cx.waker().clone());
            Poll::Pending
        }
    }
}

impl Clock for ManualClock {
    type Sleep = ManualSleep;

    fn sleep(&self, duration: Duration) -> Self::Sleep {
        ManualSleep {
            deadline: self.now() + duration,
            inner: Rc::clone(&self.inner),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AutoplayOutcome {
    /// The ticket was superseded by a pause, reset, load or newer resume.
    Halted,
    Completed(Summary),
}

/// Drives `controller` until the replay completes or `ticket` goes stale.
pub async fn autoplay<R, C>(
    controller: &RefCell<PlaybackController<R>>,
    ticket: AutoplayTicket,
    clock: &C,
) -> AutoplayOutcome
where
    R: Renderer,
    C: Clock,
{
    loop {
        let delay = controller.borrow().next_delay(ticket);
        let delay = match delay {
            Some(delay) => delay,
            None => return AutoplayOutcome::Halted,
        };

        clock.sleep(delay).await;

        let progress = controller.borrow_mut().advance(ticket);
        match progress {
            Progress::Advanced => continue,
            Progress::Nothing => {
                log::debug!("autoplay halted at delay boundary");
                return AutoplayOutcome::Halted;
            }
            Progress::Completed(summary) => return AutoplayOutcome::Completed(summary),
        }
    }
}

#[cfg(test)]
mod test_autoplay {
    use super::*;
    use crate::playback::test_support::*;
    use crate::playback::{PlaybackConfig, PlaybackState};
    use futures::executor::block_on;
    use futures::FutureExt;
    use proptest::prelude::*;

    const SEARCH: Duration = Duration::from_millis(10);
    const PATH: Duration = Duration::from_millis(50);

    fn shared(events: usize, path: usize) -> RefCell<PlaybackController<Recorder>> {
        let mut player = PlaybackController::new(Recorder::default(), PlaybackConfig::default());
        player.load(sample_trace(events, path)).unwrap();
        RefCell::new(player)
    }

    #[test]
    fn plays_to_completion() {
        let player = shared(4, 3);
        let ticket = player.borrow_mut().resume().unwrap();

        let outcome = block_on(autoplay(&player, ticket, &ThreadClock));
        let summary = match outcome {
            AutoplayOutcome::Completed(summary) => summary,
            AutoplayOutcome::Halted => panic!("autoplay halted early"),
        };

        assert_eq!(summary.path_length, 3);
        let player = player.into_inner();
        assert_eq!(player.state(), PlaybackState::Completed);
        assert_eq!(player.renderer().emissions, expected(&sample_trace(4, 3)));
    }

    #[test]
    fn one_emission_per_delay() {
        let player = shared(2, 2);
        let clock = ManualClock::new();
        let ticket = player.borrow_mut().resume().unwrap();
        let mut play = Box::pin(autoplay(&player, ticket, &clock));

        assert!((&mut play).now_or_never().is_none());
        assert!(player.borrow().renderer().emissions.is_empty());

        clock.advance(SEARCH);
        assert!((&mut play).now_or_never().is_none());
        assert_eq!(player.borrow().renderer().emissions.len(), 1);

        clock.advance(SEARCH);
        assert!((&mut play).now_or_never().is_none());
        assert_eq!(player.borrow().renderer().emissions.len(), 2);

        // path steps wait longer
        clock.advance(SEARCH);
        assert!((&mut play).now_or_never().is_none());
        assert_eq!(player.borrow().renderer().emissions.len(), 2);

        clock.advance(PATH);
        assert!((&mut play).now_or_never().is_none());
        clock.advance(PATH);
        match (&mut play).now_or_never() {
            Some(AutoplayOutcome::Completed(summary)) => assert!(summary.path_found),
            other => panic!("expected completion, got {:?}", other),
        }
    }

    #[test]
    fn pause_stops_at_boundary_and_step_continues() {
        let player = shared(5, 2);
        let clock = ManualClock::new();
        let ticket = player.borrow_mut().resume().unwrap();
        let mut play = Box::pin(autoplay(&player, ticket, &clock));

        assert!((&mut play).now_or_never().is_none());
        clock.advance(SEARCH);
        assert!((&mut play).now_or_never().is_none());
        clock.advance(SEARCH);
        assert!((&mut play).now_or_never().is_none());

        assert!(player.borrow_mut().pause());
        clock.advance(SEARCH);
        assert_eq!((&mut play).now_or_never(), Some(AutoplayOutcome::Halted));
        assert_eq!(player.borrow().cursor(), Some(2));

        player.borrow_mut().step_forward().unwrap();
        assert_eq!(player.borrow().cursor(), Some(3));

        let ticket = player.borrow_mut().resume().unwrap();
        let outcome = block_on(autoplay(&player, ticket, &ThreadClock));
        assert!(matches!(outcome, AutoplayOutcome::Completed(_)));
        assert_eq!(
            player.borrow().renderer().emissions,
            expected(&sample_trace(5, 2))
        );
    }

    #[test]
    fn load_cancels_pending_emission() {
        let player = shared(3, 1);
        let clock = ManualClock::new();
        let ticket = player.borrow_mut().resume().unwrap();
        let mut play = Box::pin(autoplay(&player, ticket, &clock));
        assert!((&mut play).now_or_never().is_none());

        player.borrow_mut().load(sample_trace(2, 1)).unwrap();
        clock.advance(Duration::from_secs(1));

        assert_eq!((&mut play).now_or_never(), Some(AutoplayOutcome::Halted));
        assert!(player.borrow().renderer().emissions.is_empty());
        assert_eq!(player.borrow().state(), PlaybackState::Paused);
    }

    #[test]
    fn reset_cancels_pending_emission() {
        let player = shared(3, 1);
        let clock = ManualClock::new();
        let ticket = player.borrow_mut().resume().unwrap();
        let mut play = Box::pin(autoplay(&player, ticket, &clock));
        assert!((&mut play).now_or_never().is_none());

        player.borrow_mut().reset();
        clock.advance(SEARCH);
        assert_eq!((&mut play).now_or_never(), Some(AutoplayOutcome::Halted));
        assert!(player.borrow().renderer().emissions.is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Step,
        /// Resume, let this many delays pass, then pause.
        Play(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![Just(Op::Step), (0usize..6).prop_map(Op::Play)]
    }

    proptest! {
        #[test]
        fn any_interleaving_matches_trace_order(
            events in 0usize..12,
            path in 0usize..6,
            ops in proptest::collection::vec(op(), 0..20),
        ) {
            let trace = sample_trace(events, path);
            let player = shared(events, path);
            let clock = ManualClock::new();

            for op in ops {
                if player.borrow().state() == PlaybackState::Completed {
                    break;
                }
                match op {
                    Op::Step => {
                        player.borrow_mut().step_forward().unwrap();
                    }
                    Op::Play(delays) => {
                        let ticket = player.borrow_mut().resume().unwrap();
                        let mut play = Box::pin(autoplay(&player, ticket, &clock));
                        let mut finished = (&mut play).now_or_never().is_some();
                        for _ in 0..delays {
                            if finished {
                                break;
                            }
                            clock.advance(PATH);
                            finished = (&mut play).now_or_never().is_some();
                        }
                        if !finished {
                            player.borrow_mut().pause();
                        }
                    }
                }
            }

            while player.borrow().state() != PlaybackState::Completed {
                player.borrow_mut().step_forward().unwrap();
            }

            let emitted = player.borrow().renderer().emissions.clone();
            prop_assert_eq!(&emitted, &expected(&trace));
        }
    }
}
