//! Step playback: [`AnimationPlayer`] replays solver steps onto a grid.
//!
//! The player does no scheduling itself. [`start`](AnimationPlayer::start)
//! and [`tick`](AnimationPlayer::tick) hand back the next [`Tick`] to arm;
//! the application turns it into a timer command and feeds the resulting
//! message back. Tests can therefore single-step playback synchronously.

use std::time::Duration;

use pathviz_core::{Context, Point};

use crate::model::GridModel;
use crate::step::Step;

/// Playback state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Complete,
}

/// Identifies one chain of ticks. Every `start` and `cancel` begins a new
/// chain, so ticks left over from an earlier one are ignored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct ChainId(u64);

/// A tick to schedule: deliver `chain` back to [`AnimationPlayer::tick`]
/// after `delay`, unless `ctx` was cancelled meanwhile.
#[derive(Clone, Debug)]
pub struct Tick {
    pub chain: ChainId,
    pub delay: Duration,
    pub ctx: Context,
}

/// What a tick did.
#[derive(Clone, Debug)]
pub enum TickOutcome {
    /// Stale chain, or not playing. Nothing changed.
    Ignored,
    /// The cursor was already past the last step. Nothing changed.
    Exhausted,
    /// A frame was shown; schedule the returned tick.
    Continue(Tick),
    /// The final frame was shown; playback is complete.
    Completed,
}

// ---------------------------------------------------------------------------
// Speed
// ---------------------------------------------------------------------------

/// Playback speed level, `1..=10`. Higher is faster.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Speed(u8);

impl Speed {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    pub const DEFAULT: Self = Self(5);

    /// A speed level, clamped to `1..=10`.
    pub fn new(level: i32) -> Self {
        Self(level.clamp(Self::MIN as i32, Self::MAX as i32) as u8)
    }

    #[inline]
    pub fn level(self) -> u8 {
        self.0
    }

    /// Delay between frames: `110 - 10 * level` milliseconds.
    pub fn delay(self) -> Duration {
        Duration::from_millis(110 - 10 * u64::from(self.0))
    }

    pub fn faster(self) -> Self {
        Self::new(i32::from(self.0) + 1)
    }

    pub fn slower(self) -> Self {
        Self::new(i32::from(self.0) - 1)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ---------------------------------------------------------------------------
// AnimationPlayer
// ---------------------------------------------------------------------------

/// Replays a step sequence onto a [`GridModel`], one step per tick.
#[derive(Debug, Default)]
pub struct AnimationPlayer {
    steps: Vec<Step>,
    cursor: usize,
    state: PlaybackState,
    speed: Speed,
    chain: ChainId,
    ctx: Context,
    current: Option<Point>,
}

impl AnimationPlayer {
    pub fn new(speed: Speed) -> Self {
        Self {
            speed,
            ..Self::default()
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// Takes effect from the next scheduled tick.
    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    /// Index of the next step to show.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The node being expanded in the frame on screen. Drawn on top of the
    /// grid but never stored in it.
    pub fn current_node(&self) -> Option<Point> {
        self.current
    }

    pub fn chain(&self) -> ChainId {
        self.chain
    }

    fn next_chain(&mut self) {
        self.ctx.cancel();
        self.ctx = Context::new();
        self.chain = ChainId(self.chain.0.wrapping_add(1));
    }

    /// Replace any running playback with `steps` and return the first tick,
    /// due immediately.
    pub fn start(&mut self, steps: Vec<Step>) -> Tick {
        self.next_chain();
        log::debug!("playback {:?}: {} steps", self.chain, steps.len());
        self.steps = steps;
        self.cursor = 0;
        self.current = None;
        self.state = PlaybackState::Playing;
        Tick {
            chain: self.chain,
            delay: Duration::ZERO,
            ctx: self.ctx.clone(),
        }
    }

    /// Show the next step on `grid`.
    pub fn tick(&mut self, chain: ChainId, grid: &mut GridModel) -> TickOutcome {
        if chain != self.chain || self.state != PlaybackState::Playing {
            log::debug!("stale tick {chain:?} ignored");
            return TickOutcome::Ignored;
        }
        let Some(step) = self.steps.get(self.cursor) else {
            return TickOutcome::Exhausted;
        };
        grid.apply_step(step);
        self.current = Some(step.current_node);
        self.cursor += 1;
        if step.is_complete {
            self.state = PlaybackState::Complete;
            self.ctx.cancel();
            log::debug!("playback {:?} complete after {} steps", self.chain, self.cursor);
            return TickOutcome::Completed;
        }
        TickOutcome::Continue(Tick {
            chain: self.chain,
            delay: self.speed.delay(),
            ctx: self.ctx.clone(),
        })
    }

    /// Stop playback. Flags already applied to the grid stay; the overlay
    /// is dropped.
    pub fn cancel(&mut self) {
        if self.state != PlaybackState::Idle {
            log::debug!("playback {:?} cancelled at {}", self.chain, self.cursor);
        }
        self.next_chain();
        self.state = PlaybackState::Idle;
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GridSize;

    fn step(x: i32, closed: &[Point]) -> Step {
        Step {
            current_node: Point::new(x, 1),
            closed_set: closed.to_vec(),
            open_set: vec![Point::new(x + 1, 1)],
            ..Step::default()
        }
    }

    fn straight_path(n: i32) -> Vec<Point> {
        let mut path: Vec<Point> = (1..n - 1).map(|x| Point::new(x, 1)).collect();
        path.extend((2..n - 1).map(|y| Point::new(n - 2, y)));
        path
    }

    fn run(player: &mut AnimationPlayer, grid: &mut GridModel, first: Tick) -> (usize, usize) {
        let mut shown = 0;
        let mut completions = 0;
        let mut next = Some(first);
        while let Some(tick) = next.take() {
            assert!(!tick.ctx.is_done());
            match player.tick(tick.chain, grid) {
                TickOutcome::Continue(t) => {
                    shown += 1;
                    next = Some(t);
                }
                TickOutcome::Completed => {
                    shown += 1;
                    completions += 1;
                    assert!(tick.ctx.is_done());
                }
                TickOutcome::Ignored | TickOutcome::Exhausted => {}
            }
        }
        (shown, completions)
    }

    #[test]
    fn speed_delay() {
        assert_eq!(Speed::new(1).delay(), Duration::from_millis(100));
        assert_eq!(Speed::new(10).delay(), Duration::from_millis(10));
        assert_eq!(Speed::new(0).level(), 1);
        assert_eq!(Speed::new(42).level(), 10);
        assert_eq!(Speed::new(10).faster().level(), 10);
        assert_eq!(Speed::new(1).slower().level(), 1);
    }

    #[test]
    fn completes_exactly_once() {
        let mut grid = GridModel::default();
        let mut player = AnimationPlayer::new(Speed::new(10));
        let mut steps = vec![step(1, &[]), step(2, &[Point::new(1, 1)])];
        steps.push(Step {
            is_complete: true,
            path: Some(vec![Point::new(1, 1)]),
            ..Step::default()
        });
        // trailing steps after the complete one are never shown
        steps.push(step(9, &[]));
        let first = player.start(steps);
        assert_eq!(first.delay, Duration::ZERO);
        let (shown, completions) = run(&mut player, &mut grid, first.clone());
        assert_eq!((shown, completions), (3, 1));
        assert_eq!(player.state(), PlaybackState::Complete);
        assert_eq!(player.cursor(), 3);
        // a late duplicate tick does nothing
        assert!(matches!(
            player.tick(first.chain, &mut grid),
            TickOutcome::Ignored
        ));
    }

    #[test]
    fn exhausted_sequence_stops_silently() {
        let mut grid = GridModel::default();
        let mut player = AnimationPlayer::default();
        let tick = player.start(vec![step(1, &[])]);
        let next = match player.tick(tick.chain, &mut grid) {
            TickOutcome::Continue(t) => t,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(next.delay, Speed::DEFAULT.delay());
        assert!(matches!(
            player.tick(next.chain, &mut grid),
            TickOutcome::Exhausted
        ));
        assert_eq!(player.state(), PlaybackState::Playing);
    }

    #[test]
    fn restart_invalidates_old_chain() {
        let mut grid = GridModel::default();
        let mut player = AnimationPlayer::default();
        let old = player.start(vec![step(1, &[]), step(2, &[])]);
        let new = player.start(vec![step(5, &[Point::new(5, 5)])]);
        assert!(old.ctx.is_done());
        assert!(!new.ctx.is_done());
        assert!(matches!(player.tick(old.chain, &mut grid), TickOutcome::Ignored));
        assert!(matches!(player.tick(new.chain, &mut grid), TickOutcome::Continue(_)));
        assert_eq!(player.current_node(), Some(Point::new(5, 1)));
        assert!(grid.node(Point::new(5, 5)).unwrap().visited);
    }

    #[test]
    fn full_path_scenario() {
        let mut grid = GridModel::new(GridSize::new(30).unwrap());
        let path = straight_path(30);
        assert_eq!(path.first(), Some(&Point::new(1, 1)));
        assert_eq!(path.last(), Some(&Point::new(28, 28)));
        let steps = vec![
            step(1, &[Point::new(1, 1)]),
            Step {
                current_node: Point::new(28, 28),
                closed_set: path.clone(),
                path: Some(path.clone()),
                is_complete: true,
                ..Step::default()
            },
        ];
        let mut player = AnimationPlayer::default();
        let first = player.start(steps);
        run(&mut player, &mut grid, first);
        for p in &path[1..path.len() - 1] {
            assert!(grid.node(*p).unwrap().is_path, "{p}");
        }
        assert!(grid.is_start(Point::new(1, 1)));
        assert!(grid.is_end(Point::new(28, 28)));
        assert!(!grid.node(Point::new(1, 1)).unwrap().is_path);
        assert!(!grid.node(Point::new(28, 28)).unwrap().is_path);
        grid.check_invariants().unwrap();
    }

    #[test]
    fn cancel_then_clear_resets_transient_flags() {
        let mut grid = GridModel::default();
        grid.toggle_wall(Point::new(10, 10));
        let structure: Vec<_> = grid
            .nodes()
            .map(|n| (n.is_wall, n.is_start, n.is_end))
            .collect();
        let mut player = AnimationPlayer::default();
        let tick = player.start(vec![
            step(2, &[Point::new(2, 1), Point::new(3, 3)]),
            step(3, &[]),
        ]);
        assert!(matches!(player.tick(tick.chain, &mut grid), TickOutcome::Continue(_)));
        player.cancel();
        assert_eq!(player.state(), PlaybackState::Idle);
        assert!(tick.ctx.is_done());
        assert_eq!(player.current_node(), None);
        // cancel leaves the frame on the grid
        assert!(grid.node(Point::new(3, 3)).unwrap().visited);
        grid.clear_visualization();
        assert!(grid.nodes().all(|n| !n.is_path && !n.visited && !n.in_open_set));
        let after: Vec<_> = grid
            .nodes()
            .map(|n| (n.is_wall, n.is_start, n.is_end))
            .collect();
        assert_eq!(structure, after);
    }
}
