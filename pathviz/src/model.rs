//! Elm-architecture Model implementation.

use std::sync::Arc;
use std::time::Duration;

use pathviz_core::{
    AttrMask, Context, Effect, Grid, Key, ModMask, Model, Msg, Point, Range, Style, cmd, timer,
};
use pathviz_grid::{
    AnimationPlayer, ChainId, Command, GridCanvas, GridModel, GridSize, InputController, Layout,
    Palette, Tick, TickOutcome, render,
};
use pathviz_solver::{Heuristic, SolveRequest, SolveResponse, Solver, SolverError};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::colors::*;
use crate::config::Config;
use crate::status::{Severity, Stats, Status, ToastId, Toasts};

pub const UI_WIDTH: i32 = 100;
pub const UI_HEIGHT: i32 = 36;

/// Grid size step for the `g`/`G` keys.
const SIZE_STEP: i32 = 5;

/// Where the grid's top-left cell is drawn.
const GRID_ORIGIN: Point = Point::new(1, 2);

/// Columns between the grid's right edge and the side panel.
const PANEL_GAP: i32 = 2;

/// Columns kept free for the side panel.
const PANEL_WIDTH: i32 = 30;

/// Rows below the grid: mouse hint and key help.
const FOOTER_HEIGHT: i32 = 2;

const HELP_LINE: &str = "space find  r reset  c clear path  w clear walls  m maze  \
g/G size  +/- speed  h heuristic  a animate  q quit";

const MOUSE_HINT: &str = "left drag: walls  right: start  ctrl+left: end";

/// The largest grid that fits a `screen`-sized terminal together with the
/// header, side panel and footer, or `None` if not even the smallest does.
pub fn fitting_size(screen: Point) -> Option<GridSize> {
    let cell_width = Layout::new(GRID_ORIGIN).cell_width;
    let rows = screen.y - GRID_ORIGIN.y - FOOTER_HEIGHT;
    let cols = (screen.x - GRID_ORIGIN.x - PANEL_GAP - PANEL_WIDTH) / cell_width;
    GridSize::new(rows.min(cols).min(GridSize::MAX)).ok()
}

/// The smallest terminal [`fitting_size`] accepts.
pub fn min_screen() -> Point {
    let cell_width = Layout::new(GRID_ORIGIN).cell_width;
    Point::new(
        GRID_ORIGIN.x + GridSize::MIN * cell_width + PANEL_GAP + PANEL_WIDTH,
        GRID_ORIGIN.y + GridSize::MIN + FOOTER_HEIGHT,
    )
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// A solver round trip finished.
struct SolveFinished {
    epoch: u64,
    result: Result<SolveResponse, SolverError>,
}

#[derive(Debug, Clone, Copy)]
struct AnimationTick(ChainId);

#[derive(Debug, Clone, Copy)]
struct ToastExpired(ToastId);

// ---------------------------------------------------------------------------
// VisualizerModel
// ---------------------------------------------------------------------------

/// Settings the user can change while the app runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub heuristic: Heuristic,
    pub animate: bool,
    pub maze_density: f64,
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            heuristic: config.animation.heuristic,
            animate: config.animation.enabled,
            maze_density: config.grid.maze_density,
        }
    }
}

/// The pathviz model: one grid, its playback, and the panels around it.
pub struct VisualizerModel {
    grid: GridModel,
    player: AnimationPlayer,
    input: InputController,
    layout: Layout,
    palette: Palette,
    solver: Arc<dyn Solver>,
    settings: Settings,
    status: Status,
    toasts: Toasts,
    stats: Option<Stats>,
    /// A solve command is running; find-path is disabled.
    in_flight: bool,
    /// Bumped on every grid rebuild so that replies for an older grid are
    /// dropped.
    epoch: u64,
    /// Terminal size in cells.
    screen: Point,
    rng: StdRng,
}

impl VisualizerModel {
    /// A model for a [`UI_WIDTH`]×[`UI_HEIGHT`] screen. The configured grid
    /// size is reduced if it does not fit.
    pub fn new(config: &Config, solver: Arc<dyn Solver>) -> Self {
        let mut model = Self {
            grid: GridModel::new(config.grid_size()),
            player: AnimationPlayer::new(config.speed()),
            input: InputController::new(),
            layout: Layout::new(GRID_ORIGIN),
            palette: Palette::default(),
            solver,
            settings: Settings::from(config),
            status: Status::Ready,
            toasts: Toasts::new(Duration::from_millis(config.ui.toast_ms)),
            stats: None,
            in_flight: false,
            epoch: 0,
            screen: Point::new(UI_WIDTH, UI_HEIGHT),
            rng: StdRng::from_os_rng(),
        };
        model.set_screen(UI_WIDTH, UI_HEIGHT);
        model
    }

    /// Start on a `width`×`height` terminal.
    pub fn with_screen(mut self, width: i32, height: i32) -> Self {
        self.set_screen(width, height);
        self
    }

    /// Use a fixed seed for maze generation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn player(&self) -> &AnimationPlayer {
        &self.player
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn stats(&self) -> Option<Stats> {
        self.stats
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn is_searching(&self) -> bool {
        self.in_flight
    }

    pub fn screen(&self) -> Point {
        self.screen
    }
}

impl Model for VisualizerModel {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        match msg {
            Msg::Init => {
                log::info!(
                    "pathviz started: {}x{} grid, {}",
                    self.grid.width(),
                    self.grid.height(),
                    self.settings.heuristic
                );
                None
            }
            Msg::Quit => Some(Effect::End),
            Msg::Screen { width, height, .. } => {
                self.set_screen(width, height);
                None
            }
            Msg::KeyDown { key, modifiers, .. } => self.handle_key(key, modifiers),
            Msg::Mouse {
                action,
                pos,
                modifiers,
                ..
            } if fitting_size(self.screen).is_some() => match self
                .input
                .mouse(&mut self.grid, &self.layout, action, pos, modifiers)
            {
                Some(Err(e)) => Some(self.toast(e.to_string(), Severity::Error)),
                _ => None,
            },
            Msg::Mouse { .. } => None,
            Msg::Custom(_) => {
                if let Some(done) = msg.downcast_ref::<SolveFinished>() {
                    self.on_solve_finished(done)
                } else if let Some(&AnimationTick(chain)) = msg.downcast_ref() {
                    self.on_tick(chain)
                } else if let Some(&ToastExpired(id)) = msg.downcast_ref() {
                    self.toasts.expire(id);
                    None
                } else {
                    None
                }
            }
        }
    }

    fn draw(&self, grid: &mut Grid) {
        if fitting_size(grid.size()).is_none() {
            self.draw_too_small(grid);
            return;
        }
        self.draw_header(grid);
        render(
            &self.grid,
            self.player.current_node(),
            &self.palette,
            &mut GridCanvas::new(grid, self.layout),
        );
        self.draw_panel(grid);
        self.draw_footer(grid);
    }
}

impl VisualizerModel {
    // -------------------------------------------------------------------
    // Update
    // -------------------------------------------------------------------

    fn handle_key(&mut self, key: Key, modifiers: ModMask) -> Option<Effect> {
        if modifiers.contains(ModMask::CTRL) {
            return match key {
                Key::Char('c') => Some(Effect::End),
                _ => None,
            };
        }
        let command = Command::from_key(&key)?;
        log::debug!("command {command:?}");
        match command {
            Command::FindPath => self.find_path(),
            Command::Reset => {
                self.rebuild(self.grid.size());
                None
            }
            Command::ClearPath => {
                self.player.cancel();
                self.grid.clear_visualization();
                None
            }
            Command::ClearWalls => {
                self.grid.clear_walls();
                None
            }
            Command::GenerateMaze => {
                self.player.cancel();
                self.grid.clear_visualization();
                self.grid
                    .generate_maze(self.settings.maze_density, &mut self.rng);
                Some(self.toast("Random maze generated!", Severity::Info))
            }
            Command::NextSize => self.step_size(SIZE_STEP),
            Command::PrevSize => self.step_size(-SIZE_STEP),
            Command::SpeedUp => {
                self.player.set_speed(self.player.speed().faster());
                None
            }
            Command::SpeedDown => {
                self.player.set_speed(self.player.speed().slower());
                None
            }
            Command::CycleHeuristic => {
                self.settings.heuristic = self.settings.heuristic.next();
                None
            }
            Command::ToggleAnimate => {
                self.settings.animate = !self.settings.animate;
                None
            }
            Command::Quit => Some(Effect::End),
        }
    }

    /// Grow or shrink the grid by `delta`, staying within what fits on
    /// screen.
    fn step_size(&mut self, delta: i32) -> Option<Effect> {
        let Some(fit) = fitting_size(self.screen) else {
            log::debug!("size change ignored: terminal too small");
            return None;
        };
        let n = (self.grid.width() + delta).clamp(GridSize::MIN, fit.get());
        if let Some(size) = GridSize::new(n).ok().filter(|&s| s != self.grid.size()) {
            self.rebuild(size);
        }
        None
    }

    /// Record the terminal size and shrink the grid if it no longer fits.
    fn set_screen(&mut self, width: i32, height: i32) {
        self.screen = Point::new(width, height);
        match fitting_size(self.screen) {
            Some(fit) if self.grid.size() > fit => {
                log::info!(
                    "{width}x{height} terminal fits at most {0}x{0} cells",
                    fit.get()
                );
                self.rebuild(fit);
            }
            Some(_) => {}
            None => log::debug!("{width}x{height} terminal is too small"),
        }
    }

    /// Rebuild the grid at `size`, dropping playback, stats, and any reply
    /// still on its way.
    fn rebuild(&mut self, size: GridSize) {
        self.player.cancel();
        self.grid.resize(size);
        self.epoch += 1;
        self.stats = None;
        self.status = Status::Ready;
        log::info!("grid rebuilt at {0}x{0} (epoch {1})", size.get(), self.epoch);
    }

    fn find_path(&mut self) -> Option<Effect> {
        if self.in_flight {
            log::debug!("find path ignored: a search is running");
            return None;
        }
        self.player.cancel();
        self.grid.clear_visualization();

        let req = match SolveRequest::new(
            &self.grid,
            self.settings.heuristic,
            self.settings.animate,
        ) {
            Ok(req) => req,
            Err(e) => {
                log::debug!("find path rejected: {e}");
                return Some(self.toast(
                    "Please set different start and end points",
                    Severity::Error,
                ));
            }
        };

        self.in_flight = true;
        self.status = Status::Finding;
        let solver = Arc::clone(&self.solver);
        let epoch = self.epoch;
        Some(cmd(move || {
            let result = solver.solve(&req);
            Some(Msg::custom(SolveFinished { epoch, result }))
        }))
    }

    fn on_solve_finished(&mut self, done: &SolveFinished) -> Option<Effect> {
        self.in_flight = false;
        if done.epoch != self.epoch {
            log::warn!(
                "dropping solver reply for epoch {} (now {})",
                done.epoch,
                self.epoch
            );
            return None;
        }

        match &done.result {
            Ok(resp) if resp.success => {
                self.stats = Some(Stats {
                    path_length: resp.path_length,
                    nodes_explored: resp.nodes_explored,
                });
                self.status = Status::PathFound;
                let toast = self.toast("Path found successfully!", Severity::Success);
                let playback = if resp.steps.is_empty() {
                    self.grid.apply_result(&resp.path, &resp.explored_nodes);
                    None
                } else {
                    let tick = self.player.start(resp.steps.clone());
                    Some(schedule(tick))
                };
                Effect::merge(Some(toast), playback)
            }
            Ok(resp) => {
                self.stats = Some(Stats {
                    path_length: 0.0,
                    nodes_explored: resp.nodes_explored,
                });
                self.status = Status::NoPath;
                Some(self.toast(
                    "No path exists between start and end points",
                    Severity::Error,
                ))
            }
            Err(e) => {
                log::warn!("solver failed: {e}");
                self.status = Status::Error;
                Some(self.toast(format!("Error: {e}"), Severity::Error))
            }
        }
    }

    fn on_tick(&mut self, chain: ChainId) -> Option<Effect> {
        match self.player.tick(chain, &mut self.grid) {
            TickOutcome::Continue(tick) => Some(schedule(tick)),
            TickOutcome::Completed => {
                self.status = Status::AnimationComplete;
                None
            }
            TickOutcome::Ignored | TickOutcome::Exhausted => None,
        }
    }

    fn toast(&mut self, text: impl Into<String>, severity: Severity) -> Effect {
        let id = self.toasts.show(text, severity);
        timer(
            self.toasts.ttl(),
            Context::new(),
            Msg::custom(ToastExpired(id)),
        )
    }

    // -------------------------------------------------------------------
    // Draw
    // -------------------------------------------------------------------

    fn draw_header(&self, grid: &Grid) {
        let title = Style::default()
            .with_fg(FG_EMPH)
            .with_attrs(AttrMask::BOLD);
        let n = grid.draw_text(Point::new(1, 0), "pathviz", title);
        let status_fg = match self.status {
            Status::PathFound | Status::AnimationComplete => GREEN,
            Status::NoPath | Status::Error => RED,
            Status::Finding => YELLOW,
            Status::Ready => FG,
        };
        grid.draw_text(
            Point::new(1 + n + 2, 0),
            self.status.as_str(),
            Style::default().with_fg(status_fg),
        );
    }

    fn draw_panel(&self, grid: &Grid) {
        let x = self.layout.screen_of(Point::new(self.grid.width(), 0)).x + PANEL_GAP;
        let panel = grid.slice(Range::new(x, GRID_ORIGIN.y, grid.width(), grid.height()));
        let heading = Style::default().with_fg(FG_EMPH);
        let text = Style::default().with_fg(FG);
        let mut y = 0;
        let mut line = |s: &str, style: Style| {
            panel.draw_text(Point::new(0, y), s, style);
            y += 1;
        };

        line("Stats", heading);
        for l in Stats::lines(self.stats.as_ref(), self.settings.heuristic) {
            line(&l, text);
        }
        line("", text);
        line("Settings", heading);
        line(&format!("Size:      {0}x{0}", self.grid.width()), text);
        line(&format!("Speed:     {}", self.player.speed().level()), text);
        line(&format!("Heuristic: {}", self.settings.heuristic.label()), text);
        line(
            &format!("Animate:   {}", if self.settings.animate { "on" } else { "off" }),
            text,
        );
        line("", text);
        if self.in_flight {
            line("searching...", Style::default().with_fg(YELLOW));
        } else {
            line("", text);
        }
        if let Some(toast) = self.toasts.current() {
            line(&toast.text, Style::default().with_fg(severity_color(toast.severity)));
        }
    }

    fn draw_too_small(&self, grid: &Grid) {
        let need = min_screen();
        grid.draw_text(
            Point::ZERO,
            "Terminal too small",
            Style::default().with_fg(RED),
        );
        grid.draw_text(
            Point::new(0, 1),
            &format!("need {}x{}", need.x, need.y),
            Style::default().with_fg(FG),
        );
    }

    fn draw_footer(&self, grid: &Grid) {
        let dim = Style::default().with_fg(FG_DIM);
        let y = grid.height() - 1;
        grid.draw_text(Point::new(1, y - 1), MOUSE_HINT, dim);
        grid.draw_text(Point::new(1, y), HELP_LINE, dim);
    }
}

/// Turn a playback tick into a timer command.
fn schedule(tick: Tick) -> Effect {
    timer(tick.delay, tick.ctx, Msg::custom(AnimationTick(tick.chain)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathviz_core::MouseAction;
    use pathviz_grid::PlaybackState;
    use pathviz_solver::LocalSolver;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Reply =
        Box<dyn Fn(&SolveRequest) -> pathviz_solver::Result<SolveResponse> + Send + Sync>;

    /// Counts calls and answers with `reply`.
    struct FakeSolver {
        calls: AtomicUsize,
        reply: Reply,
    }

    impl FakeSolver {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply,
            })
        }

        fn local() -> Arc<Self> {
            Self::new(Box::new(|req: &SolveRequest| LocalSolver.solve(req)))
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Solver for FakeSolver {
        fn solve(&self, req: &SolveRequest) -> pathviz_solver::Result<SolveResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.reply)(req)
        }
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.grid.size = 10;
        config.animation.speed = 10;
        config.ui.toast_ms = 1;
        config
    }

    fn model(solver: Arc<FakeSolver>) -> VisualizerModel {
        VisualizerModel::new(&config(), solver).with_seed(3)
    }

    fn key(c: char) -> Msg {
        Msg::key(Key::Char(c))
    }

    /// Run `effect` to completion on this thread, feeding every message
    /// back into `m`. Toast expiry is left out so toasts can be inspected.
    fn drain(m: &mut VisualizerModel, effect: Option<Effect>) -> bool {
        let mut ended = false;
        let mut pending: Vec<Effect> = effect.into_iter().collect();
        while let Some(effect) = pending.pop() {
            match effect {
                Effect::Cmd(f) => {
                    if let Some(msg) = f() {
                        if msg.downcast_ref::<ToastExpired>().is_some() {
                            continue;
                        }
                        pending.extend(m.update(msg));
                    }
                }
                Effect::Batch(v) => pending.extend(v),
                Effect::End => ended = true,
            }
        }
        ended
    }

    fn send(m: &mut VisualizerModel, msg: Msg) -> bool {
        let effect = m.update(msg);
        drain(m, effect)
    }

    fn toast(m: &VisualizerModel) -> Option<(String, Severity)> {
        m.toasts().current().map(|t| (t.text.clone(), t.severity))
    }

    #[test]
    fn animated_search_completes() {
        let solver = FakeSolver::local();
        let mut m = model(solver.clone());
        send(&mut m, Msg::key(Key::Space));
        assert_eq!(solver.calls(), 1);
        assert!(!m.is_searching());
        assert_eq!(m.status(), Status::AnimationComplete);
        assert_eq!(m.player().state(), PlaybackState::Complete);
        let stats = m.stats().unwrap();
        assert_eq!(stats.path_length, 14.0);
        let path: Vec<_> = m.grid().nodes().filter(|n| n.is_path).collect();
        assert_eq!(path.len(), 13);
        assert!(m.grid().is_start(Point::new(1, 1)));
        assert!(m.grid().is_end(Point::new(8, 8)));
        assert_eq!(
            toast(&m),
            Some(("Path found successfully!".to_string(), Severity::Success))
        );
    }

    #[test]
    fn direct_result_without_animation() {
        let solver = FakeSolver::local();
        let mut m = model(solver);
        send(&mut m, key('a'));
        assert!(!m.settings().animate);
        send(&mut m, Msg::key(Key::Space));
        assert_eq!(m.status(), Status::PathFound);
        assert_eq!(m.player().state(), PlaybackState::Idle);
        assert_eq!(m.grid().nodes().filter(|n| n.is_path).count(), 13);
        assert!(m.grid().nodes().any(|n| n.visited));
    }

    #[test]
    fn same_markers_never_reach_solver() {
        let solver = FakeSolver::local();
        let mut m = model(solver.clone());
        // set_start/set_end refuse an overlap, so build one through serde
        let mut value = serde_json::to_value(m.grid()).unwrap();
        value["end"] = value["start"].clone();
        m.grid = serde_json::from_value(value).unwrap();
        send(&mut m, Msg::key(Key::Space));
        assert_eq!(solver.calls(), 0);
        assert!(!m.is_searching());
        assert_eq!(m.status(), Status::Ready);
        assert_eq!(
            toast(&m),
            Some((
                "Please set different start and end points".to_string(),
                Severity::Error
            ))
        );
    }

    #[test]
    fn no_path_reply() {
        let solver = FakeSolver::new(Box::new(|_: &SolveRequest| {
            Ok(SolveResponse {
                success: false,
                nodes_explored: 7,
                ..SolveResponse::default()
            })
        }));
        let mut m = model(solver);
        send(&mut m, Msg::key(Key::Space));
        assert_eq!(m.status(), Status::NoPath);
        assert_eq!(
            m.stats(),
            Some(Stats {
                path_length: 0.0,
                nodes_explored: 7
            })
        );
        assert_eq!(
            toast(&m),
            Some((
                "No path exists between start and end points".to_string(),
                Severity::Error
            ))
        );
        assert!(!m.is_searching());
    }

    #[test]
    fn solver_error_leaves_grid_alone() {
        let solver = FakeSolver::new(Box::new(|_: &SolveRequest| {
            Err(SolverError::Server("boom".into()))
        }));
        let mut m = model(solver);
        m.update(Msg::mouse(MouseAction::Main, Point::new(7, 5), ModMask::NONE));
        let before = m.grid().clone();
        send(&mut m, Msg::key(Key::Space));
        assert_eq!(m.status(), Status::Error);
        assert_eq!(m.grid(), &before);
        assert!(!m.is_searching());
        let (text, severity) = toast(&m).unwrap();
        assert_eq!(severity, Severity::Error);
        assert!(text.contains("boom"), "{text}");
    }

    #[test]
    fn only_one_search_at_a_time() {
        let solver = FakeSolver::local();
        let mut m = model(solver.clone());
        let first = m.update(Msg::key(Key::Space));
        assert!(first.is_some());
        assert!(m.is_searching());
        assert_eq!(m.status(), Status::Finding);
        assert!(m.update(Msg::key(Key::Space)).is_none());
        drain(&mut m, first);
        assert_eq!(solver.calls(), 1);
        assert!(!m.is_searching());
    }

    #[test]
    fn reply_for_rebuilt_grid_is_dropped() {
        let solver = FakeSolver::local();
        let mut m = model(solver.clone());
        let pending = m.update(Msg::key(Key::Space));
        send(&mut m, key('r'));
        drain(&mut m, pending);
        assert_eq!(solver.calls(), 1);
        assert!(!m.is_searching());
        assert_eq!(m.status(), Status::Ready);
        assert_eq!(m.stats(), None);
        assert!(m.grid().nodes().all(|n| !n.visited && !n.is_path));
    }

    #[test]
    fn reset_cancels_playback() {
        let solver = FakeSolver::local();
        let mut m = model(solver);
        // run the solve command by hand and stop after the first frame
        let Some(Effect::Cmd(solve)) = m.update(Msg::key(Key::Space)) else {
            panic!("expected a solve command");
        };
        let done = solve().unwrap();
        let Some(Effect::Batch(effects)) = m.update(done) else {
            panic!("expected toast and first tick");
        };
        let mut ticks: Vec<Msg> = effects
            .into_iter()
            .filter_map(|e| match e {
                Effect::Cmd(f) => f(),
                _ => None,
            })
            .filter(|msg| msg.downcast_ref::<AnimationTick>().is_some())
            .collect();
        let first = ticks.pop().unwrap();
        let next = m.update(first.clone());
        assert!(next.is_some());
        assert_eq!(m.player().state(), PlaybackState::Playing);
        assert!(m.grid().nodes().any(|n| n.visited || n.in_open_set));

        send(&mut m, key('r'));
        assert_eq!(m.player().state(), PlaybackState::Idle);
        assert_eq!(m.player().current_node(), None);
        // the armed tick was cancelled; a stray one is ignored
        if let Some(Effect::Cmd(f)) = next {
            assert!(f().is_none());
        }
        assert!(m.update(first).is_none());
        assert!(m.grid().nodes().all(|n| !n.visited && !n.in_open_set && !n.is_path));
    }

    #[test]
    fn clear_path_keeps_walls() {
        let solver = FakeSolver::local();
        let mut m = model(solver);
        m.update(Msg::mouse(MouseAction::Main, Point::new(9, 6), ModMask::NONE));
        m.update(Msg::mouse(MouseAction::Release, Point::new(9, 6), ModMask::NONE));
        assert!(m.grid().is_wall(Point::new(4, 4)));
        send(&mut m, Msg::key(Key::Space));
        send(&mut m, key('c'));
        assert!(m.grid().nodes().all(|n| !n.visited && !n.in_open_set && !n.is_path));
        assert!(m.grid().is_wall(Point::new(4, 4)));
        send(&mut m, key('w'));
        assert_eq!(m.grid().wall_count(), 0);
    }

    #[test]
    fn maze_and_sizes() {
        let solver = FakeSolver::local();
        let mut m = model(solver);
        send(&mut m, key('m'));
        assert!(m.grid().wall_count() > 0);
        assert_eq!(
            toast(&m),
            Some(("Random maze generated!".to_string(), Severity::Info))
        );
        m.grid().check_invariants().unwrap();

        send(&mut m, key('g'));
        assert_eq!(m.grid().width(), 15);
        assert_eq!(m.grid().wall_count(), 0);
        assert_eq!(m.grid().end(), Point::new(13, 13));
        send(&mut m, key('G'));
        send(&mut m, key('G'));
        assert_eq!(m.grid().width(), 5);
        send(&mut m, key('G'));
        assert_eq!(m.grid().width(), 5);
    }

    #[test]
    fn settings_keys() {
        let solver = FakeSolver::local();
        let mut m = model(solver);
        send(&mut m, key('-'));
        assert_eq!(m.player().speed().level(), 9);
        send(&mut m, key('+'));
        send(&mut m, key('+'));
        assert_eq!(m.player().speed().level(), 10);
        send(&mut m, key('h'));
        assert_eq!(m.settings().heuristic, Heuristic::Euclidean);
        assert!(send(&mut m, key('q')));
        assert!(send(&mut m, Msg::key_mod(Key::Char('c'), ModMask::CTRL)));
        assert!(send(&mut m, Msg::key(Key::Escape)));
    }

    #[test]
    fn marker_clicks() {
        let solver = FakeSolver::local();
        let mut m = model(solver);
        // screen (7, 5) is cell (3, 3)
        send(&mut m, Msg::mouse(MouseAction::Secondary, Point::new(7, 5), ModMask::NONE));
        assert_eq!(m.grid().start(), Point::new(3, 3));
        send(&mut m, Msg::mouse(MouseAction::Main, Point::new(7, 5), ModMask::CTRL));
        assert_eq!(m.grid().end(), Point::new(8, 8));
        let (_, severity) = toast(&m).unwrap();
        assert_eq!(severity, Severity::Error);
        m.grid().check_invariants().unwrap();
    }

    #[test]
    fn toast_expires() {
        let solver = FakeSolver::local();
        let mut m = model(solver);
        let Some(Effect::Cmd(expire)) = m.update(key('m')) else {
            panic!("expected toast timer");
        };
        assert!(m.toasts().current().is_some());
        let msg = expire().unwrap();
        m.update(msg);
        assert!(m.toasts().current().is_none());
    }

    fn row(screen: &Grid, y: i32) -> String {
        (0..screen.width())
            .map(|x| screen.at(Point::new(x, y)).ch)
            .collect()
    }

    #[test]
    fn configured_grid_shrinks_to_terminal() {
        let mut config = Config::default();
        config.animation.speed = 10;
        let m = VisualizerModel::new(&config, FakeSolver::local()).with_screen(80, 24);
        assert_eq!(m.grid().width(), 20);
        assert_eq!(m.grid().end(), Point::new(18, 18));

        let mut screen = Grid::new(80, 24);
        m.draw(&mut screen);
        let end = m.layout.screen_of(m.grid().end());
        assert!(screen.contains(end.shift(1, 0)), "{end}");
        assert_eq!(screen.at(end).style.bg, m.palette.end);
        assert!((0..24).any(|y| row(&screen, y).contains("Algorithm:   A* (Manhattan)")));
        assert!(row(&screen, 23).starts_with(" space find"));
    }

    #[test]
    fn size_keys_stop_at_terminal_edge() {
        let mut m = model(FakeSolver::local()).with_screen(80, 24);
        for _ in 0..20 {
            send(&mut m, key('g'));
        }
        assert_eq!(m.grid().width(), 20);
        let far = m.layout.screen_of(Point::new(19, 19));
        assert!(far.x + 1 < 80 - PANEL_WIDTH && far.y < 24 - FOOTER_HEIGHT);
        // the corner cell is still clickable
        send(&mut m, Msg::mouse(MouseAction::Main, far, ModMask::NONE));
        assert!(m.grid().is_wall(Point::new(19, 19)));
    }

    #[test]
    fn shrinking_terminal_rebuilds_grid() {
        let mut m = model(FakeSolver::local());
        send(&mut m, key('g'));
        send(&mut m, key('g'));
        assert_eq!(m.grid().width(), 20);
        send(&mut m, Msg::screen(60, 20));
        assert_eq!(m.grid().width(), 13);
        assert_eq!(m.grid().end(), Point::new(11, 11));
        assert_eq!(m.status(), Status::Ready);
        m.grid().check_invariants().unwrap();
        // growing the terminal keeps the grid
        send(&mut m, Msg::screen(120, 40));
        assert_eq!(m.grid().width(), 13);
    }

    #[test]
    fn tiny_terminal_shows_notice() {
        let mut m = model(FakeSolver::local());
        send(&mut m, Msg::screen(30, 8));
        assert_eq!(fitting_size(m.screen()), None);
        send(&mut m, key('g'));
        assert_eq!(m.grid().width(), 10);
        let click = Msg::mouse(MouseAction::Main, Point::new(3, 3), ModMask::NONE);
        assert!(m.update(click).is_none());
        assert_eq!(m.grid().wall_count(), 0);

        let mut screen = Grid::new(30, 8);
        m.draw(&mut screen);
        assert!(row(&screen, 0).starts_with("Terminal too small"));
        let need = min_screen();
        assert!(row(&screen, 1).contains(&format!("need {}x{}", need.x, need.y)));
        assert!(screen.iter().all(|(_, c)| c.style.bg != m.palette.start));
        assert_eq!(fitting_size(need), GridSize::new(GridSize::MIN).ok());
    }

    #[test]
    fn draws_panels() {
        let solver = FakeSolver::local();
        let m = model(solver);
        let mut screen = Grid::new(UI_WIDTH, UI_HEIGHT);
        m.draw(&mut screen);
        assert!(row(&screen, 0).contains("pathviz"));
        assert!(row(&screen, 0).contains("Ready"));
        assert!(row(&screen, UI_HEIGHT - 1).contains("space find"));
        let start = m.layout.screen_of(m.grid().start());
        assert_eq!(screen.at(start).style.bg, m.palette.start);
        assert!((0..UI_HEIGHT).any(|y| row(&screen, y).contains("Algorithm:   A* (Manhattan)")));
    }
}
