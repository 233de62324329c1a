//! The Elm-architecture application loop: [`Model`], [`Driver`], [`Effect`],
//! [`App`].
//!
//! The loop owns the model on the calling thread. Commands returned by the
//! model run on worker threads and their resulting messages are fed back into
//! the same queue as input events, so slow work never blocks input handling.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crate::grid::{Frame, Grid, compute_frame};
use crate::messages::Msg;

// ---------------------------------------------------------------------------
// Context (cancellation token)
// ---------------------------------------------------------------------------

/// A cooperative-cancellation token backed by an [`AtomicBool`].
///
/// Clones share the same flag.
#[derive(Clone, Debug)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    /// Create a new, non-cancelled context.
    pub fn new() -> Self {
        Self {
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Release);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A side-effect returned by [`Model::update`].
pub enum Effect {
    /// A one-shot command, run off the UI thread, that produces an optional
    /// follow-up message.
    Cmd(Box<dyn FnOnce() -> Option<Msg> + Send>),
    /// Multiple effects batched together.
    Batch(Vec<Effect>),
    /// Signal the application loop to stop.
    End,
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cmd(_) => f.write_str("Effect::Cmd(..)"),
            Self::Batch(v) => f.debug_tuple("Effect::Batch").field(&v.len()).finish(),
            Self::End => f.write_str("Effect::End"),
        }
    }
}

impl Effect {
    /// Combine two optional effects into one.
    pub fn merge(a: Option<Effect>, b: Option<Effect>) -> Option<Effect> {
        match (a, b) {
            (None, e) | (e, None) => e,
            (Some(Effect::Batch(mut v)), Some(e)) => {
                v.push(e);
                Some(Effect::Batch(v))
            }
            (Some(a), Some(b)) => Some(Effect::Batch(vec![a, b])),
        }
    }
}

/// Convenience constructor for an [`Effect::Cmd`].
pub fn cmd<F>(f: F) -> Effect
where
    F: FnOnce() -> Option<Msg> + Send + 'static,
{
    Effect::Cmd(Box::new(f))
}

/// A command that delivers `msg` after `delay`, unless `ctx` has been
/// cancelled by then.
pub fn timer(delay: Duration, ctx: Context, msg: Msg) -> Effect {
    cmd(move || {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        if ctx.is_done() { None } else { Some(msg) }
    })
}

// ---------------------------------------------------------------------------
// Model trait
// ---------------------------------------------------------------------------

/// The application model (Elm architecture).
pub trait Model {
    /// Process a message, optionally returning a side-effect.
    fn update(&mut self, msg: Msg) -> Option<Effect>;

    /// Render the current state into `grid`.
    fn draw(&self, grid: &mut Grid);
}

// ---------------------------------------------------------------------------
// Driver trait
// ---------------------------------------------------------------------------

/// Back-end driver (e.g. a terminal).
pub trait Driver {
    /// Initialise the back-end.
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Poll for input messages, sending them through `tx`. Implementations
    /// should wait briefly for input and return, so that messages produced by
    /// commands are processed promptly.
    fn poll_msgs(&mut self, ctx: &Context, tx: Sender<Msg>)
    -> Result<(), Box<dyn std::error::Error>>;

    /// Flush a computed frame to the screen.
    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Clean up / restore the terminal.
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// AppConfig / App
// ---------------------------------------------------------------------------

/// Configuration for creating an [`App`].
pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    pub width: i32,
    pub height: i32,
}

/// The main application runner.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    width: i32,
    height: i32,
}

impl<M: Model, D: Driver> App<M, D> {
    /// Create a new application from a configuration.
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            width: config.width,
            height: config.height,
        }
    }

    /// Borrow the model, e.g. to inspect it after [`run`](App::run).
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Run the main Model-View-Update loop.
    ///
    /// 1. Initialises the driver.
    /// 2. Sends `Msg::Init` through the model.
    /// 3. Loops poll → update → draw → diff → flush.
    /// 4. Stops when the model returns `Effect::End`.
    ///
    /// The driver is closed on every exit path.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.driver.init()?;
        let result = self.event_loop();
        self.driver.close();
        result
    }

    fn event_loop(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let ctx = Context::new();
        let (tx, rx): (Sender<Msg>, Receiver<Msg>) = mpsc::channel();
        tx.send(Msg::Init).ok();

        let mut screen = Screen::new(self.width, self.height);
        self.process_pending(&rx, &ctx, &tx, &mut screen)?;

        while !ctx.is_done() {
            if let Err(e) = self.driver.poll_msgs(&ctx, tx.clone()) {
                ctx.cancel();
                return Err(e);
            }
            self.process_pending(&rx, &ctx, &tx, &mut screen)?;
        }
        Ok(())
    }

    /// Drain queued messages, update the model, draw, diff, and flush.
    fn process_pending(
        &mut self,
        rx: &Receiver<Msg>,
        ctx: &Context,
        tx: &Sender<Msg>,
        screen: &mut Screen,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut needs_draw = false;

        while let Ok(msg) = rx.try_recv() {
            if let Msg::Screen { width, height, .. } = msg {
                log::debug!("screen resized to {width}x{height}");
                *screen = Screen::new(width, height);
            }
            if let Some(effect) = self.model.update(msg) {
                if handle_effect(effect, ctx, tx) {
                    return Ok(());
                }
            }
            needs_draw = true;
        }

        if needs_draw {
            screen.curr.fill(Default::default());
            self.model.draw(&mut screen.curr);
            let frame = if screen.full_redraw {
                Frame::full(&screen.curr)
            } else {
                compute_frame(&screen.prev, &screen.curr)
            };
            screen.full_redraw = false;
            if !frame.cells.is_empty() {
                self.driver.flush(frame)?;
            }
            screen.prev.copy_from(&screen.curr);
        }

        Ok(())
    }
}

/// Double-buffered display state of the loop.
struct Screen {
    prev: Grid,
    curr: Grid,
    full_redraw: bool,
}

impl Screen {
    fn new(width: i32, height: i32) -> Self {
        Self {
            prev: Grid::new(width, height),
            curr: Grid::new(width, height),
            full_redraw: true,
        }
    }
}

/// Dispatch an effect. Returns `true` if the app should stop.
fn handle_effect(effect: Effect, ctx: &Context, tx: &Sender<Msg>) -> bool {
    match effect {
        Effect::End => {
            ctx.cancel();
            true
        }
        Effect::Cmd(f) => {
            let tx = tx.clone();
            thread::spawn(move || {
                if let Some(msg) = f() {
                    // The loop may already be gone; nothing to do then.
                    tx.send(msg).ok();
                }
            });
            false
        }
        Effect::Batch(effects) => {
            for e in effects {
                if handle_effect(e, ctx, tx) {
                    return true;
                }
            }
            false
        }
    }
}
