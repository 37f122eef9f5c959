//! The Elm-architecture application loop: [`Model`], [`Driver`], [`Effect`],
//! [`App`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use crate::messages::Msg;
use crate::screen::{Frame, Screen, compute_frame};

/// A cooperative-cancellation token backed by an [`AtomicBool`].
#[derive(Clone, Debug, Default)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

/// A side-effect returned by [`Model::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Stop the application loop.
    End,
}

/// The application model.
pub trait Model {
    /// Process a message, optionally returning a side-effect.
    fn update(&mut self, msg: Msg) -> Option<Effect>;

    /// Render the current state into `screen`.
    fn draw(&self, screen: &mut Screen);

    /// How often the loop should deliver [`Msg::Tick`]; `None` for never.
    fn tick_interval(&self) -> Option<Duration> {
        None
    }
}

/// Back-end driver.
pub trait Driver {
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Wait briefly for input and send the resulting messages through `tx`.
    /// Must return promptly so ticks are not delayed.
    fn poll_msgs(
        &mut self,
        ctx: &Context,
        tx: Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Write a computed frame to the screen.
    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Restore the terminal.
    fn close(&mut self);
}

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
    prev: Screen,
    curr: Screen,
}

impl<M: Model, D: Driver> App<M, D> {
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            prev: Screen::new(config.width, config.height),
            curr: Screen::new(config.width, config.height),
        }
    }

    /// The model, for inspection once the loop has ended.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Run the Model-View-Update loop until the model returns
    /// [`Effect::End`].
    ///
    /// Each iteration polls the driver, emits a [`Msg::Tick`] when the
    /// model's tick interval has elapsed, then updates, draws, diffs and
    /// flushes.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.driver.init()?;
        let result = self.run_loop();
        self.driver.close();
        result
    }

    fn run_loop(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let ctx = Context::new();
        let (tx, rx): (Sender<Msg>, Receiver<Msg>) = mpsc::channel();
        tx.send(Msg::Init).ok();
        // The first frame paints every glyph.
        self.prev = Screen::new(0, 0);
        self.process_pending(&rx, &ctx)?;

        let mut last_tick = Instant::now();
        while !ctx.is_done() {
            self.driver.poll_msgs(&ctx, tx.clone())?;
            match self.model.tick_interval() {
                Some(every) if last_tick.elapsed() >= every => {
                    tx.send(Msg::Tick).ok();
                    last_tick = Instant::now();
                }
                Some(_) => {}
                None => last_tick = Instant::now(),
            }
            self.process_pending(&rx, &ctx)?;
        }
        Ok(())
    }

    /// Drain queued messages, update the model, draw, diff, and flush.
    fn process_pending(
        &mut self,
        rx: &Receiver<Msg>,
        ctx: &Context,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut needs_draw = false;
        while let Ok(msg) = rx.try_recv() {
            if let Msg::Screen { width, height } = msg {
                self.curr = Screen::new(width, height);
            }
            if let Some(Effect::End) = self.model.update(msg) {
                ctx.cancel();
                return Ok(());
            }
            needs_draw = true;
        }

        if needs_draw {
            self.curr.fill(Default::default());
            self.model.draw(&mut self.curr);
            let frame = compute_frame(&self.prev, &self.curr);
            if !frame.cells.is_empty() {
                self.driver.flush(frame)?;
            }
            self.prev.clone_from(&self.curr);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Key;
    use crate::screen::{Glyph, Style};
    use pathviz_core::Point;

    struct Counter {
        seen: Vec<Msg>,
    }

    impl Model for Counter {
        fn update(&mut self, msg: Msg) -> Option<Effect> {
            let quit = msg == Msg::ch('q');
            self.seen.push(msg);
            quit.then_some(Effect::End)
        }

        fn draw(&self, screen: &mut Screen) {
            let text = self.seen.len().to_string();
            screen.print(Point::ZERO, &text, Style::default(), 4);
        }

        fn tick_interval(&self) -> Option<Duration> {
            Some(Duration::ZERO)
        }
    }

    /// Replays one batch of messages per poll.
    struct Scripted {
        batches: Vec<Vec<Msg>>,
        frames: Vec<Frame>,
        closed: bool,
    }

    impl Driver for Scripted {
        fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            Ok(())
        }

        fn poll_msgs(
            &mut self,
            _ctx: &Context,
            tx: Sender<Msg>,
        ) -> Result<(), Box<dyn std::error::Error>> {
            if self.batches.is_empty() {
                return Err("script exhausted".into());
            }
            for m in self.batches.remove(0) {
                tx.send(m).ok();
            }
            Ok(())
        }

        fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.frames.push(frame);
            Ok(())
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }

    #[test]
    fn runs_until_end_and_emits_ticks() {
        let driver = Scripted {
            batches: vec![vec![Msg::key(Key::Enter)], vec![Msg::ch('q')]],
            frames: Vec::new(),
            closed: false,
        };
        let mut app = App::new(AppConfig {
            model: Counter { seen: Vec::new() },
            driver,
            width: 4,
            height: 1,
        });
        app.run().unwrap();

        let seen = &app.model().seen;
        assert_eq!(seen[0], Msg::Init);
        assert_eq!(seen[1], Msg::key(Key::Enter));
        assert_eq!(seen[2], Msg::Tick);
        assert_eq!(seen.last(), Some(&Msg::ch('q')));
        assert!(app.driver.closed);
        // The first frame covers the whole screen, later ones only changes.
        assert_eq!(app.driver.frames[0].cells.len(), 4);
        assert_eq!(app.driver.frames[1].cells.len(), 1);
        assert_eq!(
            app.driver.frames[1].cells[0].glyph,
            Glyph::new('3', Style::default())
        );
    }

    #[test]
    fn driver_errors_close_the_terminal() {
        let driver = Scripted {
            batches: Vec::new(),
            frames: Vec::new(),
            closed: false,
        };
        let mut app = App::new(AppConfig {
            model: Counter { seen: Vec::new() },
            driver,
            width: 2,
            height: 1,
        });
        assert!(app.run().is_err());
        assert!(app.driver.closed);
    }
}
