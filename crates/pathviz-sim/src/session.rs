//! Simulation run state shared by the controls and the runner.
//!
//! A [`Session`] is an explicit value rather than a global: whoever owns it
//! passes it where it is needed. Interested parties register observers and
//! are told about every change through a [`SessionEvent`].

use std::fmt;

use pathviz_search::AlgorithmKind;

use crate::config::{SimConfig, clamp_speed};

/// Whether a search is being driven.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimState {
    #[default]
    Stopped,
    Running,
    Paused,
}

impl fmt::Display for SimState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stopped => "stopped",
            Self::Running => "running",
            Self::Paused => "paused",
        })
    }
}

/// A user-facing control, offered depending on the current state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Control {
    Start,
    Pause,
    Resume,
    Reset,
}

/// A change notification.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    State(SimState),
    Algorithm(Option<AlgorithmKind>),
    Speed(u32),
    Draw(bool),
}

type Observer = Box<dyn FnMut(&SessionEvent)>;

/// Run state, selected algorithm, tick rate and draw toggle.
pub struct Session {
    state: SimState,
    algorithm: Option<AlgorithmKind>,
    speed: u32,
    draw: bool,
    observers: Vec<Observer>,
}

impl Session {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            state: SimState::Stopped,
            algorithm: None,
            speed: clamp_speed(config.speed),
            draw: config.draw,
            observers: Vec::new(),
        }
    }

    /// Call `f` on every subsequent change.
    pub fn subscribe(&mut self, f: impl FnMut(&SessionEvent) + 'static) {
        self.observers.push(Box::new(f));
    }

    fn emit(&mut self, event: SessionEvent) {
        for obs in &mut self.observers {
            obs(&event);
        }
    }

    #[inline]
    pub fn state(&self) -> SimState {
        self.state
    }

    /// The algorithm being run, if any.
    #[inline]
    pub fn algorithm(&self) -> Option<AlgorithmKind> {
        self.algorithm
    }

    #[inline]
    pub fn speed(&self) -> u32 {
        self.speed
    }

    #[inline]
    pub fn draw(&self) -> bool {
        self.draw
    }

    pub fn set_state(&mut self, state: SimState) {
        self.state = state;
        log::info!("simulation {state}");
        self.emit(SessionEvent::State(state));
    }

    pub fn set_algorithm(&mut self, algorithm: Option<AlgorithmKind>) {
        self.algorithm = algorithm;
        match algorithm {
            Some(kind) => log::info!("algorithm set to {kind}"),
            None => log::info!("algorithm cleared"),
        }
        self.emit(SessionEvent::Algorithm(algorithm));
    }

    /// Set the tick rate, clamped to the supported range. Returns the value
    /// actually stored.
    pub fn set_speed(&mut self, speed: u32) -> u32 {
        let speed = clamp_speed(speed);
        self.speed = speed;
        log::info!("speed set to {speed} ticks/s");
        self.emit(SessionEvent::Speed(speed));
        speed
    }

    pub fn set_draw(&mut self, draw: bool) {
        self.draw = draw;
        log::info!("drawing {}", if draw { "on" } else { "off" });
        self.emit(SessionEvent::Draw(draw));
    }

    /// Begin running `kind`.
    pub fn start(&mut self, kind: AlgorithmKind) {
        self.set_state(SimState::Running);
        self.set_algorithm(Some(kind));
    }

    /// Running → Paused. Ignored in other states.
    pub fn pause(&mut self) {
        if self.state == SimState::Running {
            self.set_state(SimState::Paused);
        }
    }

    /// Paused → Running. Ignored in other states.
    pub fn resume(&mut self) {
        if self.state == SimState::Paused {
            self.set_state(SimState::Running);
        }
    }

    pub fn reset(&mut self) {
        self.set_state(SimState::Stopped);
        self.set_algorithm(None);
    }

    /// Whether the controls for `kind` may be used: nothing is selected, or
    /// `kind` is the selected algorithm.
    pub fn controls_available(&self, kind: AlgorithmKind) -> bool {
        self.algorithm.is_none_or(|a| a == kind)
    }

    /// The controls that make sense in the current state.
    pub fn controls(&self) -> &'static [Control] {
        match self.state {
            SimState::Stopped => &[Control::Start],
            SimState::Running => &[Control::Pause, Control::Reset],
            SimState::Paused => &[Control::Resume, Control::Reset],
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("algorithm", &self.algorithm)
            .field("speed", &self.speed)
            .field("draw", &self.draw)
            .field("observers", &self.observers.len())
            .finish()
    }
}
