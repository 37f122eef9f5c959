use pathviz_search::AlgorithmKind;

/// Slowest tick rate, in ticks per second.
pub const MIN_SPEED: u32 = 1;
/// Fastest tick rate, in ticks per second.
pub const MAX_SPEED: u32 = 100;

/// Initial simulation parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Ticks per second, `MIN_SPEED..=MAX_SPEED`.
    pub speed: u32,
    /// Whether each step is rendered as it happens.
    pub draw: bool,
    /// Algorithm preselected in the front-end.
    pub algorithm: AlgorithmKind,
    /// Steps run per tick while drawing is off.
    pub batch_when_hidden: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            speed: MIN_SPEED,
            draw: true,
            algorithm: AlgorithmKind::default(),
            batch_when_hidden: 1000,
        }
    }
}

impl SimConfig {
    /// Copy of `self` with every field forced into its valid range.
    pub fn validated(mut self) -> Self {
        let speed = clamp_speed(self.speed);
        if speed != self.speed {
            log::warn!("speed {} out of range, using {speed}", self.speed);
            self.speed = speed;
        }
        self.batch_when_hidden = self.batch_when_hidden.max(1);
        self
    }
}

#[inline]
pub fn clamp_speed(speed: u32) -> u32 {
    speed.clamp(MIN_SPEED, MAX_SPEED)
}
