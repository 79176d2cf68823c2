use crate::config::settings::RunnerConfig;
use crate::domain::model::ScreenPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Turn {
    Left,
    #[default]
    Straight,
    Right,
}

impl Turn {
    pub fn sign(&self) -> f64 {
        match self {
            Turn::Left => -1.0,
            Turn::Straight => 0.0,
            Turn::Right => 1.0,
        }
    }
}

/// Run-cycle frame counter. The runner never stops, so neither does this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    frame: u32,
    counter: u32,
    ticks_per_frame: u32,
    frames: u32,
}

impl Animation {
    pub fn new(ticks_per_frame: u32, frames: u32) -> Self {
        Self {
            frame: 0,
            counter: 0,
            ticks_per_frame: ticks_per_frame.max(1),
            frames: frames.max(1),
        }
    }

    pub fn advance(&mut self) {
        self.counter += 1;
        if self.counter >= self.ticks_per_frame {
            self.counter = 0;
            self.frame = (self.frame + 1) % self.frames;
        }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Runner {
    pub position: ScreenPoint,
    /// Heading in radians; 0 is +x, π/2 is +y.
    pub direction: f64,
    pub turn: Turn,
    pub animation: Animation,
    speed: f64,
    turn_speed: f64,
}

impl Runner {
    pub fn new(config: &RunnerConfig, position: ScreenPoint) -> Self {
        Self {
            position,
            direction: config.initial_direction,
            turn: Turn::Straight,
            animation: Animation::new(config.ticks_per_frame, config.frames),
            speed: config.speed,
            turn_speed: config.turn_speed,
        }
    }

    pub fn apply_turn(&mut self) {
        if self.turn != Turn::Straight {
            self.direction += self.turn.sign() * self.turn_speed;
        }
    }

    pub fn velocity(&self) -> (f64, f64) {
        (
            self.direction.cos() * self.speed,
            self.direction.sin() * self.speed,
        )
    }
}
