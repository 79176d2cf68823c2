// Domain layer: core models and ports. No game logic lives here.

pub mod model;
pub mod ports;
