// Domain layer: core models and ports (interfaces). No HTTP or env access here.

pub mod model;
pub mod ports;
