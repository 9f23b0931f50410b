// Domain layer: data model, stat defaults and ports (interfaces).

pub mod model;
pub mod ports;
pub mod stats;
