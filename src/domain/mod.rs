// Domain layer: bill models, the splitting/formatting services and the ports
// (interfaces) the core layer is written against.

pub mod model;
pub mod ports;

pub mod services;
