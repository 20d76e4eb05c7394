//! Call engine implementations

pub mod loopback;

pub use loopback::LoopbackCallEngine;
