pub mod indicators;
pub mod engine;

#[cfg(test)]
mod indicators_tests;

pub use indicators::*;
pub use engine::*;
