#![allow(clippy::module_inception)]

mod gradual;

pub use gradual::*;

#[cfg(test)]
mod invariants;
