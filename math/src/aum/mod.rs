#![allow(clippy::module_inception)]

mod aum;

pub use aum::*;

#[cfg(test)]
mod invariants;
