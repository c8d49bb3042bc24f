//!
//! A crate containing the deterministic finite automaton data structure and
//! the evaluation of words on it.
//!
//! This crate does not use unsafe code.

#![forbid(unsafe_code)]

mod evaluator;
mod finite_automaton;
mod random_automaton;

pub use evaluator::*;
pub use finite_automaton::*;
pub use random_automaton::*;
