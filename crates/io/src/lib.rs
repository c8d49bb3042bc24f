//!
//! A crate containing IO related functionality. This includes the reading and
//! writing of the textual automaton format.
//!

#![forbid(unsafe_code)]

mod token_iterator;

pub mod io_dfa;

pub use io_dfa::*;
