use std::collections::BTreeSet;

use log::trace;

use crate::FiniteAutomaton;
use crate::StateIndex;
use crate::Symbol;

/// Describes how the evaluation of a word ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The whole word has been consumed, ending in the given state.
    Done { state: StateIndex },

    /// There is no transition from `state` for the symbol at (character)
    /// `position` of the word. The remainder of the word is ignored.
    Stuck {
        state: StateIndex,
        position: usize,
        symbol: Symbol,
    },
}

/// The result of evaluating a word on an automaton.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AcceptanceResult {
    pub accepted: bool,
    pub outcome: Outcome,
}

/// Simulates the automaton on the given word, starting in the initial state.
///
/// The evaluation stops as soon as there is no transition for the current
/// state and symbol, in which case the word is rejected. This includes symbols
/// that are not part of the alphabet. Otherwise the word is accepted iff the
/// state reached after the last symbol is a final state.
pub fn evaluate(automaton: &FiniteAutomaton, word: &str) -> AcceptanceResult {
    let mut current = automaton.initial_state();

    for (position, symbol) in word.chars().enumerate() {
        match automaton.transition(current, symbol) {
            Some(next) => {
                trace!("{current} --[{symbol}]-> {next}");
                current = next;
            }
            None => {
                trace!("No transition from {current} for '{symbol}' at position {position}");
                return AcceptanceResult {
                    accepted: false,
                    outcome: Outcome::Stuck {
                        state: current,
                        position,
                        symbol,
                    },
                };
            }
        }
    }

    AcceptanceResult {
        accepted: automaton.is_final(current),
        outcome: Outcome::Done { state: current },
    }
}

/// Returns true iff the automaton accepts the given word, see [evaluate].
pub fn process_word(automaton: &FiniteAutomaton, word: &str) -> bool {
    evaluate(automaton, word).accepted
}

/// Returns the symbols of the alphabet that do not label any transition.
pub fn find_unaccepted_symbols(automaton: &FiniteAutomaton) -> BTreeSet<Symbol> {
    let used: BTreeSet<Symbol> = automaton.iter_transitions().map(|(_, symbol, _)| symbol).collect();

    automaton.alphabet().difference(&used).copied().collect()
}

/// Returns the result of [find_unaccepted_symbols] in ascending order.
pub fn unaccepted_symbols(automaton: &FiniteAutomaton) -> Vec<Symbol> {
    find_unaccepted_symbols(automaton).into_iter().collect()
}
