use rand::Rng;

use crate::FiniteAutomaton;
use crate::StateIndex;
use crate::Symbol;

/// Generates a random automaton with the desired number of states, the first
/// `num_of_symbols` lower case letters as alphabet and at most `outdegree`
/// outgoing transitions for every state.
///
/// The initial state is zero and every state is final with probability one half.
pub fn random_automaton(num_of_states: usize, num_of_symbols: usize, outdegree: usize) -> FiniteAutomaton {
    let alphabet: Vec<Symbol> = ('a'..='z').take(num_of_symbols).collect();

    let mut rng = rand::rng();

    let final_states: Vec<StateIndex> = (0..num_of_states).filter(|_| rng.random_bool(0.5)).collect();

    let mut transitions = Vec::new();
    if !alphabet.is_empty() && num_of_states > 0 {
        for from in 0..num_of_states {
            // Duplicate (from, symbol) pairs simply overwrite each other.
            for _ in 0..rng.random_range(0..=outdegree) {
                let symbol = alphabet[rng.random_range(0..alphabet.len())];
                let to = rng.random_range(0..num_of_states);
                transitions.push((from, symbol, to));
            }
        }
    }

    FiniteAutomaton::new(alphabet, 0..num_of_states, 0, final_states, transitions)
}
