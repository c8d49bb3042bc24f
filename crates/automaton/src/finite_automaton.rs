use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

/// The identifier of a state.
pub type StateIndex = usize;

/// A single symbol of the alphabet.
pub type Symbol = char;

/// Represents a deterministic finite automaton consisting of an alphabet, a
/// set of states with a single initial state and a set of final states, and a
/// partial transition function.
///
/// The automaton is not required to be consistent, i.e., the initial state,
/// final states and transitions may refer to states and symbols that were
/// never declared. See [FiniteAutomaton::inconsistencies].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FiniteAutomaton {
    alphabet: BTreeSet<Symbol>,
    states: BTreeSet<StateIndex>,

    initial_state: StateIndex,
    final_states: BTreeSet<StateIndex>,

    transitions: BTreeMap<(StateIndex, Symbol), StateIndex>,
}

impl FiniteAutomaton {
    /// Creates a new finite automaton.
    ///
    /// The transitions are given as `(from, symbol, to)` triples and inserted
    /// in order, so when the same `(from, symbol)` pair occurs more than once
    /// the last destination is kept.
    pub fn new<A, S, F, T>(
        alphabet: A,
        states: S,
        initial_state: StateIndex,
        final_states: F,
        transitions: T,
    ) -> FiniteAutomaton
    where
        A: IntoIterator<Item = Symbol>,
        S: IntoIterator<Item = StateIndex>,
        F: IntoIterator<Item = StateIndex>,
        T: IntoIterator<Item = (StateIndex, Symbol, StateIndex)>,
    {
        let mut transition_map = BTreeMap::new();
        for (from, symbol, to) in transitions {
            transition_map.insert((from, symbol), to);
        }

        FiniteAutomaton {
            alphabet: alphabet.into_iter().collect(),
            states: states.into_iter().collect(),
            initial_state,
            final_states: final_states.into_iter().collect(),
            transitions: transition_map,
        }
    }

    /// Returns the alphabet, ordered by symbol.
    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    /// Returns the declared states in ascending order.
    pub fn states(&self) -> &BTreeSet<StateIndex> {
        &self.states
    }

    pub fn initial_state(&self) -> StateIndex {
        self.initial_state
    }

    pub fn final_states(&self) -> &BTreeSet<StateIndex> {
        &self.final_states
    }

    /// Returns true iff the given state is a final state.
    pub fn is_final(&self, state: StateIndex) -> bool {
        self.final_states.contains(&state)
    }

    /// Returns the transition table.
    pub fn transitions(&self) -> &BTreeMap<(StateIndex, Symbol), StateIndex> {
        &self.transitions
    }

    /// Returns the destination of the transition from `state` labelled with
    /// `symbol`, or None when there is no such transition.
    pub fn transition(&self, state: StateIndex, symbol: Symbol) -> Option<StateIndex> {
        self.transitions.get(&(state, symbol)).copied()
    }

    /// Iterate over all transitions as `(from, symbol, to)`, ordered by `(from, symbol)`.
    pub fn iter_transitions(&self) -> impl Iterator<Item = (StateIndex, Symbol, StateIndex)> + '_ {
        self.transitions
            .iter()
            .map(|(&(from, symbol), &to)| (from, symbol, to))
    }

    /// Returns the number of declared states.
    pub fn num_of_states(&self) -> usize {
        self.states.len()
    }

    /// Returns the number of transitions.
    pub fn num_of_transitions(&self) -> usize {
        self.transitions.len()
    }

    /// Returns all references to states and symbols that were not declared.
    pub fn inconsistencies(&self) -> Vec<Inconsistency> {
        let mut result = Vec::new();

        if !self.states.contains(&self.initial_state) {
            result.push(Inconsistency::InitialState(self.initial_state));
        }

        for &state in self.final_states.difference(&self.states) {
            result.push(Inconsistency::FinalState(state));
        }

        for (from, symbol, to) in self.iter_transitions() {
            if !self.alphabet.contains(&symbol) {
                result.push(Inconsistency::Symbol { from, symbol });
            }

            for state in std::iter::once(from).chain((to != from).then_some(to)) {
                if !self.states.contains(&state) {
                    result.push(Inconsistency::TransitionState { from, symbol, to, state });
                }
            }
        }

        result
    }
}

/// A reference to a state or symbol that is not part of the automaton.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Inconsistency {
    InitialState(StateIndex),
    FinalState(StateIndex),
    Symbol {
        from: StateIndex,
        symbol: Symbol,
    },
    TransitionState {
        from: StateIndex,
        symbol: Symbol,
        to: StateIndex,
        state: StateIndex,
    },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inconsistency::InitialState(state) => write!(f, "initial state {state} is not a declared state"),
            Inconsistency::FinalState(state) => write!(f, "final state {state} is not a declared state"),
            Inconsistency::Symbol { from, symbol } => {
                write!(f, "transition ({from}, '{symbol}') uses a symbol outside of the alphabet")
            }
            Inconsistency::TransitionState { from, symbol, to, state } => write!(
                f,
                "transition ({from}, '{symbol}') -> {to} refers to undeclared state {state}"
            ),
        }
    }
}

/// Writes the given items separated by single spaces.
fn write_separated<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: impl IntoIterator<Item = T>) -> fmt::Result {
    for (index, item) in items.into_iter().enumerate() {
        if index > 0 {
            write!(f, " ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for FiniteAutomaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Finite Automaton:")?;

        write!(f, "States: ")?;
        write_separated(f, &self.states)?;
        writeln!(f)?;

        writeln!(f, "Initial State: {}", self.initial_state)?;

        write!(f, "Final States: ")?;
        write_separated(f, &self.final_states)?;
        writeln!(f)?;

        write!(f, "Alphabet: ")?;
        write_separated(f, &self.alphabet)?;
        writeln!(f)?;

        writeln!(f, "Transitions:")?;
        for (from, symbol, to) in self.iter_transitions() {
            writeln!(f, "  ({from}, '{symbol}') -> {to}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn example() -> FiniteAutomaton {
        FiniteAutomaton::new(['b', 'a'], [1, 0], 0, [1], [(0, 'a', 1), (1, 'b', 1)])
    }

    #[test]
    fn test_last_transition_wins() {
        let automaton = FiniteAutomaton::new(['a'], [0, 1, 2], 0, [2], [(0, 'a', 1), (0, 'a', 2)]);

        assert_eq!(automaton.transition(0, 'a'), Some(2));
        assert_eq!(automaton.num_of_transitions(), 1);
    }

    #[test]
    fn test_missing_transition() {
        let automaton = example();

        assert_eq!(automaton.transition(0, 'b'), None);
        assert_eq!(automaton.transition(0, 'z'), None);
        assert_eq!(automaton.transition(1, 'b'), Some(1));
    }

    #[test]
    fn test_sorted_views() {
        let automaton = example();

        assert_eq!(automaton.alphabet().iter().copied().collect::<Vec<_>>(), vec!['a', 'b']);
        assert_eq!(automaton.states().iter().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(
            automaton.iter_transitions().collect::<Vec<_>>(),
            vec![(0, 'a', 1), (1, 'b', 1)]
        );
    }

    #[test]
    fn test_display() {
        let automaton = example();

        assert_eq!(
            automaton.to_string(),
            "Finite Automaton:\n\
             States: 0 1\n\
             Initial State: 0\n\
             Final States: 1\n\
             Alphabet: a b\n\
             Transitions:\n  (0, 'a') -> 1\n  (1, 'b') -> 1\n"
        );
    }

    #[test]
    fn test_consistent() {
        assert!(example().inconsistencies().is_empty());
    }

    #[test]
    fn test_inconsistencies() {
        let automaton = FiniteAutomaton::new(['a'], [0], 3, [0, 4], [(0, 'b', 5)]);

        assert_eq!(
            automaton.inconsistencies(),
            vec![
                Inconsistency::InitialState(3),
                Inconsistency::FinalState(4),
                Inconsistency::Symbol { from: 0, symbol: 'b' },
                Inconsistency::TransitionState {
                    from: 0,
                    symbol: 'b',
                    to: 5,
                    state: 5
                },
            ]
        );
    }
}
