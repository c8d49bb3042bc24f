use std::io;
use std::io::Read;
use std::io::Write;
use std::num::ParseIntError;

use dfasim_automaton::FiniteAutomaton;
use dfasim_automaton::StateIndex;
use dfasim_automaton::Symbol;
use log::debug;
use log::trace;
use log::warn;
use streaming_iterator::StreamingIterator;
use thiserror::Error;

use crate::token_iterator::TokenIterator;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Could not read the automaton: {0}")]
    Io(#[from] io::Error),

    #[error("Unexpected end of input, expected the {0}")]
    UnexpectedEnd(&'static str),

    #[error("Invalid {what} '{token}' on line {line}")]
    InvalidNumber {
        what: &'static str,
        token: String,
        line: usize,
        #[source]
        source: ParseIntError,
    },

    #[error("Invalid transition symbol '{token}' on line {line}, expected a single character")]
    InvalidSymbol { token: String, line: usize },

    #[error("Incomplete transition on line {line}")]
    IncompleteTransition { line: usize },
}

/// An automaton together with the word length stored in its file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutomatonFile {
    /// The maximum length of the words that are expected to be evaluated.
    pub word_length: usize,
    pub automaton: FiniteAutomaton,
}

/// Loads a deterministic finite automaton from the given reader.
///
/// The input consists of whitespace separated tokens, line breaks are not significant:
///     `<word_length>: Nat <num_of_states>: Nat <alphabet>: Str`
///     `<state>: Nat` (num_of_states times)
///     `<initial>: Nat <num_of_final_states>: Nat`
///     `<final>: Nat` (num_of_final_states times)
///
/// Followed by zero or more transitions until the end of the input:
///     `<from>: Nat <symbol>: Char <to>: Nat`
///
/// Every character of the alphabet string is a symbol. When a transition for
/// the same state and symbol occurs more than once the last one is used.
pub fn read_dfa(reader: impl Read) -> Result<AutomatonFile, LoadError> {
    let mut parser = Parser::new(reader);

    let word_length = parser.expect_number("word length")?;
    let num_of_states = parser.expect_number("number of states")?;
    let alphabet: Vec<Symbol> = parser.expect_token("alphabet")?.chars().collect();

    let mut states: Vec<StateIndex> = Vec::new();
    for _ in 0..num_of_states {
        states.push(parser.expect_number("state")?);
    }

    let initial_state = parser.expect_number("initial state")?;

    let num_of_final_states = parser.expect_number("number of final states")?;
    let mut final_states: Vec<StateIndex> = Vec::new();
    for _ in 0..num_of_final_states {
        final_states.push(parser.expect_number("final state")?);
    }

    let mut transitions: Vec<(StateIndex, Symbol, StateIndex)> = Vec::new();
    while let Some(from_txt) = parser.next_token()? {
        let from = parser.parse_number(&from_txt, "transition source")?;

        let line = parser.line_number();
        let symbol_txt = parser
            .next_token()?
            .ok_or(LoadError::IncompleteTransition { line })?;
        let symbol = parser.parse_symbol(symbol_txt)?;

        let to_txt = parser
            .next_token()?
            .ok_or(LoadError::IncompleteTransition { line })?;
        let to = parser.parse_number(&to_txt, "transition target")?;

        trace!("Read transition {} --[{}]-> {}", from, symbol, to);
        transitions.push((from, symbol, to));
    }

    let automaton = FiniteAutomaton::new(alphabet, states, initial_state, final_states, transitions);
    debug!(
        "Read automaton with {} states, {} symbols and {} transitions",
        automaton.num_of_states(),
        automaton.alphabet().len(),
        automaton.num_of_transitions()
    );

    if automaton.num_of_states() != num_of_states {
        warn!(
            "Declared {} states, but only {} are distinct",
            num_of_states,
            automaton.num_of_states()
        );
    }

    for inconsistency in automaton.inconsistencies() {
        warn!("The automaton is inconsistent: {}", inconsistency);
    }

    Ok(AutomatonFile { word_length, automaton })
}

/// Write the automaton in the format accepted by [read_dfa] to the given writer.
///
/// Fails with [io::ErrorKind::InvalidInput] when the alphabet is empty or a
/// symbol of the alphabet or a transition is whitespace, since these cannot be
/// read back.
pub fn write_dfa(writer: &mut impl Write, file: &AutomatonFile) -> io::Result<()> {
    let automaton = &file.automaton;

    if automaton.alphabet().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "an automaton with an empty alphabet cannot be written",
        ));
    }

    let symbols = automaton
        .alphabet()
        .iter()
        .copied()
        .chain(automaton.iter_transitions().map(|(_, symbol, _)| symbol));
    for symbol in symbols {
        if symbol.is_whitespace() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("the whitespace symbol {symbol:?} cannot be written"),
            ));
        }
    }

    writeln!(writer, "{}", file.word_length)?;
    writeln!(writer, "{}", automaton.num_of_states())?;
    writeln!(writer, "{}", automaton.alphabet().iter().collect::<String>())?;
    writeln!(writer, "{}", join(automaton.states()))?;
    writeln!(writer, "{}", automaton.initial_state())?;
    writeln!(writer, "{}", automaton.final_states().len())?;
    writeln!(writer, "{}", join(automaton.final_states()))?;

    for (from, symbol, to) in automaton.iter_transitions() {
        writeln!(writer, "{from} {symbol} {to}")?;
    }

    Ok(())
}

fn join<'a>(states: impl IntoIterator<Item = &'a StateIndex>) -> String {
    states
        .into_iter()
        .map(|state| state.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reads typed fields from a token stream, keeping track of the line number for errors.
struct Parser<T: Read> {
    tokens: TokenIterator<T>,
}

impl<T: Read> Parser<T> {
    fn new(reader: T) -> Parser<T> {
        Parser {
            tokens: TokenIterator::new(reader),
        }
    }

    fn line_number(&self) -> usize {
        self.tokens.line_number()
    }

    /// Returns the next token, or None at the end of the input.
    fn next_token(&mut self) -> Result<Option<String>, LoadError> {
        self.tokens.advance();
        if let Some(error) = self.tokens.take_error() {
            return Err(error.into());
        }

        Ok(self.tokens.get().map(str::to_string))
    }

    fn expect_token(&mut self, what: &'static str) -> Result<String, LoadError> {
        self.next_token()?.ok_or(LoadError::UnexpectedEnd(what))
    }

    fn expect_number(&mut self, what: &'static str) -> Result<usize, LoadError> {
        let token = self.expect_token(what)?;
        self.parse_number(&token, what)
    }

    fn parse_number(&self, token: &str, what: &'static str) -> Result<usize, LoadError> {
        token.parse().map_err(|source| LoadError::InvalidNumber {
            what,
            token: token.to_string(),
            line: self.line_number(),
            source,
        })
    }

    fn parse_symbol(&self, token: String) -> Result<Symbol, LoadError> {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(symbol), None) => Ok(symbol),
            _ => Err(LoadError::InvalidSymbol {
                token,
                line: self.line_number(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;
    use test_log::test;

    use super::*;

    #[test]
    fn test_reading_dfa() {
        let file = include_str!("../../../models/auto1.txt");

        let result = read_dfa(file.as_bytes()).unwrap();

        assert_eq!(result.word_length, 5);
        assert_eq!(
            result.automaton,
            FiniteAutomaton::new(['a', 'b'], [0, 1], 0, [1], [(0, 'a', 1), (1, 'b', 1)])
        );
    }

    #[test]
    fn test_line_breaks_not_significant() {
        let result = read_dfa("3 2 ab 0 1 0 1 1 0 a 1 1 b 1".as_bytes()).unwrap();

        assert_eq!(result.automaton.transition(0, 'a'), Some(1));
        assert_eq!(result.automaton.transition(1, 'b'), Some(1));
    }

    #[test]
    fn test_last_transition_wins() {
        let result = read_dfa("3\n2\nab\n0 1\n0\n1\n1\n0 a 1\n0 a 0\n".as_bytes()).unwrap();

        assert_eq!(result.automaton.transition(0, 'a'), Some(0));
        assert_eq!(result.automaton.num_of_transitions(), 1);
    }

    #[test]
    fn test_inconsistent_automaton_is_loaded() {
        let result = read_dfa("3\n1\na\n0\n4\n0\n0 b 9\n".as_bytes()).unwrap();

        assert_eq!(result.automaton.initial_state(), 4);
        assert_eq!(result.automaton.transition(0, 'b'), Some(9));
    }

    #[test]
    fn test_writing_dfa() {
        let file = include_str!("../../../models/unused_symbol.txt");
        let result = read_dfa(file.as_bytes()).unwrap();

        let mut output: Vec<u8> = Vec::new();
        write_dfa(&mut output, &result).unwrap();

        assert_eq!(
            String::from_utf8(output.clone()).unwrap(),
            "4\n2\nabc\n0 1\n0\n1\n1\n0 a 1\n1 b 1\n"
        );
        assert_eq!(read_dfa(&output[..]).unwrap(), result);
    }

    #[test]
    fn test_writing_empty_alphabet() {
        let file = AutomatonFile {
            word_length: 3,
            automaton: FiniteAutomaton::new(Vec::new(), [0, 1], 0, [1], Vec::new()),
        };

        let mut output: Vec<u8> = Vec::new();
        let result = write_dfa(&mut output, &file);

        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::InvalidInput);
    }

    #[test_case(FiniteAutomaton::new(['a', ' '], [0], 0, [0], Vec::new()) ; "alphabet")]
    #[test_case(FiniteAutomaton::new(['a'], [0], 0, [0], [(0, '\t', 0)]) ; "transition")]
    fn test_writing_whitespace_symbol(automaton: FiniteAutomaton) {
        let file = AutomatonFile { word_length: 3, automaton };

        let mut output: Vec<u8> = Vec::new();
        let result = write_dfa(&mut output, &file);

        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_duplicate_states() {
        let result = read_dfa("5\n3\nab\n0 1 1\n0\n1\n1\n0 a 1\n".as_bytes()).unwrap();

        assert_eq!(result.automaton.num_of_states(), 2);
        assert!(result.automaton.inconsistencies().is_empty());
    }

    #[test]
    fn test_read_error() {
        let input: &[u8] = b"5\n2\nab\n0 \xff\xfe 1\n";

        assert!(matches!(read_dfa(input), Err(LoadError::Io(_))));
    }

    #[test_case("5 18446744073709551615 ab 0" ; "huge number of states")]
    #[test_case("5 1 ab 0 0 18446744073709551615 0" ; "huge number of final states")]
    #[test_case("" ; "empty input")]
    #[test_case("5" ; "missing number of states")]
    #[test_case("5 2" ; "missing alphabet")]
    #[test_case("5 2 ab 0" ; "missing state")]
    #[test_case("5 2 ab 0 1" ; "missing initial state")]
    #[test_case("5 2 ab 0 1 0" ; "missing number of final states")]
    #[test_case("5 2 ab 0 1 0 2 1" ; "missing final state")]
    fn test_unexpected_end(input: &str) {
        assert!(matches!(read_dfa(input.as_bytes()), Err(LoadError::UnexpectedEnd(_))));
    }

    #[test_case("x 2 ab 0 1 0 1 1" ; "word length")]
    #[test_case("5 two ab 0 1 0 1 1" ; "number of states")]
    #[test_case("5 2 ab 0 -1 0 1 1" ; "negative state")]
    #[test_case("5 2 ab 0 1 0 1 1 0 a b" ; "transition target")]
    fn test_invalid_number(input: &str) {
        assert!(matches!(read_dfa(input.as_bytes()), Err(LoadError::InvalidNumber { .. })));
    }

    #[test]
    fn test_invalid_symbol() {
        let result = read_dfa("5\n2\nab\n0 1\n0\n1\n1\n0 ab 1\n".as_bytes());

        assert!(matches!(result, Err(LoadError::InvalidSymbol { line: 8, .. })));
    }

    #[test]
    fn test_incomplete_transition() {
        let result = read_dfa("5\n2\nab\n0 1\n0\n1\n1\n0 a 1\n1 b\n".as_bytes());

        assert!(matches!(result, Err(LoadError::IncompleteTransition { line: 9 })));
    }
}
