use std::fs::File;
use std::io::stdin;
use std::io::stdout;
use std::io::BufWriter;
use std::io::Write;

use anyhow::Context;
use anyhow::Result as AnyResult;
use clap::Parser;
use log::debug;
use log::warn;

use dfasim_automaton::evaluate;
use dfasim_automaton::unaccepted_symbols;
use dfasim_automaton::Outcome;
use dfasim_io::read_dfa;
use dfasim_io::write_dfa;

#[derive(Parser, Debug)]
#[command(
    name = "dfasim",
    about = "A command line deterministic finite automaton simulator",
    long_about = "Loads a deterministic finite automaton, reports the alphabet symbols without transitions and evaluates the given words"
)]
struct Cli {
    #[arg(value_name = "FILE", default_value = "Auto1.txt")]
    filename: String,

    #[arg(help = "The words to evaluate, a single word is read from standard input when none are given")]
    words: Vec<String>,

    #[arg(long, default_value_t = false, help = "Do not print the automaton")]
    quiet: bool,

    #[arg(long, help = "Write the loaded automaton to the given file")]
    output: Option<String>,
}

fn main() -> AnyResult<()> {
    env_logger::init();

    let cli = Cli::parse();

    let file = File::open(&cli.filename).with_context(|| format!("Unable to open file {}", cli.filename))?;
    let automaton_file = read_dfa(file).with_context(|| format!("Unable to load automaton from {}", cli.filename))?;
    let automaton = &automaton_file.automaton;

    if !cli.quiet {
        println!("{}", automaton);
    }

    let unaccepted = unaccepted_symbols(automaton);
    if unaccepted.is_empty() {
        println!("All symbols in the alphabet are accepted by the automaton.");
    } else {
        let symbols: Vec<String> = unaccepted.iter().map(|symbol| symbol.to_string()).collect();
        println!("Unaccepted symbols: {}", symbols.join(" "));
    }

    let words = if cli.words.is_empty() {
        print!("Enter the word: ");
        stdout().flush()?;

        let mut line = String::new();
        stdin().read_line(&mut line)?;
        vec![line.trim().to_string()]
    } else {
        cli.words
    };

    for word in &words {
        if word.chars().count() > automaton_file.word_length {
            warn!(
                "The word \"{}\" is longer than the expected word length {}",
                word, automaton_file.word_length
            );
        }

        let result = evaluate(automaton, word);
        if let Outcome::Stuck { state, position, symbol } = result.outcome {
            debug!("No transition from state {state} for '{symbol}' at position {position}");
        }

        if result.accepted {
            println!("Automaton accepted the word.");
        } else {
            println!("Automaton did NOT accept the word.");
        }
    }

    if let Some(output) = cli.output {
        let mut writer = BufWriter::new(
            File::create(&output).with_context(|| format!("Unable to create file {}", output))?,
        );
        write_dfa(&mut writer, &automaton_file)?;
        writer.flush()?;
    }

    Ok(())
}
