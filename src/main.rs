use std::panic::AssertUnwindSafe;

use clap::Parser;

use retentions::cli::Cli;
use retentions::config::RuleSet;
use retentions::pipeline;
use retentions::{EXIT_INTERNAL_ERROR, EXIT_SUCCESS};

fn main() {
    let cli = Cli::parse();
    std::process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let rules = match RuleSet::from_cli(cli) {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("error: {e}");
            return e.exit_code();
        }
    };

    match std::panic::catch_unwind(AssertUnwindSafe(|| pipeline::run(&rules))) {
        Ok(Ok(_)) => EXIT_SUCCESS,
        Ok(Err(e)) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
        Err(_) => {
            eprintln!("error: unexpected internal error");
            EXIT_INTERNAL_ERROR
        }
    }
}
