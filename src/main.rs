use clap::Parser;
use lowtide::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
