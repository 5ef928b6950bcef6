use clap::Parser;

use rmopt::cmd::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Show(a) => a.run(),
        Commands::Rewrite(a) => a.run(),
        Commands::CheckEquivalence(a) => a.run(),
    }
}
