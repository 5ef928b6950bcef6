//! Command line interface

use crate::equiv::check_equivalence;
use crate::io::{read_network_file, write_network_file};
use crate::network::stats::stats;
use crate::optim::{rewrite_reed_muller, RewriteParams, RewriteStrategy};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Command line arguments
#[derive(Subcommand)]
pub enum Commands {
    /// Show statistics about a logic network
    ///
    /// Will print statistics on the number of inputs, outputs and gates in the network.
    #[clap()]
    Show(ShowArgs),

    /// Optimize a logic network with Reed-Muller rewriting
    ///
    /// Windows of the network are resynthesized as two-level mixed-polarity
    /// Reed-Muller forms (a Xor of And terms), keeping the cheaper realization.
    /// This is particularly effective on Xor-rich arithmetic and crypto circuits.
    #[clap(alias = "rm")]
    Rewrite(RewriteArgs),

    /// Check equivalence between two logic networks
    ///
    /// The command will fail if the two networks are not equivalent, and will output the
    /// failing test pattern.
    #[clap(alias = "equiv")]
    CheckEquivalence(EquivArgs),
}

/// Command arguments for equivalence checking
#[derive(Args)]
pub struct EquivArgs {
    /// First network to compare
    file1: PathBuf,
    /// Second network to compare
    file2: PathBuf,
}

impl EquivArgs {
    /// Run the equivalence check and exit with the result
    pub fn run(&self) {
        let ntk1 = read_network_file(&self.file1);
        let ntk2 = read_network_file(&self.file2);
        if ntk1.nb_inputs() != ntk2.nb_inputs() {
            println!(
                "Different number of inputs: {} vs {}. Networks are not equivalent",
                ntk1.nb_inputs(),
                ntk2.nb_inputs()
            );
            std::process::exit(1);
        }
        if ntk1.nb_outputs() != ntk2.nb_outputs() {
            println!(
                "Different number of outputs: {} vs {}. Networks are not equivalent",
                ntk1.nb_outputs(),
                ntk2.nb_outputs()
            );
            std::process::exit(1);
        }
        match check_equivalence(&ntk1, &ntk2) {
            Err(pattern) => {
                println!("Networks are not equivalent");
                print!("Test pattern: ");
                for b in pattern {
                    print!("{}", if b { "1" } else { "0" });
                }
                println!();
                std::process::exit(1);
            }
            Ok(()) => {
                println!("Networks are equivalent");
                std::process::exit(0);
            }
        }
    }
}

/// Command arguments for Reed-Muller rewriting
#[derive(Args)]
pub struct RewriteArgs {
    /// Network to optimize
    file: PathBuf,

    /// Output file for optimized network
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Window selection strategy
    #[arg(long, value_enum, default_value = "cut")]
    strategy: RewriteStrategy,

    /// Minimize the number of And gates instead of the total gate count
    #[arg(long)]
    minimum_and_gates: bool,

    /// Maximum number of window leaves
    #[arg(long, default_value_t = 6)]
    max_cut_size: usize,

    /// Check equivalence of the result against the input network
    #[arg(long)]
    cec: bool,
}

impl RewriteArgs {
    /// Run the rewriting pass and write the result
    pub fn run(&self) {
        let mut ntk = read_network_file(&self.file);
        let original = ntk.clone();
        let before = stats(&ntk);
        let params = RewriteParams {
            strategy: self.strategy,
            multiplicative_complexity: self.minimum_and_gates,
            max_cut_size: self.max_cut_size,
        };
        rewrite_reed_muller(&mut ntk, &params);
        let after = stats(&ntk);
        println!(
            "Rewriting done: {} gates ({} And) to {} gates ({} And)",
            before.nb_gates(),
            before.nb_and,
            after.nb_gates(),
            after.nb_and
        );
        if self.cec {
            match check_equivalence(&original, &ntk) {
                Ok(()) => println!("Equivalence check passed"),
                Err(pattern) => {
                    println!("Equivalence check failed");
                    print!("Test pattern: ");
                    for b in pattern {
                        print!("{}", if b { "1" } else { "0" });
                    }
                    println!();
                    std::process::exit(1);
                }
            }
        }
        write_network_file(&self.output, &ntk);
    }
}

/// Command arguments for network informations
#[derive(Args)]
pub struct ShowArgs {
    /// Network to show
    file: PathBuf,
}

impl ShowArgs {
    /// Print the network statistics
    pub fn run(&self) {
        let ntk = read_network_file(&self.file);
        println!("Network stats:\n{}", stats(&ntk));
        println!("Depth: {}\n", crate::network::depth::depth(&ntk));
    }
}
