//! Logic optimization based on Reed-Muller forms
//!
//! This crate optimizes combinational logic networks by local rewriting with
//! two-level mixed-polarity [Reed-Muller](https://en.wikipedia.org/wiki/Reed%E2%80%93Muller_expansion)
//! forms: each small window of the circuit is resynthesized as a Xor of And terms,
//! choosing the polarity of each variable, and replaced when the result is cheaper.
//! Xor-based forms are a good fit for arithmetic and cryptographic circuits, where
//! conventional And/Or synthesis struggles, and the And gate count (multiplicative
//! complexity) can be targeted directly for cryptographic cost models.
//!
//! # Usage
//!
//! ```bash
//! # Show available commands
//! # At the moment, only .bench files are supported
//! rmopt help
//! # Show statistics about a network
//! rmopt show mydesign.bench
//! # Rewrite the logic, minimizing the And gate count, and check the result
//! rmopt rm mydesign.bench -o optimized.bench --minimum-and-gates --cec
//! # Check equivalence between the two
//! rmopt equiv mydesign.bench optimized.bench
//! ```
//!
//! # Datastructures
//!
//! All algorithms operate on a single datastructure, `Network`, a typical
//! Gate-Inverter-Graph representation of a logic circuit.
//! Inverters are implicit, occupying just one bit in `Signal`.
//! Complex gates such as Xor and Maj are first class citizens, so that Reed-Muller
//! forms can be represented directly rather than decomposed to And gates.
//!
//! All gates have a single output, representing a single binary value.
//! The network is kept in topological order, so that a given gate has an index
//! higher than its inputs.
//!
//! For example, here is a full adder circuit:
//! ```
//! # use rmopt::Network;
//! let mut net = Network::new();
//! let i0 = net.add_input();
//! let i1 = net.add_input();
//! let i2 = net.add_input();
//! let carry = net.maj(i0, i1, i2);
//! let out = net.xor_n(&[i0, i1, i2]);
//! net.add_output(carry);
//! net.add_output(out);
//! ```

#![warn(missing_docs)]

pub mod cmd;
pub mod equiv;
pub mod io;
pub mod network;
pub mod optim;
pub mod sim;

pub use network::{stats, BinaryType, Gate, NaryType, Network, Signal, TernaryType};
