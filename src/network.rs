//! Representation and handling of logic networks

pub mod depth;
mod gates;
mod network;
mod signal;
pub mod stats;

pub use gates::{BinaryType, Gate, NaryType, Normalization, TernaryType};
pub use network::Network;
pub use signal::Signal;
