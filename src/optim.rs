//! Logic network optimization
//!
//! The optimizer works by local rewriting: small windows of the network are enumerated,
//! their function is resynthesized as a two-level mixed-polarity Reed-Muller form, and
//! the window is replaced whenever the resynthesis is cheaper. The objective is either
//! the gate count or the And gate count (multiplicative complexity).

pub mod reed_muller;
pub mod rewrite;
pub mod window;

pub use reed_muller::{minimum_rm_form, Cost, RmForm};
pub use rewrite::{rewrite_reed_muller, RewriteParams, RewriteStrategy};
