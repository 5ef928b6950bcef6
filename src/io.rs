//! Read and write logic networks to files

mod bench;
mod utils;

use std::fs::File;
use std::path::PathBuf;

pub use bench::{read_bench, write_bench};

use crate::Network;

/// Read a logic network from a file
///
/// Following extensions are supported: .bench
pub fn read_network_file(path: &PathBuf) -> Network {
    let ext = path.extension();
    match ext {
        None => panic!("No extension given"),
        Some(s) => {
            if s == "bench" {
                let f = File::open(path).unwrap();
                read_bench(f).unwrap()
            } else {
                panic!("Unknown extension {}", s.to_string_lossy());
            }
        }
    }
}

/// Write a logic network to a file
///
/// Following extensions are supported: .bench
pub fn write_network_file(path: &PathBuf, ntk: &Network) {
    let ext = path.extension();
    match ext {
        None => panic!("No extension given"),
        Some(s) => {
            if s == "bench" {
                let mut f = File::create(path).unwrap();
                write_bench(&mut f, ntk);
            } else {
                panic!("Unknown extension {}", s.to_string_lossy());
            }
        }
    }
}
