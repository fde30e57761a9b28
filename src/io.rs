//! Read and write logic networks to files

mod bench;

use std::fs::File;
use std::path::Path;

pub use bench::{read_bench, write_bench};

use crate::error::Error;
use crate::Network;

/// Read a logic network from a file
///
/// Following extensions are supported: .bench
pub fn read_network_file(path: &Path) -> Result<Network, Error> {
    match path.extension() {
        Some(ext) if ext == "bench" => read_bench(File::open(path)?),
        Some(ext) => Err(Error::Config(format!(
            "unknown extension {}",
            ext.to_string_lossy()
        ))),
        None => Err(Error::Config("no extension given".to_string())),
    }
}

/// Write a logic network to a file
///
/// Following extensions are supported: .bench
pub fn write_network_file(path: &Path, net: &Network) -> Result<(), Error> {
    match path.extension() {
        Some(ext) if ext == "bench" => {
            let mut f = File::create(path)?;
            write_bench(&mut f, net)
        }
        Some(ext) => Err(Error::Config(format!(
            "unknown extension {}",
            ext.to_string_lossy()
        ))),
        None => Err(Error::Config("no extension given".to_string())),
    }
}
