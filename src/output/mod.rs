//! Report formatters for duplicate scan results.
//!
//! Only JSON is supported: a checksum-keyed object of file record arrays.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::find_duplicates;
//! use dupescan::inventory::{InventoryBuilder, InventoryConfig};
//! use dupescan::output::JsonOutput;
//! use std::path::PathBuf;
//!
//! let builder = InventoryBuilder::new(InventoryConfig::default());
//! let (inventory, _stats) = builder.build(&[PathBuf::from(".")]).unwrap();
//! let groups = find_duplicates(&inventory);
//!
//! println!("{}", JsonOutput::new(&groups).to_json().unwrap());
//! ```

pub mod json;

// Re-export main types
pub use json::{read_report, JsonOutput, OutputError};
