//! # zktool-cli
//!
//! Export, import and bulk update of the `/config/product` subtree of a
//! ZooKeeper ensemble.
//!
//! ## Usage
//!
//! ```bash
//! # Dump the subtree to a file
//! SOURCE_ZK=zk1:2181,zk2:2181 EXPORT_FILE=zk_export.json zktool export
//!
//! # Write it to another ensemble
//! TARGET_ZK=staging-zk:2181 IMPORT_FILE=zk_export.json zktool import
//!
//! # Apply values from a workbook (or a flat JSON map)
//! TARGET_ZK=staging-zk:2181 UPDATE_FILE=values.xlsx zktool update
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default
//! `info`); per-node results go to stdout.

pub mod commands;
pub mod config;

pub use commands::{run, run_with, Command, Error};
