//! Transfer flows for a tree store configuration subtree.
//!
//! Three flows share one write primitive:
//! - [`export`]: walk a subtree depth-first into an [`ExportDocument`]
//! - [`import`]: write an [`ImportDocument`] back, node by node
//! - [`update`]: write values read from a workbook or a flat JSON map
//!
//! Writes go through [`upsert`], which creates a missing node together with
//! its ancestors or overwrites an existing one, and every write is confined
//! to a [`Scope`]. A failed write is recorded in the [`Report`] and the flow
//! moves on; only problems with the input itself are returned as
//! [`TransferError`].
//!
//! # Example
//!
//! ```rust
//! use zktool_transfer::{export, import, ImportDocument, Report, Scope, WritePolicy};
//! use zktool_tree_store::{MemoryTree, NodePath};
//!
//! let mut source = MemoryTree::new();
//! source.put(&NodePath::parse("/config/product/svc/timeout").unwrap(), "30");
//!
//! let scope = Scope::config();
//! let mut dump = Vec::new();
//! export(&mut source, scope.root()).write_to(&mut dump).unwrap();
//!
//! let document = ImportDocument::from_reader(dump.as_slice()).unwrap();
//! let mut target = MemoryTree::new();
//! let mut report = Report::new();
//! import(&mut target, &document, &scope, WritePolicy::default(), &mut report);
//!
//! assert_eq!(source.snapshot(), target.snapshot());
//! ```

mod error;
mod export;
mod import;
mod report;
mod scope;
mod update;
mod upsert;

pub use error::TransferError;
pub use export::{export, ExportDocument, NodeRecord};
pub use import::{import, ImportDocument, ImportRecord};
pub use report::{Outcome, Report, ReportEntry, Summary};
pub use scope::{Scope, CONFIG_PREFIX};
pub use update::{
    flat_source_from_str, read_flat, read_workbook, tabular_source, update, Assignment, Columns,
    SourceFormat, UpdateSource, DEFAULT_PARAM_COLUMN, DEFAULT_PATH_COLUMN, DEFAULT_SHEET,
    DEFAULT_VALUE_COLUMN,
};
pub use upsert::{ensure_ancestors, upsert, UnknownPolicy, WritePolicy};
