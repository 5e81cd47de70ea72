//! Subcommand dispatch.
//!
//! Each command reads its configuration, loads and checks its input file,
//! and only then connects. The connection is dropped (and the session
//! closed) when the command returns.

use std::path::Path;

use clap::Subcommand;

use zktool_transfer::{
    export, import, update, ImportDocument, Report, Scope, Summary, TransferError, UpdateSource,
};
use zktool_tree_store::TreeClient;

use crate::config::{
    env_lookup, ConfigError, Connection, ExportConfig, ImportConfig, UpdateConfig,
};

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Dump the configuration subtree of SOURCE_ZK to EXPORT_FILE
    Export,
    /// Write the nodes in IMPORT_FILE to TARGET_ZK
    Import,
    /// Write values from UPDATE_FILE (a workbook or flat JSON map) to TARGET_ZK
    Update,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] zktool_tree_store::Error),

    #[error(transparent)]
    Transfer(#[from] TransferError),
}

/// Run `command` against the process environment and a live store.
pub fn run(command: Command) -> Result<(), Error> {
    run_with(command, env_lookup, |connection| connection.connect())
}

/// Run `command` with configuration from `lookup`, connecting through
/// `connect`.
///
/// Configuration and input problems are returned before `connect` is
/// called. Per-node failures do not make the run fail; they show up in the
/// printed report.
pub fn run_with<L, F, C>(command: Command, lookup: L, connect: F) -> Result<(), Error>
where
    L: Fn(&str) -> Option<String>,
    F: FnOnce(&Connection) -> Result<C, zktool_tree_store::Error>,
    C: TreeClient,
{
    let scope = Scope::config();

    match command {
        Command::Export => {
            let config = ExportConfig::from_lookup(lookup)?;
            let mut client = connect(&config.source)?;
            let count = export_to_file(&mut client, &scope, &config.output)?;
            println!("Exported {} nodes to {}", count, config.output.display());
            println!("Export done");
        }
        Command::Import => {
            let config = ImportConfig::from_lookup(lookup)?;
            let document = ImportDocument::load(&config.input)?;
            let mut client = connect(&config.target)?;

            let mut report = Report::printing();
            import(&mut client, &document, &scope, config.policy, &mut report);
            finish(report.summary(), "Import done");
        }
        Command::Update => {
            let config = UpdateConfig::from_lookup(lookup)?;
            let source = UpdateSource::load(&config.source, config.format, &config.columns)?;
            let mut client = connect(&config.target)?;

            let mut report = Report::printing();
            update(&mut client, &source, &scope, config.policy, &mut report);
            finish(report.summary(), "Update done");
        }
    }

    Ok(())
}

/// Export the scope's subtree to `output`, returning the node count.
pub fn export_to_file<C: TreeClient + ?Sized>(
    client: &mut C,
    scope: &Scope,
    output: &Path,
) -> Result<usize, TransferError> {
    let document = export(client, scope.root());
    document.save(output)?;
    log::info!("wrote {} nodes to {}", document.len(), output.display());
    Ok(document.len())
}

fn finish(summary: Summary, done: &str) {
    if summary.failed > 0 {
        log::warn!("{} nodes could not be written", summary.failed);
    }
    println!("{}", summary);
    println!("{}", done);
}
