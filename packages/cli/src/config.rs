//! Environment configuration.
//!
//! Every flow is configured through environment variables. Values are
//! trimmed and an empty value counts as unset. Parsing goes through a
//! lookup function; [`env_lookup`] reads the process environment and tests
//! pass their own.

use std::path::PathBuf;
use std::time::Duration;

use zktool_transfer::{Columns, SourceFormat, TransferError, WritePolicy};
use zktool_tree_store::{ZkTreeClient, DEFAULT_CONNECT_TIMEOUT};

pub const SOURCE_ZK: &str = "SOURCE_ZK";
pub const EXPORT_FILE: &str = "EXPORT_FILE";
pub const TARGET_ZK: &str = "TARGET_ZK";
pub const IMPORT_FILE: &str = "IMPORT_FILE";
pub const UPDATE_FILE: &str = "UPDATE_FILE";
/// Older name for [`UPDATE_FILE`], read when it is unset.
pub const EXCEL_FILE: &str = "EXCEL_FILE";
pub const ZK_TIMEOUT_SECS: &str = "ZK_TIMEOUT_SECS";
pub const WRITE_POLICY: &str = "WRITE_POLICY";
pub const UPDATE_SHEET: &str = "UPDATE_SHEET";
pub const UPDATE_PATH_COLUMN: &str = "UPDATE_PATH_COLUMN";
pub const UPDATE_PARAM_COLUMN: &str = "UPDATE_PARAM_COLUMN";
pub const UPDATE_VALUE_COLUMN: &str = "UPDATE_VALUE_COLUMN";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{var} must be set")]
    Missing { var: &'static str },

    #[error("invalid {var}: {message}")]
    Invalid { var: &'static str, message: String },

    #[error(transparent)]
    Format(#[from] TransferError),
}

/// Read one variable, trimmed; empty is treated as unset.
fn lookup_var<L>(lookup: &L, var: &str) -> Option<String>
where
    L: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn require<L>(lookup: &L, var: &'static str) -> Result<String, ConfigError>
where
    L: Fn(&str) -> Option<String>,
{
    lookup_var(lookup, var).ok_or(ConfigError::Missing { var })
}

fn policy<L>(lookup: &L) -> Result<WritePolicy, ConfigError>
where
    L: Fn(&str) -> Option<String>,
{
    match lookup_var(lookup, WRITE_POLICY) {
        Some(value) => value.parse::<WritePolicy>().map_err(|e| ConfigError::Invalid {
            var: WRITE_POLICY,
            message: e.to_string(),
        }),
        None => Ok(WritePolicy::default()),
    }
}

/// Where and how to reach a store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub endpoints: Vec<String>,
    pub timeout: Duration,
}

impl Connection {
    fn from_lookup<L>(lookup: &L, var: &'static str) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let endpoints: Vec<String> = require(lookup, var)?
            .split(',')
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
            .map(String::from)
            .collect();
        if endpoints.is_empty() {
            return Err(ConfigError::Missing { var });
        }

        let timeout = match lookup_var(lookup, ZK_TIMEOUT_SECS) {
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        var: ZK_TIMEOUT_SECS,
                        message: format!("expected a positive number of seconds, not {:?}", value),
                    })
                }
            },
            None => DEFAULT_CONNECT_TIMEOUT,
        };

        Ok(Connection { endpoints, timeout })
    }

    pub fn connect(&self) -> Result<ZkTreeClient, zktool_tree_store::Error> {
        ZkTreeClient::connect(self.endpoints.as_slice(), self.timeout)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportConfig {
    pub source: Connection,
    pub output: PathBuf,
}

impl ExportConfig {
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        Ok(ExportConfig {
            source: Connection::from_lookup(&lookup, SOURCE_ZK)?,
            output: require(&lookup, EXPORT_FILE)?.into(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportConfig {
    pub target: Connection,
    pub input: PathBuf,
    pub policy: WritePolicy,
}

impl ImportConfig {
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        Ok(ImportConfig {
            target: Connection::from_lookup(&lookup, TARGET_ZK)?,
            input: require(&lookup, IMPORT_FILE)?.into(),
            policy: policy(&lookup)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateConfig {
    pub target: Connection,
    pub source: PathBuf,
    pub format: SourceFormat,
    pub columns: Columns,
    pub policy: WritePolicy,
}

impl UpdateConfig {
    /// The source format comes from the file extension, so an unsupported
    /// file fails here, before any connection is made.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let target = Connection::from_lookup(&lookup, TARGET_ZK)?;
        let source: PathBuf = lookup_var(&lookup, UPDATE_FILE)
            .or_else(|| lookup_var(&lookup, EXCEL_FILE))
            .ok_or(ConfigError::Missing { var: UPDATE_FILE })?
            .into();
        let format = SourceFormat::from_path(&source)?;

        let defaults = Columns::default();
        let columns = Columns {
            sheet: lookup_var(&lookup, UPDATE_SHEET).unwrap_or(defaults.sheet),
            base_path: lookup_var(&lookup, UPDATE_PATH_COLUMN).unwrap_or(defaults.base_path),
            parameter: lookup_var(&lookup, UPDATE_PARAM_COLUMN).unwrap_or(defaults.parameter),
            value: lookup_var(&lookup, UPDATE_VALUE_COLUMN).unwrap_or(defaults.value),
        };

        Ok(UpdateConfig {
            target,
            source,
            format,
            columns,
            policy: policy(&lookup)?,
        })
    }
}

/// Lookup over the process environment; a non-UTF-8 value counts as unset.
pub fn env_lookup(var: &str) -> Option<String> {
    std::env::var(var).ok()
}
