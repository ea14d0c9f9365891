pub mod config;
pub mod error;
pub mod join;

use std::path::PathBuf;
use tracing::{info, instrument};

pub use config::{JoinConfig, JoinConfigBuilder, Preset};
pub use error::{Error, Result};
pub use join::{render, Diagnostic, RowPolicy, Table, TableJoiner};

/// Outcome of a successful [`run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinReport {
    pub output: PathBuf,
    /// Rows written, header excluded.
    pub rows: usize,
    /// Value columns per row, key column excluded.
    pub columns: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Read every input in order, render the joined table and write it to
/// `config.output`.
///
/// Nothing is written unless every input was read and every row rendered.
#[instrument(level = "info", skip(config), fields(output = %config.output.display()))]
pub fn run(config: &JoinConfig) -> Result<JoinReport> {
    config.validate()?;

    let mut joiner = TableJoiner::load_reference(&config.reference)?;
    for path in &config.additional {
        joiner.append_file(path)?;
    }

    let text = render(joiner.table(), &config.headers, &config.row_policy())?;
    join::write_atomic(&config.output, &text)?;

    let (table, diagnostics) = joiner.into_parts();
    info!(
        rows = table.len(),
        columns = config.column_count(),
        diagnostics = diagnostics.len(),
        "table written"
    );
    Ok(JoinReport {
        output: config.output.clone(),
        rows: table.len(),
        columns: config.column_count(),
        diagnostics,
    })
}
