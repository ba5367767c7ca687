//! Assembly of batch job documents from rule tables.

use std::io::Read;
use std::path::Path;

use tracing::{debug, info, info_span, warn};

use rbj_ingest::{RawRow, RuleTableReader};
use rbj_model::{BatchJobDocument, ConversionOptions, Result, RowWarning};

use crate::normalize::normalize_row;

/// A document together with the warnings raised while building it.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub document: BatchJobDocument,
    pub warnings: Vec<RowWarning>,
}

/// Normalize rows in order and collect them into a document.
///
/// The first failing row aborts assembly.
pub fn assemble<I>(rows: I) -> Result<Assembly>
where
    I: IntoIterator<Item = Result<RawRow>>,
{
    let mut assembly = Assembly::default();
    for row in rows {
        let row = row?;
        if let Some(adjustment) = row.adjustment {
            assembly.warnings.push(RowWarning::new(
                row.line,
                format!(
                    "expected {} cells, found {}; row was adjusted",
                    adjustment.expected, adjustment.found
                ),
            ));
        }
        let rule = normalize_row(&row, &mut assembly.warnings)?;
        debug!(line = rule.source_line, kind = %rule.kind(), "normalized rule");
        assembly.document.push(rule);
    }
    Ok(assembly)
}

/// Read a rule table from `reader` and assemble it.
pub fn convert_reader<R: Read>(reader: R, options: &ConversionOptions) -> Result<Assembly> {
    let rows = RuleTableReader::from_reader(reader, options.column_policy)?;
    assemble_table(rows)
}

/// Read and assemble the rule table at `path`.
///
/// The file is closed before this returns, whether or not assembly succeeds.
pub fn convert_path(path: &Path, options: &ConversionOptions) -> Result<Assembly> {
    let span = info_span!("convert", path = %path.display());
    let _guard = span.enter();
    let rows = RuleTableReader::from_path(path, options.column_policy)?;
    assemble_table(rows)
}

fn assemble_table<R: Read>(rows: RuleTableReader<R>) -> Result<Assembly> {
    if rows.header().is_none() {
        warn!("rule table is empty");
    }
    let assembly = assemble(rows)?;
    info!(
        rules = assembly.document.len(),
        warnings = assembly.warnings.len(),
        "assembled batch job document"
    );
    Ok(assembly)
}
