//! Standard rule tables for a set of feature classes.
//!
//! One table is produced per check kind whose parameters can be chosen
//! without knowing the data. Unique ID and Geometry on Geometry rules need a
//! field or a partner feature class and are left to hand-written tables.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;
use tracing::{debug, info};

use rbj_ingest::COLUMN_HEADINGS;
use rbj_model::{CheckKind, DEFAULT_SEVERITY};

use crate::error::StandardsError;
use crate::feature_classes::FeatureClass;

/// Specials written for generated Duplicate Vertex rules.
pub const DUPLICATE_VERTEX_SPECIALS: &str = "Tolerance=5,ToleranceUnits=cm";

/// Check kinds that are never generated.
pub const SKIPPED_KINDS: [CheckKind; 2] = [CheckKind::UniqueId, CheckKind::GeometryOnGeometry];

/// One row of a generated rule table, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedRule {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub fc1: String,
    pub fcs1: String,
    pub sql1: String,
    pub fc2: String,
    pub fcs2: String,
    pub sql2: String,
    pub severity: String,
    pub notes: String,
    pub specials: String,
}

impl GeneratedRule {
    fn for_feature_class(kind: CheckKind, feature_class: &FeatureClass) -> Self {
        let name = feature_class.name.clone();
        Self {
            kind: kind.as_str().to_string(),
            title: format!("{name} {}", kind.as_str().to_lowercase()),
            fc2: if kind == CheckKind::DuplicateGeometry {
                name.clone()
            } else {
                String::new()
            },
            fc1: name,
            fcs1: String::new(),
            sql1: String::new(),
            fcs2: String::new(),
            sql2: String::new(),
            severity: DEFAULT_SEVERITY.to_string(),
            notes: String::new(),
            specials: if kind == CheckKind::DuplicateVertex {
                DUPLICATE_VERTEX_SPECIALS.to_string()
            } else {
                String::new()
            },
        }
    }
}

/// Generated rules of a single check kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    pub kind: CheckKind,
    pub rules: Vec<GeneratedRule>,
}

impl RuleTable {
    /// File name of the table, e.g. `Duplicate_Vertex.csv`.
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.kind.as_str().replace(' ', "_"))
    }
}

/// Build one table per generated check kind, in catalog order.
///
/// A feature class gets a rule in every table whose kind supports its
/// geometry type. Tables without matching feature classes are kept, empty.
pub fn generate_rule_tables(feature_classes: &[FeatureClass]) -> Vec<RuleTable> {
    CheckKind::ALL
        .into_iter()
        .filter(|kind| !SKIPPED_KINDS.contains(kind))
        .map(|kind| {
            let rules: Vec<GeneratedRule> = feature_classes
                .iter()
                .filter(|fc| kind.supports(fc.geometry))
                .map(|fc| GeneratedRule::for_feature_class(kind, fc))
                .collect();
            debug!(kind = %kind, rules = rules.len(), "generated rule table");
            RuleTable { kind, rules }
        })
        .collect()
}

/// Write a rule table with the standard header.
pub fn write_rule_table<W: Write>(writer: W, table: &RuleTable) -> io::Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    writer.write_record(COLUMN_HEADINGS)?;
    for rule in &table.rules {
        writer.serialize(rule)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write every table into `dir` and return the written paths.
pub fn write_rule_tables(dir: &Path, tables: &[RuleTable]) -> Result<Vec<PathBuf>, StandardsError> {
    fs::create_dir_all(dir).map_err(|source| StandardsError::io(dir, source))?;
    let mut paths = Vec::with_capacity(tables.len());
    for table in tables {
        let path = dir.join(table.file_name());
        let file = File::create(&path).map_err(|source| StandardsError::io(&path, source))?;
        write_rule_table(BufWriter::new(file), table)
            .map_err(|source| StandardsError::io(&path, source))?;
        info!(path = %path.display(), rules = table.rules.len(), "wrote rule table");
        paths.push(path);
    }
    Ok(paths)
}
