//! Conversion and generation steps shared by the commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{info, info_span, warn};

use rbj_core::{Assembly, convert_path};
use rbj_model::{
    BatchJobDocument, CheckKind, ColumnPolicy, ConversionOptions, RowWarning, SpecialsPolicy,
};
use rbj_report::{BatchJobOptions, DEFAULT_DATABASE, plan, render_batch_job};
use rbj_standards::{generate_rule_tables, load_feature_classes, write_rule_tables};

use crate::config::Config;

/// Settings for turning rule tables into batch jobs.
#[derive(Debug, Clone)]
pub struct ConvertSettings {
    pub conversion: ConversionOptions,
    pub specials_policy: SpecialsPolicy,
    pub database: String,
    pub creator: String,
    pub date: String,
    pub group_name: Option<String>,
    pub version: Option<String>,
}

impl ConvertSettings {
    /// Merge command-line values over the configuration file.
    ///
    /// Without a geodatabase from either source, [`DEFAULT_DATABASE`] is
    /// referenced.
    pub fn resolve(
        config: &Config,
        database: Option<&str>,
        lenient_columns: bool,
        strict_specials: bool,
    ) -> Self {
        let database = database
            .map(str::to_string)
            .or_else(|| config.batch_job.database.clone())
            .unwrap_or_else(|| {
                warn!(
                    database = DEFAULT_DATABASE,
                    "no geodatabase given, using the default"
                );
                DEFAULT_DATABASE.to_string()
            });
        let column_policy = if lenient_columns || config.conversion.lenient_columns {
            ColumnPolicy::Lenient
        } else {
            ColumnPolicy::Strict
        };
        let specials_policy = if strict_specials || config.conversion.strict_specials {
            SpecialsPolicy::Strict
        } else {
            SpecialsPolicy::Passthrough
        };
        Self {
            conversion: ConversionOptions::new().with_column_policy(column_policy),
            specials_policy,
            database,
            creator: config
                .batch_job
                .creator
                .clone()
                .unwrap_or_else(current_user),
            date: today(),
            group_name: config.batch_job.group_name.clone(),
            version: config.batch_job.version.clone(),
        }
    }

    /// Batch job options for an output named `name`.
    pub fn batch_job_options(&self, name: &str) -> BatchJobOptions {
        let mut options = BatchJobOptions::new(name, self.database.as_str())
            .with_author(self.creator.as_str())
            .with_date(self.date.as_str())
            .with_specials_policy(self.specials_policy);
        if let Some(group_name) = &self.group_name {
            options.group_name = group_name.clone();
        }
        if let Some(version) = &self.version {
            options.version = version.clone();
        }
        options
    }
}

/// Result of converting one rule table.
#[derive(Debug, Clone)]
pub struct ConvertOutcome {
    pub input: PathBuf,
    /// Written batch job; `None` for a dry run.
    pub output: Option<PathBuf>,
    pub document: BatchJobDocument,
    pub warnings: Vec<RowWarning>,
    pub bytes: usize,
}

/// Default output path: the input with its extension replaced by `.rbj`.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("rbj")
}

/// Convert `input` and write the batch job to `output`.
///
/// The document is rendered in full before anything is written, so a failed
/// conversion never leaves a partial file behind.
pub fn convert_file(
    input: &Path,
    output: &Path,
    settings: &ConvertSettings,
    dry_run: bool,
    name: Option<&str>,
) -> Result<ConvertOutcome> {
    let span = info_span!("convert_file", input = %input.display());
    let _guard = span.enter();

    let assembly = convert_path(input, &settings.conversion)
        .with_context(|| format!("convert {}", input.display()))?;
    let name = name.map(str::to_string).unwrap_or_else(|| file_name(output));
    let options = settings.batch_job_options(&name);
    let bytes = render_batch_job(&assembly.document, &options)
        .with_context(|| format!("render batch job for {}", input.display()))?;

    let written = if dry_run {
        info!(rules = assembly.document.len(), "dry run, not writing output");
        None
    } else {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(output, &bytes).with_context(|| format!("write {}", output.display()))?;
        info!(output = %output.display(), rules = assembly.document.len(), "wrote batch job");
        Some(output.to_path_buf())
    };

    Ok(ConvertOutcome {
        input: input.to_path_buf(),
        output: written,
        document: assembly.document,
        warnings: assembly.warnings,
        bytes: bytes.len(),
    })
}

/// Validate `input` as far as `convert_file` would, without rendering.
///
/// Rules are planned against the batch job format too, so relations,
/// tolerances and specials the serializer rejects are reported here.
pub fn check_file(
    input: &Path,
    conversion: &ConversionOptions,
    specials_policy: SpecialsPolicy,
) -> Result<Assembly> {
    let span = info_span!("check_file", input = %input.display());
    let _guard = span.enter();

    let assembly =
        convert_path(input, conversion).with_context(|| format!("check {}", input.display()))?;
    let options = BatchJobOptions::new(file_name(input), DEFAULT_DATABASE)
        .with_specials_policy(specials_policy);
    plan(&assembly.document, &options)
        .with_context(|| format!("check {}", input.display()))?;
    info!(rules = assembly.document.len(), "rule table is valid");
    Ok(assembly)
}

/// A rule table written by the generator.
#[derive(Debug, Clone)]
pub struct GeneratedTable {
    pub kind: CheckKind,
    pub path: PathBuf,
    pub rules: usize,
    pub converted: Option<ConvertOutcome>,
}

/// Write standard rule tables for a feature class listing, optionally
/// converting each one next to it.
pub fn generate_tables(
    listing: &Path,
    output_dir: &Path,
    convert: Option<&ConvertSettings>,
) -> Result<Vec<GeneratedTable>> {
    let span = info_span!("generate", listing = %listing.display());
    let _guard = span.enter();

    let feature_classes = load_feature_classes(listing)?;
    info!(feature_classes = feature_classes.len(), "loaded feature class listing");
    let tables = generate_rule_tables(&feature_classes);
    let paths = write_rule_tables(output_dir, &tables)?;

    tables
        .iter()
        .zip(paths)
        .map(|(table, path)| {
            let converted = match convert {
                Some(settings) => Some(convert_file(
                    &path,
                    &default_output_path(&path),
                    settings,
                    false,
                    None,
                )?),
                None => None,
            };
            Ok(GeneratedTable {
                kind: table.kind,
                path,
                rules: table.rules.len(),
                converted,
            })
        })
        .collect()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn current_user() -> String {
    std::env::var("USERNAME")
        .or_else(|_| std::env::var("USER"))
        .unwrap_or_default()
}

/// Today's date in the reviewer's style, e.g. "18 October 2026".
fn today() -> String {
    Local::now().format("%-d %B %Y").to_string()
}
