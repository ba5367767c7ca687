//! Feature class listings exported from a geodatabase schema.
//!
//! The listing is a `;`-separated file with a `name;shape` header and an
//! optional `dataset` column. Shapes use the geodatabase names (`Polygon`,
//! `Polyline`, `Point`) or the single-letter codes.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::warn;

use rbj_model::GeometryType;

use crate::error::StandardsError;

/// A feature class and its geometry type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureClass {
    pub name: String,
    pub geometry: GeometryType,
    pub dataset: Option<String>,
}

impl FeatureClass {
    pub fn new(name: impl Into<String>, geometry: GeometryType) -> Self {
        Self {
            name: name.into(),
            geometry,
            dataset: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FeatureClassRecord {
    name: String,
    shape: String,
    #[serde(default)]
    dataset: Option<String>,
}

/// Load a feature class listing from disk.
pub fn load_feature_classes(path: &Path) -> Result<Vec<FeatureClass>, StandardsError> {
    let file = File::open(path).map_err(|source| StandardsError::io(path, source))?;
    read_listing(file, path)
}

/// Read a feature class listing from any reader.
pub fn read_feature_classes<R: Read>(reader: R) -> Result<Vec<FeatureClass>, StandardsError> {
    read_listing(reader, Path::new("<input>"))
}

fn read_listing<R: Read>(reader: R, path: &Path) -> Result<Vec<FeatureClass>, StandardsError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut feature_classes = Vec::new();
    for record in reader.deserialize::<FeatureClassRecord>() {
        let record = record.map_err(|err| StandardsError::csv(path, &err))?;
        let name = short_name(&record.name);
        if name.is_empty() {
            warn!(path = %path.display(), "skipping feature class without a name");
            continue;
        }
        let geometry = match record.shape.parse::<GeometryType>() {
            Ok(geometry) => geometry,
            Err(message) => {
                warn!(feature_class = name, %message, "skipping feature class");
                continue;
            }
        };
        feature_classes.push(FeatureClass {
            name: name.to_string(),
            geometry,
            dataset: record.dataset.filter(|dataset| !dataset.is_empty()),
        });
    }
    Ok(feature_classes)
}

/// Drop the owner or dataset qualifier from `dataset.fc`.
fn short_name(qualified: &str) -> &str {
    qualified
        .rsplit('.')
        .next()
        .unwrap_or(qualified)
        .trim()
}
