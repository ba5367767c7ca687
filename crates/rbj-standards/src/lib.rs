//! Standard rule tables.
//!
//! Turns a feature class listing into ready-to-convert rule tables covering
//! the check kinds that need no hand-picked parameters.

pub mod error;
pub mod feature_classes;
pub mod generator;

pub use error::StandardsError;
pub use feature_classes::{FeatureClass, load_feature_classes, read_feature_classes};
pub use generator::{
    DUPLICATE_VERTEX_SPECIALS, GeneratedRule, RuleTable, SKIPPED_KINDS, generate_rule_tables,
    write_rule_table, write_rule_tables,
};
