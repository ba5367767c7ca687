//! Batch job output.
//!
//! Serializes a [`rbj_model::BatchJobDocument`] into the reviewer's batch
//! job XML format (`.rbj`).

mod batch_job;
mod common;
mod params;

pub use batch_job::{
    BatchJobOptions, CheckPlan, DEFAULT_DATABASE, DEFAULT_GROUP_NAME, DEFAULT_REVIEWER_VERSION, Resource, plan,
    render_batch_job, write_batch_job,
};
pub use common::{browse_name, derive_guid};
pub use params::{ParamValue, Parameter, SpatialRelation, parse_relation, tolerance_unit_code};
