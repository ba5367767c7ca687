//! Batch job (.rbj) document output.

use std::io::Write;

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use tracing::{debug, info};

use rbj_model::{BatchJobDocument, CheckKind, FeatureClassRef, Rule, RuleError, SpecialsPolicy};

use crate::common::{
    ESRI_NS, XS_NS, XSI_NS, browse_name, database_file_name, derive_guid, typed_start,
    write_string_array, write_text_element, write_typed_text_element,
};
use crate::params::{ParamValue, Parameter, check_config_version, plan_parameters};

/// Check group name used when none is configured.
pub const DEFAULT_GROUP_NAME: &str = "Auto-generated DR rules";

/// File geodatabase referenced when no database is configured.
pub const DEFAULT_DATABASE: &str = r"C:\arcgis\test\DataReviewer\testdata.gdb";

/// Reviewer version written when none is configured.
pub const DEFAULT_REVIEWER_VERSION: &str = "10.1";

/// Options for batch job output.
#[derive(Debug, Clone)]
pub struct BatchJobOptions {
    /// Batch job name, usually the output file name.
    pub name: String,
    /// Geodatabase the checks run against.
    pub database: String,
    pub creator: String,
    pub creation_date: String,
    pub editor: String,
    pub edit_date: String,
    pub version: String,
    pub group_name: String,
    pub specials_policy: SpecialsPolicy,
}

impl BatchJobOptions {
    pub fn new(name: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            database: database.into(),
            creator: String::new(),
            creation_date: String::new(),
            editor: String::new(),
            edit_date: String::new(),
            version: DEFAULT_REVIEWER_VERSION.to_string(),
            group_name: DEFAULT_GROUP_NAME.to_string(),
            specials_policy: SpecialsPolicy::default(),
        }
    }

    /// Set creator and editor to the same user.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.creator = author.into();
        self.editor = self.creator.clone();
        self
    }

    /// Set creation and edit date to the same value.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.creation_date = date.into();
        self.edit_date = self.creation_date.clone();
        self
    }

    pub fn with_specials_policy(mut self, policy: SpecialsPolicy) -> Self {
        self.specials_policy = policy;
        self
    }
}

/// A feature class reference with its resource key.
#[derive(Debug, Clone)]
pub struct Resource<'a> {
    pub key: String,
    pub reference: &'a FeatureClassRef,
}

/// Everything needed to write one rule, resolved before any output.
#[derive(Debug, Clone)]
pub struct CheckPlan<'a> {
    pub rule: &'a Rule,
    pub primary: Resource<'a>,
    pub secondary: Option<Resource<'a>>,
    pub parameters: Vec<Parameter>,
}

impl CheckPlan<'_> {
    pub fn kind(&self) -> CheckKind {
        self.rule.kind()
    }

    fn resources(&self) -> impl Iterator<Item = &Resource<'_>> {
        std::iter::once(&self.primary).chain(self.secondary.as_ref())
    }

    fn resource_string_cache(&self, database: &str) -> String {
        if self.kind() == CheckKind::UniqueId {
            return database_file_name(database).to_string();
        }
        let mut cache = cache_entry(self.primary.reference);
        if let Some(secondary) = &self.secondary {
            cache.push_str(", ");
            cache.push_str(&cache_entry(secondary.reference));
        }
        cache
    }
}

fn cache_entry(reference: &FeatureClassRef) -> String {
    match &reference.subtype {
        Some(subtype) => format!("{}:{subtype}", reference.name),
        None => reference.name.clone(),
    }
}

/// Resolve resource keys and parameters for every rule.
///
/// Fails on the first rule the batch job format cannot express.
pub fn plan<'a>(
    document: &'a BatchJobDocument,
    options: &BatchJobOptions,
) -> Result<Vec<CheckPlan<'a>>, RuleError> {
    document
        .iter()
        .enumerate()
        .map(|(index, rule)| {
            let parameters = plan_parameters(rule, options.specials_policy)?;
            Ok(CheckPlan {
                rule,
                primary: Resource {
                    key: derive_guid(&options.name, index, "primary"),
                    reference: &rule.primary,
                },
                secondary: rule.secondary().map(|reference| Resource {
                    key: derive_guid(&options.name, index, "secondary"),
                    reference,
                }),
                parameters,
            })
        })
        .collect()
}

/// Serialize `document` as a batch job into `writer`.
///
/// All rules are planned first, so nothing is written when a rule cannot be
/// expressed.
pub fn write_batch_job<W: Write>(
    writer: W,
    document: &BatchJobDocument,
    options: &BatchJobOptions,
) -> Result<()> {
    let plans = plan(document, options)?;
    let mut xml = Writer::new_with_indent(writer, b' ', 2);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    let mut root = BytesStart::new("BatchJob");
    root.push_attribute(("xmlns:xsi", XSI_NS));
    root.push_attribute(("xmlns:xs", XS_NS));
    root.push_attribute(("xmlns:esri", ESRI_NS));
    root.push_attribute(("xsi:type", "esri:BatchJob"));
    xml.write_event(Event::Start(root))?;

    write_text_element(&mut xml, "Name", &options.name)?;
    write_text_element(&mut xml, "Creator", &options.creator)?;
    write_text_element(&mut xml, "CreationDate", &options.creation_date)?;
    write_text_element(&mut xml, "Editor", &options.editor)?;
    write_text_element(&mut xml, "EditDate", &options.edit_date)?;
    write_text_element(&mut xml, "Version", &options.version)?;

    write_filters(&mut xml, &plans).context("write filters")?;
    write_data_sources(&mut xml, &plans, &options.database).context("write data sources")?;
    write_workspaces(&mut xml, &plans, &options.database).context("write workspaces")?;

    xml.write_event(Event::Start(typed_start("CheckGroups", "esri:ArrayOfCheckGroup")))?;
    xml.write_event(Event::Start(typed_start("CheckGroup", "esri:CheckGroup")))?;
    write_text_element(&mut xml, "Name", &options.group_name)?;
    xml.write_event(Event::Start(typed_start("Checks", "esri:ArrayOfRevCheckConfig")))?;
    for check in &plans {
        write_check(&mut xml, check, &options.database)
            .with_context(|| format!("write check for line {}", check.rule.source_line))?;
    }
    xml.write_event(Event::End(BytesEnd::new("Checks")))?;
    xml.write_event(Event::End(BytesEnd::new("CheckGroup")))?;
    xml.write_event(Event::End(BytesEnd::new("CheckGroups")))?;

    xml.write_event(Event::End(BytesEnd::new("BatchJob")))?;
    xml.get_mut().flush().context("flush batch job")?;
    info!(checks = plans.len(), name = %options.name, "wrote batch job");
    Ok(())
}

/// Serialize `document` as a batch job into memory.
pub fn render_batch_job(document: &BatchJobDocument, options: &BatchJobOptions) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_batch_job(&mut buffer, document, options)?;
    Ok(buffer)
}

fn start_property_set<W: Write>(xml: &mut Writer<W>, name: &str) -> Result<()> {
    xml.write_event(Event::Start(typed_start(name, "esri:PropertySet")))?;
    xml.write_event(Event::Start(typed_start(
        "PropertyArray",
        "esri:ArrayOfPropertySetProperty",
    )))?;
    Ok(())
}

fn end_property_set<W: Write>(xml: &mut Writer<W>, name: &str) -> Result<()> {
    xml.write_event(Event::End(BytesEnd::new("PropertyArray")))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_filters<W: Write>(xml: &mut Writer<W>, plans: &[CheckPlan<'_>]) -> Result<()> {
    start_property_set(xml, "Filters")?;
    for resource in plans.iter().flat_map(CheckPlan::resources) {
        let reference = resource.reference;
        xml.write_event(Event::Start(typed_start(
            "PropertySetProperty",
            "esri:PropertySetProperty",
        )))?;
        write_text_element(xml, "Key", &resource.key)?;
        xml.write_event(Event::Start(typed_start("Value", "esri:ArrayOfFilter")))?;
        if let Some(where_clause) = &reference.where_clause {
            xml.write_event(Event::Start(typed_start("Filter", "esri:SqlFilter")))?;
            write_text_element(xml, "FeatureClass", &reference.name)?;
            write_text_element(xml, "WhereClause", where_clause)?;
            xml.write_event(Event::End(BytesEnd::new("Filter")))?;
        }
        if let Some(subtype) = &reference.subtype {
            xml.write_event(Event::Start(typed_start("Filter", "esri:SubtypeFilter")))?;
            write_text_element(xml, "FeatureClass", &reference.name)?;
            write_text_element(xml, "Subtype", subtype)?;
            xml.write_event(Event::End(BytesEnd::new("Filter")))?;
        }
        xml.write_event(Event::End(BytesEnd::new("Value")))?;
        xml.write_event(Event::End(BytesEnd::new("PropertySetProperty")))?;
    }
    end_property_set(xml, "Filters")
}

fn write_data_sources<W: Write>(
    xml: &mut Writer<W>,
    plans: &[CheckPlan<'_>],
    database: &str,
) -> Result<()> {
    let browse = browse_name(database);
    xml.write_event(Event::Start(typed_start("DataSources", "esri:ArrayOfDataSource")))?;
    for check in plans {
        for resource in check.resources() {
            let feature_class = if check.kind() == CheckKind::UniqueId {
                format!("{browse}.gdb")
            } else {
                resource.reference.name.clone()
            };
            xml.write_event(Event::Start(typed_start("DataSource", "esri:DataSource")))?;
            write_text_element(xml, "Key", &resource.key)?;
            write_text_element(xml, "Database", database)?;
            write_text_element(xml, "BrowseName", browse)?;
            write_text_element(xml, "FeatureClass", &feature_class)?;
            xml.write_event(Event::End(BytesEnd::new("DataSource")))?;
        }
    }
    xml.write_event(Event::End(BytesEnd::new("DataSources")))?;
    Ok(())
}

fn write_workspaces<W: Write>(
    xml: &mut Writer<W>,
    plans: &[CheckPlan<'_>],
    database: &str,
) -> Result<()> {
    start_property_set(xml, "Workspaces")?;
    for check in plans {
        for resource in check.resources() {
            let feature_class = if check.kind() == CheckKind::UniqueId {
                database_file_name(database)
            } else {
                resource.reference.name.as_str()
            };
            xml.write_event(Event::Start(typed_start(
                "PropertySetProperty",
                "esri:PropertySetProperty",
            )))?;
            write_text_element(xml, "Key", &resource.key)?;
            xml.write_event(Event::Start(typed_start("Value", "esri:WorkspaceName")))?;
            write_text_element(xml, "Database", database)?;
            write_text_element(xml, "FeatureClass", feature_class)?;
            xml.write_event(Event::End(BytesEnd::new("Value")))?;
            xml.write_event(Event::End(BytesEnd::new("PropertySetProperty")))?;
        }
    }
    end_property_set(xml, "Workspaces")
}

fn write_check<W: Write>(xml: &mut Writer<W>, check: &CheckPlan<'_>, database: &str) -> Result<()> {
    let rule = check.rule;
    let kind = check.kind();
    debug!(line = rule.source_line, kind = %kind, key = %check.primary.key, "writing check");

    xml.write_event(Event::Start(typed_start("RevCheckConfig", "esri:RevCheckConfig")))?;
    write_text_element(xml, "ResourceKey", &check.primary.key)?;
    write_text_element(xml, "ResourceStringCache", &check.resource_string_cache(database))?;
    write_text_element(xml, "Title", &rule.display_title())?;
    write_text_element(xml, "Notes", rule.notes.as_deref().unwrap_or_default())?;
    write_text_element(xml, "Severity", &rule.severity)?;
    write_text_element(xml, "CheckLongName", kind.as_str())?;
    write_text_element(xml, "RevCheckGUID", kind.guid())?;

    if let Some(secondary) = &check.secondary {
        start_property_set(xml, "SecondaryResourceKey")?;
        xml.write_event(Event::Start(typed_start(
            "PropertySetProperty",
            "esri:PropertySetProperty",
        )))?;
        write_text_element(xml, "Key", kind.short_name())?;
        write_typed_text_element(xml, "Value", "xs:string", &secondary.key)?;
        xml.write_event(Event::End(BytesEnd::new("PropertySetProperty")))?;
        end_property_set(xml, "SecondaryResourceKey")?;
        write_string_array(xml, "SecondaryKeyIndex", &[kind.short_name().to_string()])?;
    }

    let config_keys: Vec<String> = kind.config_keys().iter().map(ToString::to_string).collect();
    write_string_array(xml, "ConfigKeys", &config_keys)?;

    start_property_set(xml, "Parameters")?;
    for parameter in &check.parameters {
        write_parameter(xml, parameter)?;
    }
    end_property_set(xml, "Parameters")?;

    write_text_element(
        xml,
        "CheckConfigVersion",
        &check_config_version(kind).to_string(),
    )?;
    xml.write_event(Event::End(BytesEnd::new("RevCheckConfig")))?;
    Ok(())
}

fn write_parameter<W: Write>(xml: &mut Writer<W>, parameter: &Parameter) -> Result<()> {
    xml.write_event(Event::Start(typed_start(
        "PropertySetProperty",
        "esri:PropertySetProperty",
    )))?;
    write_text_element(xml, "Key", parameter.key)?;
    let xsi_type = parameter.value.xsi_type();
    match &parameter.value {
        ParamValue::Boolean(value) => {
            write_typed_text_element(xml, "Value", xsi_type, if *value { "true" } else { "false" })?
        }
        ParamValue::Int(value) => {
            write_typed_text_element(xml, "Value", xsi_type, &value.to_string())?
        }
        ParamValue::Double(value) => write_typed_text_element(xml, "Value", xsi_type, value)?,
        ParamValue::Strings(values) => write_string_array(xml, "Value", values)?,
    }
    xml.write_event(Event::End(BytesEnd::new("PropertySetProperty")))?;
    Ok(())
}
