//! Shared utilities for batch job serialization.

use std::io::Write;

use anyhow::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use sha2::{Digest, Sha256};

/// XML Schema instance namespace.
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// XML Schema namespace.
pub const XS_NS: &str = "http://www.w3.org/2001/XMLSchema";

/// Reviewer schema namespace.
pub const ESRI_NS: &str = "http://www.esri.com/schemas/ArcGIS/10.1";

/// Start tag carrying an `xsi:type` attribute.
pub fn typed_start<'a>(name: &'a str, xsi_type: &str) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    start.push_attribute(("xsi:type", xsi_type));
    start
}

/// Write a simple text element.
pub fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write a text element with an `xsi:type` attribute.
pub fn write_typed_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    xsi_type: &str,
    text: &str,
) -> Result<()> {
    writer.write_event(Event::Start(typed_start(name, xsi_type)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write an `esri:ArrayOfString` element holding `values`.
pub fn write_string_array<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    values: &[String],
) -> Result<()> {
    writer.write_event(Event::Start(typed_start(name, "esri:ArrayOfString")))?;
    for value in values {
        write_text_element(writer, "String", value)?;
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Derive a stable resource GUID from the batch job name, rule index and slot.
///
/// Formatted like the reviewer's own keys: uppercase hex in braces.
pub fn derive_guid(job_name: &str, rule_index: usize, slot: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(job_name.as_bytes());
    hasher.update([0u8]);
    hasher.update((rule_index as u64).to_le_bytes());
    hasher.update([0u8]);
    hasher.update(slot.as_bytes());
    let hex = hex::encode_upper(&hasher.finalize()[..16]);
    format!(
        "{{{}-{}-{}-{}-{}}}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

/// Last path component of a geodatabase path.
///
/// Both separators are accepted since rule tables are often authored
/// against Windows paths.
pub fn database_file_name(database: &str) -> &str {
    database
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(database)
}

/// Geodatabase name without its extension, as shown in the reviewer.
pub fn browse_name(database: &str) -> &str {
    let file_name = database_file_name(database);
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_guid_is_stable_and_braced() {
        let guid = derive_guid("rules.rbj", 0, "primary");
        assert_eq!(guid, derive_guid("rules.rbj", 0, "primary"));
        assert_eq!(guid.len(), 38);
        assert!(guid.starts_with('{') && guid.ends_with('}'));
        assert_eq!(guid, guid.to_uppercase());
        assert_ne!(guid, derive_guid("rules.rbj", 0, "secondary"));
        assert_ne!(guid, derive_guid("rules.rbj", 1, "primary"));
    }

    #[test]
    fn test_browse_name_handles_both_separators() {
        assert_eq!(browse_name(r"C:\data\topo.gdb"), "topo");
        assert_eq!(browse_name("/srv/gis/topo.gdb/"), "topo");
        assert_eq!(database_file_name(r"C:\data\topo.gdb"), "topo.gdb");
        assert_eq!(browse_name("topo"), "topo");
    }
}
