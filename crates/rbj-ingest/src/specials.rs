//! Parser for the specials mini-language (`key=value,key=value`).

use rbj_model::{Specials, SpecialsError};

/// Parse a specials cell into a [`Specials`] map.
///
/// Entries are separated by `,` and split on their first `=`; keys and
/// values are trimmed. A blank cell yields an empty map.
pub fn parse_specials(input: &str) -> Result<Specials, SpecialsError> {
    let mut specials = Specials::new();
    if input.trim().is_empty() {
        return Ok(specials);
    }
    for entry in input.split(',') {
        let Some((key, value)) = entry.split_once('=') else {
            return Err(SpecialsError::MissingEquals {
                entry: entry.trim().to_string(),
            });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(SpecialsError::EmptyKey {
                entry: entry.trim().to_string(),
            });
        }
        specials.insert(key, value.trim())?;
    }
    Ok(specials)
}
