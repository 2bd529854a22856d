//! Core property assignment.

use chrono::{NaiveDate, NaiveDateTime};
use docx_coreprop_config::{CoreProperties as PropertySettings, CoreProperty, PropertyKind};
use docx_coreprop_package::{CoreProperties, Document};
use tracing::info;

use crate::error::{ApplyError, ApplyResult};

/// Input format of date-valued properties, e.g. `01-Jan-2020`.
pub const DATE_FORMAT: &str = "%d-%b-%Y";

/// Assigns every resolved property, in fixed property order.
///
/// Returns the number of properties written. Dates are validated before the
/// document is touched.
pub fn apply_properties(
    document: &mut Document,
    properties: &PropertySettings,
) -> ApplyResult<usize> {
    if properties.is_empty() {
        return Ok(0);
    }

    let mut resolved = Vec::new();
    for (property, value) in properties.iter() {
        let date = match property.kind() {
            PropertyKind::Date => Some(parse_date(property, value)?),
            PropertyKind::Text | PropertyKind::Integer => None,
        };
        resolved.push((property, value, date));
    }

    let core = document.core_properties_mut()?;
    for &(property, value, date) in &resolved {
        match date {
            Some(date) => set_date(core, property, date),
            None => set_text(core, property, value),
        }
        info!("{property} = {value}");
    }
    Ok(resolved.len())
}

/// Parses a `DD-Mon-YYYY` date into midnight of that day.
pub fn parse_date(property: CoreProperty, value: &str) -> ApplyResult<NaiveDateTime> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ApplyError::InvalidDate {
            property,
            value: value.to_owned(),
        })
}

fn set_date(core: &mut CoreProperties, property: CoreProperty, date: NaiveDateTime) {
    match property {
        CoreProperty::Created => core.set_created(date),
        CoreProperty::Modified => core.set_modified(date),
        _ => core.set_last_printed(date),
    }
}

fn set_text(core: &mut CoreProperties, property: CoreProperty, text: &str) {
    match property {
        CoreProperty::Author => core.set_author(text),
        CoreProperty::Category => core.set_category(text),
        CoreProperty::Comments => core.set_comments(text),
        CoreProperty::ContentStatus => core.set_content_status(text),
        CoreProperty::Identifier => core.set_identifier(text),
        CoreProperty::Keywords => core.set_keywords(text),
        CoreProperty::Language => core.set_language(text),
        CoreProperty::LastModifiedBy => core.set_last_modified_by(text),
        CoreProperty::Revision => core.set_revision(text),
        CoreProperty::Subject => core.set_subject(text),
        CoreProperty::Title => core.set_title(text),
        CoreProperty::Version => core.set_version(text),
        CoreProperty::Created | CoreProperty::Modified | CoreProperty::LastPrinted => {}
    }
}
