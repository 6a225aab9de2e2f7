//! Property extraction for both product schema generations
//!
//! Each variant is described by a table mapping feature properties to the
//! product element they are read from. All mapped elements are required.

use crate::io::XmlDocument;
use crate::types::{keys, FeatureError, FeatureResult, OrbitDirection, Properties, PropertyValue};

/// Catalog authority stamped on every Sentinel-1 feature
pub const AUTHORITY: &str = "ESA";

/// Legacy products do not encode a processing level
pub const LEGACY_PROCESSING_LEVEL: &str = "LEVEL1";

/// Sentinel-1 SAR carries no cloud information
pub const CLOUD_COVER: i64 = 0;

/// Feature property read from a named product element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    pub property: &'static str,
    pub element: &'static str,
}

const fn field(property: &'static str, element: &'static str) -> FieldMapping {
    FieldMapping { property, element }
}

pub const MODERN_FIELDS: &[FieldMapping] = &[
    field(keys::PRODUCT_IDENTIFIER, "title"),
    field(keys::TITLE, "title"),
    field(keys::RESOURCE_SIZE, "resourceSize"),
    field(keys::START_DATE, "startTime"),
    field(keys::COMPLETION_DATE, "stopTime"),
    field(keys::PRODUCT_TYPE, "productType"),
    field(keys::PROCESSING_LEVEL, "processingLevel"),
    field(keys::PLATFORM, "missionId"),
    field(keys::SENSOR_MODE, "mode"),
    field(keys::ORBIT_NUMBER, "absoluteOrbitNumber"),
    field(keys::SWATH, "swath"),
    field(keys::POLARISATION, "polarisation"),
    field(keys::MISSION_TAKE_ID, "missiontakeid"),
    field(keys::INSTRUMENT, "instrument"),
];

pub const LEGACY_FIELDS: &[FieldMapping] = &[
    field(keys::PRODUCT_IDENTIFIER, "title"),
    field(keys::TITLE, "title"),
    field(keys::RESOURCE_SIZE, "resourceSize"),
    field(keys::START_DATE, "startTime"),
    field(keys::COMPLETION_DATE, "stopTime"),
    field(keys::PRODUCT_TYPE, "productType"),
    field(keys::PLATFORM, "missionId"),
    field(keys::SENSOR_MODE, "mode"),
    field(keys::ORBIT_NUMBER, "absoluteOrbitNumber"),
    field(keys::SWATH, "swath"),
    field(keys::POLARISATION, "polarisation"),
    field(keys::MISSION_TAKE_ID, "missionDataTakeId"),
];

pub const MODERN_ORBIT_DIRECTION: &str = "orbitDirection";
pub const LEGACY_ORBIT_DIRECTION: &str = "pass";

/// Properties pulled from a document plus the pass direction needed by the
/// footprint correction
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    pub properties: Properties,
    pub orbit_direction: OrbitDirection,
}

/// Text of a required element, blank counts as missing
pub fn required_text<'a>(doc: &'a XmlDocument, element: &str) -> FeatureResult<&'a str> {
    doc.text_of(element)
        .ok_or_else(|| FeatureError::MissingField(element.to_string()))
}

/// Read every mapped element into a property bag
pub fn map_fields(doc: &XmlDocument, mappings: &[FieldMapping]) -> FeatureResult<Properties> {
    let mut properties = Properties::new();
    for mapping in mappings {
        let value = required_text(doc, mapping.element)?;
        properties.insert(mapping.property.to_string(), value.into());
    }
    Ok(properties)
}

pub fn extract_orbit_direction(doc: &XmlDocument, element: &str) -> FeatureResult<OrbitDirection> {
    required_text(doc, element)?
        .parse()
        .map_err(|value| FeatureError::InvalidField {
            field: element.to_string(),
            value,
        })
}

pub fn extract_modern_fields(doc: &XmlDocument) -> FeatureResult<ExtractedFields> {
    let properties = map_fields(doc, MODERN_FIELDS)?;
    let orbit_direction = extract_orbit_direction(doc, MODERN_ORBIT_DIRECTION)?;
    Ok(finish(properties, orbit_direction))
}

pub fn extract_legacy_fields(doc: &XmlDocument) -> FeatureResult<ExtractedFields> {
    let mut properties = map_fields(doc, LEGACY_FIELDS)?;
    properties.insert(
        keys::PROCESSING_LEVEL.to_string(),
        LEGACY_PROCESSING_LEVEL.into(),
    );
    let orbit_direction = extract_orbit_direction(doc, LEGACY_ORBIT_DIRECTION)?;
    Ok(finish(properties, orbit_direction))
}

fn finish(mut properties: Properties, orbit_direction: OrbitDirection) -> ExtractedFields {
    properties.insert(keys::AUTHORITY.to_string(), AUTHORITY.into());
    properties.insert(
        keys::ORBIT_DIRECTION.to_string(),
        orbit_direction.as_str().into(),
    );
    properties.insert(
        keys::CLOUD_COVER.to_string(),
        PropertyValue::Integer(CLOUD_COVER),
    );
    ExtractedFields {
        properties,
        orbit_direction,
    }
}
