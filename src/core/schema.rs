use crate::io::XmlDocument;
use crate::types::SchemaVariant;

/// Element only present in the legacy annotation layout
pub const LEGACY_MARKER: &str = "adsHeader";

/// Decide which product schema a document follows
pub fn detect_schema(doc: &XmlDocument) -> SchemaVariant {
    if doc.contains(LEGACY_MARKER) {
        SchemaVariant::Legacy
    } else {
        SchemaVariant::Modern
    }
}
