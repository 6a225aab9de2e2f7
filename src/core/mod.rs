//! Core product-to-feature conversion

pub mod schema;
pub mod fields;
pub mod footprint;
pub mod location;
pub mod transform;

// Re-export main types
pub use schema::detect_schema;
pub use fields::{ExtractedFields, FieldMapping, LEGACY_FIELDS, MODERN_FIELDS};
pub use footprint::{footprint_from_grid, parse_wkt_polygon, reorder_safe_footprint, GridPoint};
pub use location::build_location;
pub use transform::{FeatureTransform, ProductTransformer, TransformConfig, VariantParser};
