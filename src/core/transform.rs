use crate::core::fields::{self, ExtractedFields};
use crate::core::footprint;
use crate::core::location::build_location;
use crate::core::schema::detect_schema;
use crate::io::XmlDocument;
use crate::types::{
    keys, FeatureError, FeatureRecord, FeatureResult, Geometry, LonLat, SchemaVariant,
};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Configuration for product-to-feature conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub percent_decode: bool,          // Payloads arrive URL-encoded from the ingestion queue
    pub check_coordinate_bounds: bool, // Reject vertices outside [-180, 180] x [-90, 90]
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            percent_decode: true,
            check_coordinate_bounds: true,
        }
    }
}

/// Per-schema extraction strategy
pub trait VariantParser: Send + Sync {
    fn variant(&self) -> SchemaVariant;

    /// Property bag and pass direction
    fn extract_fields(&self, doc: &XmlDocument) -> FeatureResult<ExtractedFields>;

    /// Footprint ring in SAFE vertex order, before reordering
    fn raw_footprint(&self, doc: &XmlDocument) -> FeatureResult<Vec<LonLat>>;
}

/// Flat product metadata with a WKT footprint
pub struct ModernParser;

impl VariantParser for ModernParser {
    fn variant(&self) -> SchemaVariant {
        SchemaVariant::Modern
    }

    fn extract_fields(&self, doc: &XmlDocument) -> FeatureResult<ExtractedFields> {
        fields::extract_modern_fields(doc)
    }

    fn raw_footprint(&self, doc: &XmlDocument) -> FeatureResult<Vec<LonLat>> {
        footprint::read_wkt_footprint(doc)
    }
}

/// Annotation products identified by their `adsHeader`
pub struct LegacyParser;

impl VariantParser for LegacyParser {
    fn variant(&self) -> SchemaVariant {
        SchemaVariant::Legacy
    }

    fn extract_fields(&self, doc: &XmlDocument) -> FeatureResult<ExtractedFields> {
        fields::extract_legacy_fields(doc)
    }

    fn raw_footprint(&self, doc: &XmlDocument) -> FeatureResult<Vec<LonLat>> {
        let points = footprint::read_grid_points(doc)?;
        footprint::footprint_from_grid(&points)
    }
}

impl SchemaVariant {
    pub fn parser(&self) -> &'static dyn VariantParser {
        match self {
            SchemaVariant::Modern => &ModernParser,
            SchemaVariant::Legacy => &LegacyParser,
        }
    }
}

/// Conversion of one raw product payload into a feature record
pub trait FeatureTransform: Send + Sync {
    fn transform(&self, raw: &str) -> FeatureResult<FeatureRecord>;
}

/// Sentinel-1 product converter
#[derive(Debug, Clone, Default)]
pub struct ProductTransformer {
    config: TransformConfig,
}

impl ProductTransformer {
    pub fn new(config: TransformConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Build a feature from an already parsed document
    pub fn transform_document(&self, doc: &XmlDocument) -> FeatureResult<FeatureRecord> {
        let variant = detect_schema(doc);
        let parser = variant.parser();

        let ExtractedFields {
            mut properties,
            orbit_direction,
        } = parser.extract_fields(doc)?;

        let raw_ring = parser.raw_footprint(doc)?;
        if self.config.check_coordinate_bounds {
            footprint::check_bounds(&raw_ring)?;
        }
        let ring = footprint::reorder_safe_footprint(&raw_ring, orbit_direction)?;

        let text = |key: &str| {
            properties
                .get(key)
                .and_then(|v| v.as_str())
                .map(str::to_owned)
                .ok_or_else(|| FeatureError::MissingField(key.to_string()))
        };
        let title = text(keys::TITLE)?;
        let location = build_location(&text(keys::START_DATE)?, &text(keys::PLATFORM)?, &title);
        properties.insert(keys::LOCATION.to_string(), location.into());

        log::debug!(
            "Converted {} product {} ({} pass, {} footprint vertices)",
            variant,
            title,
            orbit_direction,
            ring.len()
        );

        Ok(FeatureRecord {
            geometry: Geometry::polygon(ring),
            properties,
        })
    }

    /// Convert independent payloads, one result per input in input order
    pub fn transform_batch<S: AsRef<str> + Sync>(
        &self,
        inputs: &[S],
    ) -> Vec<FeatureResult<FeatureRecord>> {
        log::info!("Converting batch of {} products", inputs.len());

        #[cfg(feature = "parallel")]
        let results: Vec<_> = inputs
            .par_iter()
            .map(|raw| self.transform(raw.as_ref()))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = inputs
            .iter()
            .map(|raw| self.transform(raw.as_ref()))
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            log::warn!("{} of {} products failed to convert", failed, inputs.len());
        }
        results
    }
}

impl FeatureTransform for ProductTransformer {
    fn transform(&self, raw: &str) -> FeatureResult<FeatureRecord> {
        let doc = XmlDocument::from_payload(raw, self.config.percent_decode)?;
        self.transform_document(&doc)
    }
}
