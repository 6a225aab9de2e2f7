use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Flat property bag of a catalog feature
pub type Properties = BTreeMap<String, PropertyValue>;

/// Property keys written into every feature record
pub mod keys {
    pub const PRODUCT_IDENTIFIER: &str = "productIdentifier";
    pub const TITLE: &str = "title";
    pub const RESOURCE_SIZE: &str = "resourceSize";
    pub const AUTHORITY: &str = "authority";
    pub const START_DATE: &str = "startDate";
    pub const COMPLETION_DATE: &str = "completionDate";
    pub const PRODUCT_TYPE: &str = "productType";
    pub const PROCESSING_LEVEL: &str = "processingLevel";
    pub const PLATFORM: &str = "platform";
    pub const SENSOR_MODE: &str = "sensorMode";
    pub const ORBIT_NUMBER: &str = "orbitNumber";
    pub const ORBIT_DIRECTION: &str = "orbitDirection";
    pub const SWATH: &str = "swath";
    pub const POLARISATION: &str = "polarisation";
    pub const MISSION_TAKE_ID: &str = "missionTakeId";
    pub const INSTRUMENT: &str = "instrument";
    pub const LOCATION: &str = "location";
    pub const CLOUD_COVER: &str = "cloudCover";
}

/// Product XML schema generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaVariant {
    /// Flat `<product>` metadata with a WKT footprint
    Modern,
    /// Annotation-style product carrying an `adsHeader` and a geolocation grid
    Legacy,
}

impl std::fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaVariant::Modern => write!(f, "modern"),
            SchemaVariant::Legacy => write!(f, "legacy"),
        }
    }
}

/// Satellite pass direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrbitDirection {
    Ascending,
    Descending,
}

impl OrbitDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrbitDirection::Ascending => "ascending",
            OrbitDirection::Descending => "descending",
        }
    }
}

impl std::fmt::Display for OrbitDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrbitDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ascending" => Ok(OrbitDirection::Ascending),
            "descending" => Ok(OrbitDirection::Descending),
            _ => Err(s.trim().to_string()),
        }
    }
}

/// Geographic vertex, serialized as `[lon, lat]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat(pub f64, pub f64);

impl LonLat {
    pub fn lon(&self) -> f64 {
        self.0
    }

    pub fn lat(&self) -> f64 {
        self.1
    }
}

/// Feature geometry. Only polygons with a single outer ring are produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<LonLat>> },
}

impl Geometry {
    pub fn polygon(outer_ring: Vec<LonLat>) -> Self {
        Geometry::Polygon {
            coordinates: vec![outer_ring],
        }
    }

    /// Outer ring of the polygon
    pub fn exterior(&self) -> &[LonLat] {
        match self {
            Geometry::Polygon { coordinates } => {
                coordinates.first().map(Vec::as_slice).unwrap_or(&[])
            }
        }
    }
}

/// Scalar property value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Integer(i64),
    Text(String),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

/// Normalized catalog feature built from one product document
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub geometry: Geometry,
    pub properties: Properties,
}

impl FeatureRecord {
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Text value of a property, `None` when absent or not text
    pub fn text(&self, key: &str) -> Option<&str> {
        self.property(key).and_then(PropertyValue::as_str)
    }

    pub fn ring(&self) -> &[LonLat] {
        self.geometry.exterior()
    }

    /// Render as a GeoJSON Feature
    pub fn to_geojson(&self) -> FeatureResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut feature = serializer.serialize_struct("Feature", 3)?;
        feature.serialize_field("type", "Feature")?;
        feature.serialize_field("geometry", &self.geometry)?;
        feature.serialize_field("properties", &self.properties)?;
        feature.end()
    }
}

/// Error types for product-to-feature conversion
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value '{value}' for field {field}")]
    InvalidField { field: String, value: String },

    #[error("Geometry extraction error: {0}")]
    GeometryExtraction(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for feature conversion
pub type FeatureResult<T> = Result<T, FeatureError>;
