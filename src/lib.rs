//! s1feature: Sentinel-1 product metadata to catalog features
//!
//! Converts Sentinel-1 product XML, in either the current flat layout or the
//! legacy annotation layout, into GeoJSON-like feature records ready to be
//! indexed by a catalog. Footprints are rebuilt and reordered to the vertex
//! order served by the Copernicus data hub.

pub mod types;
pub mod io;
pub mod core;

// Re-export main types and functions for easier access
pub use types::{
    FeatureError, FeatureRecord, FeatureResult, Geometry, LonLat, OrbitDirection, PropertyValue,
    SchemaVariant,
};

pub use crate::io::{store_feature, FeatureStore, XmlDocument};
pub use crate::core::{detect_schema, FeatureTransform, ProductTransformer, TransformConfig};

#[cfg(feature = "python")]
mod python {
    use super::*;
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    fn to_py_err(e: FeatureError) -> PyErr {
        PyValueError::new_err(format!("{}", e))
    }

    /// Convert product XML into a GeoJSON Feature string
    #[pyfunction]
    #[pyo3(signature = (xml, percent_decode = true))]
    fn transform_product(xml: &str, percent_decode: bool) -> PyResult<String> {
        let transformer = ProductTransformer::new(TransformConfig {
            percent_decode,
            ..Default::default()
        });
        let record = transformer.transform(xml).map_err(to_py_err)?;
        record.to_geojson().map_err(to_py_err)
    }

    /// Name of the schema variant a product XML follows
    #[pyfunction]
    fn detect_schema(xml: &str) -> PyResult<String> {
        let doc = XmlDocument::parse(xml).map_err(to_py_err)?;
        Ok(crate::core::detect_schema(&doc).to_string())
    }

    /// Python module definition
    #[pymodule]
    fn _core(_py: Python, m: &PyModule) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(transform_product, m)?)?;
        m.add_function(wrap_pyfunction!(detect_schema, m)?)?;
        Ok(())
    }
}
