//! I/O modules for decoding product payloads and handing features downstream

pub mod document;
pub mod store;

pub use document::{decode_input, XmlDocument, XmlElement};
pub use store::{store_feature, FeatureStore};
