use crate::core::transform::FeatureTransform;
use crate::types::{FeatureRecord, FeatureResult};

/// Downstream collaborator that persists or indexes feature records.
///
/// The converter does not know the storage format; implementations decide
/// where `collection` lives.
pub trait FeatureStore {
    fn store(&mut self, record: &FeatureRecord, collection: &str) -> FeatureResult<()>;
}

/// Transform a product payload delivered as one or more chunks and hand the
/// resulting record to `store`.
///
/// Chunks are concatenated in order before transforming. Nothing is stored
/// when the transform fails.
pub fn store_feature<T, S>(
    transformer: &T,
    store: &mut S,
    chunks: &[&str],
    collection: &str,
) -> FeatureResult<FeatureRecord>
where
    T: FeatureTransform + ?Sized,
    S: FeatureStore + ?Sized,
{
    let payload = chunks.concat();
    let record = transformer.transform(&payload)?;

    store.store(&record, collection)?;
    log::info!(
        "Stored {} in collection {}",
        record.text(crate::types::keys::TITLE).unwrap_or("<untitled>"),
        collection
    );

    Ok(record)
}
