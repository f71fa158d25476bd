//! Base64 encoding for Kubernetes `Secret.data` values.

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Encode `bytes` with the standard alphabet, padded.
#[must_use]
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    STANDARD.encode(bytes)
}

/// Encode every value of `fields`, keeping the keys.
#[must_use]
pub fn encode_fields<K, V>(fields: &BTreeMap<K, V>) -> BTreeMap<K, String>
where
    K: Ord + Clone,
    V: AsRef<[u8]>,
{
    fields
        .iter()
        .map(|(key, value)| (key.clone(), encode(value)))
        .collect()
}
