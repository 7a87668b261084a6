pub mod candidate;
pub mod criteria;
pub mod job;
pub mod match_result;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// A TEXT column held a value outside the closed set of a domain enum.
#[derive(Debug, Error)]
#[error("unknown {kind} value '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Deserializes `null` as `T::default()`. The model sometimes emits `null`
/// where the prompt asked for a string or a list.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
