//! Mapping free-form input onto the fixed ticket vocabularies.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A closed set of values with a symbolic name and a display label per member.
pub trait Vocabulary: Copy + Sized + 'static {
    /// Name of the enumeration, used in error messages.
    const KIND: &'static str;

    /// Every member, in declaration order.
    const MEMBERS: &'static [Self];

    /// Symbolic name (`in_progress`). This is the persisted form.
    fn name(self) -> &'static str;

    /// Display label (`In Progress`).
    fn label(self) -> &'static str;
}

/// Input matched no member of the target vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind} value: '{value}'")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

/// Resolve `raw` to a member of `V`.
///
/// Leading and trailing whitespace is ignored; the rest is compared
/// case-insensitively against both the symbolic name and the label.
pub fn normalize<V: Vocabulary>(raw: &str) -> Result<V, UnknownValue> {
    let wanted = raw.trim();
    V::MEMBERS
        .iter()
        .copied()
        .find(|member| {
            wanted.eq_ignore_ascii_case(member.name()) || wanted.eq_ignore_ascii_case(member.label())
        })
        .ok_or_else(|| UnknownValue {
            kind: V::KIND,
            value: raw.to_string(),
        })
}

/// What to do with an enum input that does not normalize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionPolicy {
    /// Substitute the field's default and carry on.
    #[default]
    Fallback,
    /// Reject the request.
    Strict,
}

impl CoercionPolicy {
    /// Normalize `raw`, applying this policy when it does not match.
    ///
    /// Absent or blank input always yields `default`.
    pub fn resolve<V: Vocabulary>(self, raw: Option<&str>, default: V) -> Result<V, UnknownValue> {
        let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
            return Ok(default);
        };

        match (normalize::<V>(raw), self) {
            (Ok(value), _) => Ok(value),
            (Err(_), CoercionPolicy::Fallback) => {
                tracing::warn!(
                    kind = V::KIND,
                    value = raw,
                    fallback = default.name(),
                    "Unrecognized value, using default"
                );
                Ok(default)
            }
            (Err(err), CoercionPolicy::Strict) => Err(err),
        }
    }
}
