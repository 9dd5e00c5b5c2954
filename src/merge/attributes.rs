use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

use super::errors::MergeError;

/// A file-level metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Anything that is not a scalar; kept on read, never copied to output.
    Other(serde_json::Value),
}

impl AttrValue {
    pub fn is_scalar(&self) -> bool {
        !matches!(self, AttrValue::Other(_))
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::Int(i) => write!(f, "{i}"),
            AttrValue::Float(x) => write!(f, "{x:?}"),
            AttrValue::Str(s) => write!(f, "{s:?}"),
            AttrValue::Other(v) => write!(f, "{v}"),
        }
    }
}

pub type AttributeSet = IndexMap<String, AttrValue>;

fn describe(value: Option<&AttrValue>) -> String {
    value.map_or_else(|| "<missing>".to_string(), |v| v.to_string())
}

/// Verifies that `attribute` holds the same value in every file as in the first.
pub fn check_consistency<'a, I>(attribute: &str, files: I) -> Result<(), MergeError>
where
    I: IntoIterator<Item = (&'a PathBuf, &'a AttributeSet)>,
{
    let mut files = files.into_iter();
    let Some((first_file, first_attrs)) = files.next() else {
        return Ok(());
    };
    let reference = first_attrs.get(attribute);

    for (file, attrs) in files {
        let value = attrs.get(attribute);
        if value != reference {
            return Err(MergeError::AttributeMismatch {
                attribute: attribute.to_string(),
                first_file: first_file.display().to_string(),
                first_value: describe(reference),
                file: file.display().to_string(),
                value: describe(value),
            });
        }
    }
    Ok(())
}

/// Exact sum of `attribute` across files. Stays an integer when every value is one.
pub fn sum_attribute<'a, I>(attribute: &str, files: I) -> Result<AttrValue, MergeError>
where
    I: IntoIterator<Item = (&'a PathBuf, &'a AttributeSet)>,
{
    let mut int_total: Option<i64> = Some(0);
    let mut float_total = 0.0f64;

    for (file, attrs) in files {
        let value = attrs
            .get(attribute)
            .ok_or_else(|| MergeError::MissingAttribute {
                attribute: attribute.to_string(),
                file: file.display().to_string(),
            })?;

        match value {
            AttrValue::Int(i) => {
                int_total = int_total.and_then(|t| t.checked_add(*i));
                float_total += *i as f64;
            }
            AttrValue::Float(x) => {
                int_total = None;
                float_total += x;
            }
            other => {
                return Err(MergeError::NonNumericAttribute {
                    attribute: attribute.to_string(),
                    file: file.display().to_string(),
                    value: other.to_string(),
                });
            }
        }
    }

    Ok(match int_total {
        Some(total) => AttrValue::Int(total),
        None => AttrValue::Float(float_total),
    })
}

/// Copies `source` for the combined output, replacing `derived` with `value`.
///
/// Values that cannot be stored as attributes are logged and skipped.
pub fn derive_attributes(source: &AttributeSet, derived: &str, value: AttrValue) -> AttributeSet {
    let mut out = AttributeSet::with_capacity(source.len() + 1);
    for (name, attr) in source {
        if name == derived {
            continue;
        }
        if !attr.is_scalar() {
            warn!("ERROR adding the file attribute {}: {} is not a scalar", name, attr);
            continue;
        }
        out.insert(name.clone(), attr.clone());
    }
    out.insert(derived.to_string(), value);
    out
}
