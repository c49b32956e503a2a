//! Flat view of the settings keyed by the generator's option names.

use crate::error::SettingsError;
use obs_domain::config::SiteSettings;
use serde_json::Value;
use std::collections::BTreeMap;

pub type Record = BTreeMap<String, Value>;

/// Every option under its upper-case name (`SITENAME`, `DEFAULT_PAGINATION`).
///
/// Disabled feeds and unset optional values appear as `null`.
///
/// # Errors
/// [`SettingsError::Serialize`] if a value cannot be represented as JSON
/// (e.g. a non UTF-8 path).
pub fn record(settings: &SiteSettings) -> Result<Record, SettingsError> {
    match serde_json::to_value(settings)? {
        Value::Object(map) => {
            Ok(map.into_iter().map(|(key, value)| (key.to_ascii_uppercase(), value)).collect())
        },
        other => Err(format!("settings serialized to a non-object value: {other}").into()),
    }
}

/// Looks up one option by name, in either case.
///
/// # Errors
/// Same as [`record`].
pub fn lookup(settings: &SiteSettings, key: &str) -> Result<Option<Value>, SettingsError> {
    let mut record = record(settings)?;
    Ok(record.remove(&key.to_ascii_uppercase()))
}
