use crate::models::args::OutputFormat;
use anyhow::{Context, Result, bail};
use obs_kernel::config::SettingsLoader;
use obs_kernel::record::{Record, lookup, record};
use serde_json::Value;
use std::collections::BTreeMap;

/// Prints the whole record, or the value of `key`.
///
/// A single string value is printed bare so it can be used from scripts.
///
/// # Errors
/// Returns an error if the settings cannot be loaded, `key` names no option,
/// or the output cannot be serialized.
pub fn run(loader: &SettingsLoader, key: Option<&str>, format: OutputFormat) -> Result<()> {
    let settings = loader.load()?;

    let Some(key) = key else {
        let record = record(&settings)?;
        println!("{}", render(record, format)?);
        return Ok(());
    };

    let Some(value) = lookup(&settings, key)? else {
        bail!("Unknown option `{}`", key.to_ascii_uppercase());
    };

    match (value, format) {
        (Value::String(text), _) => println!("{text}"),
        (Value::Null, OutputFormat::Toml) => println!("# {} is not set", key.to_ascii_uppercase()),
        (value, OutputFormat::Json) => println!("{}", serde_json::to_string_pretty(&value)?),
        (value, OutputFormat::Toml) => {
            let single = BTreeMap::from([(key.to_ascii_uppercase(), value)]);
            print!("{}", render(single, OutputFormat::Toml)?);
        },
    }

    Ok(())
}

fn render(record: Record, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&record).context("Failed to serialize settings as JSON")
        },
        OutputFormat::Toml => {
            // TOML has no null; unset options are left out.
            let present: Record = record.into_iter().filter(|(_, v)| !v.is_null()).collect();
            toml::to_string(&present).context("Failed to serialize settings as TOML")
        },
    }
}
