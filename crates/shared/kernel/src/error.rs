use crate::url::TemplateError;
use crate::validate::Issue;
use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Everything that can stop a settings load. All of it is fatal for a build.
#[obs_derive::obs_error]
pub enum SettingsError {
    /// The source could not be read, parsed, or mapped onto the schema
    /// (missing file, syntax error, duplicate key, wrong value type, unknown option).
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    /// The record has the right shape but inconsistent values.
    #[error("Invalid settings{}:{}", format_context(.context), list_issues(.issues))]
    Invalid { issues: Vec<Issue>, context: Option<Cow<'static, str>> },

    #[error("Theme `{theme}` not found{}: no directory at {}", format_context(.context), .searched.display())]
    ThemeNotFound { theme: String, searched: PathBuf, context: Option<Cow<'static, str>> },

    #[error("Plugin `{plugin}` not found{}: searched {}", format_context(.context), list_paths(.searched))]
    PluginNotFound { plugin: String, searched: Vec<PathBuf>, context: Option<Cow<'static, str>> },

    #[error("URL template error{}: {source}", format_context(.context))]
    Template { source: TemplateError, context: Option<Cow<'static, str>> },

    #[error("Serialization error{}: {source}", format_context(.context))]
    Serialize { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Internal settings error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl SettingsError {
    /// Validation issues carried by [`SettingsError::Invalid`], empty otherwise.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        match self {
            Self::Invalid { issues, .. } => issues,
            _ => &[],
        }
    }
}

fn list_issues(issues: &[Issue]) -> String {
    issues.iter().fold(String::new(), |mut out, issue| {
        let _ = write!(out, "\n  - {issue}");
        out
    })
}

fn list_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing (PLUGIN_PATHS is empty)".to_owned();
    }
    paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
}
