//! Filesystem checks for the theme and plugins a build will load.
//!
//! Paths in the settings are relative to the directory holding the settings file.

use crate::error::SettingsError;
use obs_domain::config::SiteSettings;
use obs_domain::constants::BUILTIN_THEMES;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeLocation {
    /// Shipped with the generator; nothing to look up.
    Builtin(String),
    Directory(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginLocation {
    pub name: String,
    /// Package directory or `.py` module the generator will import.
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub theme: ThemeLocation,
    pub plugins: Vec<PluginLocation>,
}

/// Resolves the theme and every plugin against `base_dir`.
///
/// # Errors
/// [`SettingsError::ThemeNotFound`] or [`SettingsError::PluginNotFound`] for the
/// first entry that cannot be resolved. Missing content directories only warn.
pub fn locate(settings: &SiteSettings, base_dir: &Path) -> Result<Located, SettingsError> {
    let theme = locate_theme(&settings.theme, base_dir)?;

    let search: Vec<PathBuf> =
        settings.plugin_paths.iter().map(|dir| resolve(base_dir, dir)).collect();
    let plugins = settings
        .plugins
        .iter()
        .map(|name| locate_plugin(name, &search))
        .collect::<Result<Vec<_>, _>>()?;

    warn_missing_content(settings, base_dir);

    debug!(theme = ?theme, plugins = plugins.len(), "Theme and plugins located");
    Ok(Located { theme, plugins })
}

fn locate_theme(theme: &str, base_dir: &Path) -> Result<ThemeLocation, SettingsError> {
    if BUILTIN_THEMES.contains(&theme) {
        return Ok(ThemeLocation::Builtin(theme.to_owned()));
    }

    let dir = resolve(base_dir, Path::new(theme));
    if dir.is_dir() {
        Ok(ThemeLocation::Directory(dir))
    } else {
        Err(SettingsError::ThemeNotFound { theme: theme.to_owned(), searched: dir, context: None })
    }
}

fn locate_plugin(name: &str, search: &[PathBuf]) -> Result<PluginLocation, SettingsError> {
    // `liquid_tags.img` lives at `liquid_tags/img`.
    let relative: PathBuf = name.split('.').collect();

    for dir in search {
        let package = dir.join(&relative);
        if package.is_dir() {
            return Ok(PluginLocation { name: name.to_owned(), path: package });
        }
        let module = package.with_extension("py");
        if module.is_file() {
            return Ok(PluginLocation { name: name.to_owned(), path: module });
        }
    }

    Err(SettingsError::PluginNotFound {
        plugin: name.to_owned(),
        searched: search.to_vec(),
        context: None,
    })
}

fn warn_missing_content(settings: &SiteSettings, base_dir: &Path) {
    let content = resolve(base_dir, &settings.path);
    if !content.is_dir() {
        warn!(path = %content.display(), "Content directory does not exist");
        return;
    }

    for entry in &settings.static_paths {
        let path = content.join(entry);
        if !path.exists() {
            warn!(path = %path.display(), "Static path does not exist");
        }
    }

    if let Some(src) = &settings.publications_src {
        let path = resolve(base_dir, src);
        if !path.is_file() {
            warn!(path = %path.display(), "Publications source does not exist");
        }
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() { path.to_path_buf() } else { base_dir.join(path) }
}
