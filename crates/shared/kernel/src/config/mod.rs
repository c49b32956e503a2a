use crate::error::{SettingsError, SettingsErrorExt};
use crate::locate::{Located, locate};
use crate::validate::ensure_valid;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, Map};
use fxhash::FxHashSet;
use obs_domain::config::{Settings, SiteSettings};
use serde::Deserializer;
use serde::de::{self, DeserializeOwned, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Settings file looked up when no path is given; the extension is resolved
/// by the loader (`pelicanconf.toml`, `pelicanconf.yaml`, `pelicanconf.json`).
pub const DEFAULT_SETTINGS_FILE: &str = "pelicanconf";

/// Prefix of environment overrides (`SITE__DEFAULT_PAGINATION=10`).
pub const ENV_PREFIX: &str = "SITE";

/// Options an environment override gives as a comma-separated list.
const LIST_OPTIONS: [&str; 5] =
    ["plugins", "plugin_paths", "static_paths", "markup", "direct_templates"];

/// Accepted settings formats by extension, in lookup order.
const FORMATS: [(&str, FileFormat); 4] = [
    ("toml", FileFormat::Toml),
    ("yaml", FileFormat::Yaml),
    ("yml", FileFormat::Yaml),
    ("json", FileFormat::Json),
];

/// Layered loader: a settings file, then environment overrides.
///
/// Nested keys use double underscores after the prefix
/// (`SITE__MATH_JAX__RESPONSIVE=True` maps to `math_jax.responsive`).
/// Override values are handed to `T` as text, so string options keep
/// exactly what was given.
///
/// # Errors
/// [`SettingsError::Config`] if the file is missing or unreadable, or its
/// content does not match `T`.
///
/// # Example
/// ```rust,no_run
/// use obs_kernel::config::load_config;
///
/// #[derive(serde::Deserialize)]
/// struct Partial {
///     sitename: String,
/// }
///
/// let partial: Partial = load_config(Some("site/pelicanconf"), "SITE").unwrap();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>, prefix: &str) -> Result<T, SettingsError>
where
    T: DeserializeOwned,
{
    let mut loader = SettingsLoader::new().env_prefix(prefix);
    if let Some(path) = path {
        loader = loader.path(path);
    }
    loader.load_as()
}

/// Loads the settings file at `path` with environment overrides, validated.
///
/// # Errors
/// See [`SettingsLoader::load`].
pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings, SettingsError> {
    SettingsLoader::new().path(path).load()
}

#[derive(Debug, Clone)]
enum Source {
    Path(PathBuf),
    Inline { text: String, format: FileFormat },
}

/// Builder for one settings load.
///
/// Files are TOML, YAML or JSON. A path without one of those extensions is
/// tried with each of them in turn. A key given twice is an error in every
/// format.
///
/// ```rust,no_run
/// use obs_kernel::config::SettingsLoader;
///
/// let settings = SettingsLoader::new()
///     .path("site/pelicanconf.toml")
///     .locate("site")
///     .load()?;
/// assert_eq!(settings.sitename, "Macroeconomic Observatory");
/// # Ok::<(), obs_kernel::error::SettingsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    source: Source,
    env_prefix: Option<String>,
    env_source: Option<Map<String, String>>,
    locate_in: Option<PathBuf>,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: Source::Path(PathBuf::from(DEFAULT_SETTINGS_FILE)),
            env_prefix: Some(ENV_PREFIX.to_owned()),
            env_source: None,
            locate_in: None,
        }
    }

    #[must_use]
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.source = Source::Path(path.as_ref().to_path_buf());
        self
    }

    /// Reads settings from `text` instead of a file.
    #[must_use]
    pub fn inline(mut self, text: impl Into<String>, format: FileFormat) -> Self {
        self.source = Source::Inline { text: text.into(), format };
        self
    }

    #[must_use]
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Uses `vars` instead of the process environment.
    #[must_use]
    pub fn env_source(mut self, vars: Map<String, String>) -> Self {
        self.env_source = Some(vars);
        self
    }

    /// Skips the environment layer entirely.
    #[must_use]
    pub fn without_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    /// Also checks that the theme and plugins exist under `base_dir`.
    #[must_use]
    pub fn locate(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.locate_in = Some(base_dir.into());
        self
    }

    /// Reads and deserializes the layers without consistency checks.
    ///
    /// # Errors
    /// [`SettingsError::Config`] for unreadable sources, syntax errors, duplicate
    /// keys, unknown options and values of the wrong type.
    pub fn load_unchecked(&self) -> Result<SiteSettings, SettingsError> {
        self.load_as()
    }

    /// Loads, validates and (if requested) locates the settings.
    ///
    /// # Errors
    /// Everything [`load_unchecked`](Self::load_unchecked) reports, plus
    /// [`SettingsError::Invalid`] and the location errors.
    pub fn load(&self) -> Result<Settings, SettingsError> {
        self.load_located().map(|(settings, _)| settings)
    }

    /// Like [`load`](Self::load), also returning where the theme and plugins
    /// were found when [`locate`](Self::locate) was requested.
    ///
    /// # Errors
    /// See [`load`](Self::load).
    pub fn load_located(&self) -> Result<(Settings, Option<Located>), SettingsError> {
        let settings = self.load_unchecked()?;
        ensure_valid(&settings)?;

        let located = match &self.locate_in {
            Some(base_dir) => {
                let located = locate(&settings, base_dir)?;
                debug!(plugins = located.plugins.len(), "Plugins located");
                Some(located)
            },
            None => None,
        };

        info!(
            sitename = %settings.sitename,
            plugins = settings.plugins.len(),
            feeds = settings.enabled_feeds().bits().count_ones(),
            "Settings loaded"
        );
        Ok((Settings::new(settings), located))
    }

    fn load_as<T>(&self) -> Result<T, SettingsError>
    where
        T: DeserializeOwned,
    {
        let mut builder = Config::builder();

        builder = match &self.source {
            Source::Path(path) => {
                let (file, format) = resolve_file(path)?;
                info!("Loading settings from {}", file.display());
                let text = fs::read_to_string(&file).map_err(|e| {
                    config_error(
                        format!("cannot read {}: {e}", file.display()),
                        "Failed to read settings file",
                    )
                })?;
                check_source(&text, format)?;
                builder.add_source(File::from_str(&text, format))
            },
            Source::Inline { text, format } => {
                debug!(format = ?format, bytes = text.len(), "Loading inline settings");
                check_source(text, *format)?;
                builder.add_source(File::from_str(text, *format))
            },
        };

        if let Some(prefix) = &self.env_prefix {
            debug!(
                prefix = %prefix,
                injected = self.env_source.is_some(),
                "Environment overrides enabled"
            );
            let vars = self.env_source.clone().unwrap_or_else(process_env);
            builder = env_layers(builder, prefix, vars)?;
        }

        let config = builder
            .build()
            .context("Failed to build settings")?
            .try_deserialize::<T>()
            .context("Failed to deserialize settings")?;

        Ok(config)
    }
}

fn process_env() -> Map<String, String> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

/// Scalar overrides go through untouched as text; list options are split on `,`.
fn env_layers(
    builder: ConfigBuilder<DefaultState>,
    prefix: &str,
    vars: Map<String, String>,
) -> Result<ConfigBuilder<DefaultState>, SettingsError> {
    let marker = format!("{}__", prefix.to_ascii_lowercase());
    let list_option = |key: &str| {
        let key = key.to_ascii_lowercase();
        let option = key.strip_prefix(&marker)?;
        LIST_OPTIONS.iter().copied().find(|known| *known == option)
    };

    let (lists, scalars): (Map<_, _>, Map<_, _>) =
        vars.into_iter().partition(|(key, _)| list_option(key.as_str()).is_some());

    let mut builder = builder.add_source(
        Environment::with_prefix(prefix)
            .separator("__")
            .convert_case(config::Case::Snake)
            .source(Some(scalars)),
    );

    for (key, value) in &lists {
        let Some(option) = list_option(key.as_str()) else { continue };
        let items: Vec<String> = value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect();
        builder = builder.set_override(option, items).context("Invalid environment override")?;
    }

    Ok(builder)
}

fn config_error(message: String, context: &'static str) -> SettingsError {
    SettingsError::Config { source: ConfigError::Message(message), context: Some(context.into()) }
}

fn format_of(path: &Path) -> Option<FileFormat> {
    let ext = path.extension()?.to_str()?;
    FORMATS.iter().find(|(known, _)| ext.eq_ignore_ascii_case(known)).map(|(_, format)| *format)
}

fn resolve_file(path: &Path) -> Result<(PathBuf, FileFormat), SettingsError> {
    if let Some(format) = format_of(path) {
        return Ok((path.to_path_buf(), format));
    }
    if path.is_file() {
        return Err(config_error(
            format!("{} is not a .toml, .yaml or .json file", path.display()),
            "Unsupported settings format",
        ));
    }

    FORMATS
        .iter()
        .map(|(ext, format)| {
            let mut candidate = path.as_os_str().to_owned();
            candidate.push(".");
            candidate.push(ext);
            (PathBuf::from(candidate), *format)
        })
        .find(|(candidate, _)| candidate.is_file())
        .ok_or_else(|| {
            config_error(
                format!("no settings file at {} (.toml, .yaml or .json)", path.display()),
                "Failed to locate settings file",
            )
        })
}

/// TOML and YAML parsers reject a repeated key themselves; JSON needs a pass.
fn check_source(text: &str, format: FileFormat) -> Result<(), SettingsError> {
    match format {
        FileFormat::Toml | FileFormat::Yaml => Ok(()),
        FileFormat::Json => {
            let mut json = serde_json::Deserializer::from_str(text);
            UniqueKeys
                .deserialize(&mut json)
                .and_then(|()| json.end())
                .map_err(|e| ConfigError::FileParse { uri: None, cause: Box::new(e) })
                .context("Failed to parse JSON settings")
        },
        other => Err(config_error(
            format!("{other:?} is not a settings format; use TOML, YAML or JSON"),
            "Unsupported settings format",
        )),
    }
}

/// Walks a JSON document and fails on the first object with a repeated key.
struct UniqueKeys;

impl<'de> DeserializeSeed<'de> for UniqueKeys {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for UniqueKeys {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<(), E> {
        Ok(())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<(), E> {
        Ok(())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<(), E> {
        Ok(())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<(), E> {
        Ok(())
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<(), E> {
        Ok(())
    }

    fn visit_unit<E: de::Error>(self) -> Result<(), E> {
        Ok(())
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element_seed(Self)?.is_some() {}
        Ok(())
    }

    fn visit_map<A>(self, mut map: A) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut seen = FxHashSet::default();
        while let Some(key) = map.next_key::<String>()? {
            if seen.contains(&key) {
                return Err(de::Error::custom(format!("duplicate key `{key}`")));
            }
            map.next_value_seed(Self)?;
            seen.insert(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn inline_source_overrides_defaults_only_where_given() {
        let settings = SettingsLoader::new()
            .inline("sitename = \"Observatory\"\ndefault_pagination = 5\n", FileFormat::Toml)
            .without_env()
            .load()
            .expect("load");

        assert_eq!(settings.sitename, "Observatory");
        assert_eq!(settings.default_pagination, 5);
        assert_eq!(settings.theme, "notmyidea");
    }

    #[test]
    fn environment_overrides_file() {
        let settings = SettingsLoader::new()
            .inline("default_pagination = 5\n", FileFormat::Toml)
            .env_source(env(&[
                ("SITE__DEFAULT_PAGINATION", "10"),
                ("SITE__PLUGINS", "render_math,simple_footnotes"),
                ("OTHER__SITENAME", "ignored"),
            ]))
            .load()
            .expect("load");

        assert_eq!(settings.default_pagination, 10);
        assert_eq!(settings.plugins, ["render_math", "simple_footnotes"]);
        assert_eq!(settings.sitename, SiteSettings::default().sitename);
    }

    #[test]
    fn environment_can_disable_a_feed() {
        let settings = SettingsLoader::new()
            .inline("", FileFormat::Toml)
            .env_source(env(&[("SITE__CATEGORY_FEED_ATOM", "false")]))
            .load()
            .expect("load");

        assert_eq!(settings.category_feed_atom, None);
    }

    #[test]
    fn string_overrides_keep_their_text() {
        let settings = SettingsLoader::new()
            .inline("[math_jax]\nresponsive = \"True\"\n", FileFormat::Toml)
            .env_source(env(&[
                ("SITE__MATH_JAX__RESPONSIVE", "True"),
                ("SITE__MATH_JAX__ALIGN", "left"),
                ("SITE__TWITTER_WIDGET_ID", "0573544104640049152"),
                ("SITE__SITENAME", "1e3"),
                ("SITE__DEFAULT_PAGINATION", "10"),
                ("SITE__RELATIVE_URLS", "true"),
            ]))
            .load_unchecked()
            .expect("load");

        assert_eq!(settings.math_jax["responsive"], "True");
        assert_eq!(settings.math_jax["align"], "left");
        assert_eq!(settings.twitter_widget_id.as_deref(), Some("0573544104640049152"));
        assert_eq!(settings.sitename, "1e3");
        assert_eq!(settings.default_pagination, 10);
        assert!(settings.relative_urls);
    }

    #[test]
    fn list_override_with_one_item_stays_a_list() {
        let settings = SettingsLoader::new()
            .inline("", FileFormat::Toml)
            .env_source(env(&[("site__markup", "md"), ("SITE__STATIC_PATHS", "2016, images,")]))
            .load()
            .expect("load");

        assert_eq!(settings.markup, ["md"]);
        assert_eq!(settings.static_paths, ["2016", "images"]);
    }

    #[test]
    fn custom_prefix() {
        let settings = SettingsLoader::new()
            .inline("", FileFormat::Toml)
            .env_prefix("OBS")
            .env_source(env(&[("OBS__SITENAME", "From env")]))
            .load()
            .expect("load");

        assert_eq!(settings.sitename, "From env");
    }

    #[test]
    fn wrong_type_names_the_option() {
        let err = SettingsLoader::new()
            .inline("default_pagination = \"five\"\n", FileFormat::Toml)
            .without_env()
            .load()
            .expect_err("type mismatch");

        assert!(matches!(err, SettingsError::Config { .. }));
        assert!(err.to_string().contains("default_pagination"), "{err}");
        assert_eq!(err.context_note(), Some("Failed to deserialize settings"));
    }

    #[test]
    fn invalid_values_are_rejected_after_deserialization() {
        let err = SettingsLoader::new()
            .inline("sitename = \"\"\n", FileFormat::Toml)
            .without_env()
            .load()
            .expect_err("empty sitename");

        assert_eq!(err.issues().len(), 1);

        let unchecked = SettingsLoader::new()
            .inline("sitename = \"\"\n", FileFormat::Toml)
            .without_env()
            .load_unchecked()
            .expect("shape is fine");
        assert!(unchecked.sitename.is_empty());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = load_settings("does/not/exist/pelicanconf.toml").expect_err("missing");
        assert!(matches!(err, SettingsError::Config { .. }));

        let err = load_settings("does/not/exist/pelicanconf").expect_err("no candidate");
        assert!(matches!(err, SettingsError::Config { .. }));
        assert_eq!(err.context_note(), Some("Failed to locate settings file"));
    }

    #[test]
    fn repeated_keys_are_rejected_in_every_format() {
        let sources = [
            ("default_lang = \"en\"\ndefault_lang = \"fr\"\n", FileFormat::Toml),
            ("default_lang: en\ndefault_lang: fr\n", FileFormat::Yaml),
            (r#"{"default_lang": "en", "default_lang": "fr"}"#, FileFormat::Json),
            (r#"{"math_jax": {"align": "left", "align": "center"}}"#, FileFormat::Json),
        ];

        for (text, format) in sources {
            let err = SettingsLoader::new()
                .inline(text, format)
                .without_env()
                .load()
                .expect_err("a repeated key must not load");
            assert!(matches!(err, SettingsError::Config { .. }), "{format:?}: {err}");
        }
    }

    #[test]
    fn yaml_and_json_sources_load() {
        let yaml = SettingsLoader::new()
            .inline("sitename: Observatory\nplugins: [render_math]\n", FileFormat::Yaml)
            .without_env()
            .load()
            .expect("yaml");
        let json = SettingsLoader::new()
            .inline(r#"{"sitename": "Observatory", "plugins": ["render_math"]}"#, FileFormat::Json)
            .without_env()
            .load()
            .expect("json");

        assert_eq!(yaml, json);
        assert_eq!(json.plugins, ["render_math"]);
    }

    #[test]
    fn other_formats_are_unsupported() {
        let err = SettingsLoader::new()
            .inline("sitename = Observatory\n", FileFormat::Ini)
            .without_env()
            .load()
            .expect_err("ini");
        assert_eq!(err.context_note(), Some("Unsupported settings format"));
    }

    #[test]
    fn path_without_extension_finds_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("pelicanconf.json"), r#"{"default_pagination": 7}"#)
            .expect("write");

        let settings = SettingsLoader::new()
            .path(dir.path().join("pelicanconf"))
            .without_env()
            .load()
            .expect("load");
        assert_eq!(settings.default_pagination, 7);
    }

    #[test]
    fn load_config_reads_a_partial_shape() {
        #[derive(serde::Deserialize)]
        struct Partial {
            sitename: String,
            default_pagination: u32,
        }

        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("pelicanconf.toml");
        std::fs::write(&file, "sitename = \"Observatory\"\ndefault_pagination = 5\n")
            .expect("write");

        let partial: Partial =
            load_config(Some(&file), "OBS_SETTINGS_UNIT_TEST").expect("partial load");
        assert_eq!(partial.sitename, "Observatory");
        assert_eq!(partial.default_pagination, 5);
    }

    #[test]
    fn load_located_returns_locations_only_when_asked() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loader = SettingsLoader::new().inline("", FileFormat::Toml).without_env();

        let (_, located) = loader.load_located().expect("load");
        assert!(located.is_none());

        let (settings, located) = loader.locate(dir.path()).load_located().expect("locate");
        let located = located.expect("locations requested");
        assert!(located.plugins.is_empty());
        assert_eq!(settings.theme, "notmyidea");
    }
}
