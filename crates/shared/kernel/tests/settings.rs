use chrono::NaiveDate;
use obs_kernel::config::{SettingsLoader, load_settings};
use obs_kernel::domain::feeds::FeedSet;
use obs_kernel::error::SettingsError;
use obs_kernel::feeds::FeedPlan;
use obs_kernel::locate::ThemeLocation;
use obs_kernel::record::record;
use obs_kernel::url::{UrlContext, UrlTemplate};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

fn reference() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../site/pelicanconf.toml")
}

fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("pelicanconf.toml");
    fs::write(&path, body).expect("write settings");
    path
}

#[test]
fn reference_settings_load() {
    let settings = SettingsLoader::new().path(reference()).without_env().load().expect("load");

    assert_eq!(settings.sitename, "Macroeconomic Observatory");
    assert_eq!(settings.default_pagination, 5);
    assert_eq!(settings.markup, ["md"]);
    assert_eq!(settings.plugins.len(), 6);
    assert!(settings.has_plugin("render_math"));
    assert_eq!(settings.links[1].label, "DB.nomics");
    assert_eq!(settings.piwik_site_id, Some(3));
    assert_eq!(settings.rmd_reader_knitr_opts_chunk["fig.path"], "figure/");
}

#[test]
fn record_exposes_upper_case_names() {
    let settings = SettingsLoader::new().path(reference()).without_env().load().expect("load");
    let record = record(&settings).expect("record");

    assert_eq!(record["SITENAME"], json!("Macroeconomic Observatory"));
    assert_eq!(record["DEFAULT_PAGINATION"], json!(5));
    assert_eq!(record["CATEGORY_FEED_ATOM"], json!(null));
    assert_eq!(record["MENUITEMS"], json!([["About", "/about.html"]]));
}

#[test]
fn loading_twice_yields_the_same_record() {
    let loader = SettingsLoader::new().path(reference()).without_env();
    let first = loader.load().expect("first load");
    let second = loader.load().expect("second load");

    assert_eq!(first, second);
    assert_eq!(record(&first).expect("record"), record(&second).expect("record"));
}

#[test]
fn reference_feed_plan_skips_disabled_feeds() {
    let settings = SettingsLoader::new().path(reference()).without_env().load().expect("load");
    let plan = FeedPlan::from_settings(&settings);

    let feeds: Vec<_> = plan.iter().map(|r| r.feed).collect();
    assert_eq!(feeds, [FeedSet::FEED_ALL_ATOM, FeedSet::FEED_ALL_RSS, FeedSet::TAG_FEED_RSS]);
    assert!(!plan.contains(FeedSet::CATEGORY_FEED_ATOM));
    assert!(!plan.summary_only());
}

#[test]
fn reference_article_url_renders() {
    let settings = SettingsLoader::new().path(reference()).without_env().load().expect("load");
    let date =
        NaiveDate::from_ymd_opt(2016, 11, 4).and_then(|d| d.and_hms_opt(0, 0, 0)).expect("date");
    let ctx = UrlContext::with_slug("taylor-rule").date(date);

    let url =
        UrlTemplate::parse(&settings.article_url).expect("parse").render(&ctx).expect("render");
    let save_as =
        UrlTemplate::parse(&settings.article_save_as).expect("parse").render(&ctx).expect("render");

    assert_eq!(url, "article/2016-11/taylor-rule/");
    assert_eq!(save_as, "article/2016-11/taylor-rule/index.html");
}

#[test]
fn duplicate_key_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        "default_lang = \"en\"\nsitename = \"x\"\ndefault_lang = \"fr\"\n",
    );

    let err = load_settings(&path).expect_err("duplicate key");
    assert!(matches!(err, SettingsError::Config { .. }), "{err}");
}

#[test]
fn duplicate_key_is_rejected_in_json_and_yaml_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let files = [
        ("pelicanconf.json", "{\"default_lang\": \"en\", \"default_lang\": \"fr\"}"),
        ("pelicanconf.yaml", "default_lang: en\ndefault_lang: fr\n"),
    ];

    for (name, body) in files {
        let path = dir.path().join(name);
        fs::write(&path, body).expect("write settings");

        let err = SettingsLoader::new().path(&path).without_env().load().expect_err(name);
        assert!(matches!(err, SettingsError::Config { .. }), "{name}: {err}");
    }
}

#[test]
fn values_of_the_wrong_type_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");

    for body in [
        "default_pagination = \"five\"\n",
        "plugins = \"render_math\"\n",
        "links = [[\"Dynare\"]]\n",
        "tag_feed_rss = true\n",
        "sitenmae = \"typo\"\n",
    ] {
        let path = write_config(dir.path(), body);
        let err = SettingsLoader::new().path(&path).without_env().load().expect_err(body);
        assert!(matches!(err, SettingsError::Config { .. }), "{body}: {err}");
    }
}

#[test]
fn locate_checks_theme_and_plugins_next_to_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("theme")).expect("theme");
    fs::create_dir_all(dir.path().join("plugins/render_math")).expect("plugin");
    let path = write_config(
        dir.path(),
        "theme = \"./theme\"\nplugin_paths = [\"./plugins\"]\nplugins = [\"render_math\"]\n",
    );

    let settings =
        SettingsLoader::new().path(&path).without_env().locate(dir.path()).load().expect("load");
    let located = obs_kernel::locate::locate(&settings, dir.path()).expect("locate");
    assert!(matches!(located.theme, ThemeLocation::Directory(_)));

    fs::remove_dir_all(dir.path().join("plugins/render_math")).expect("remove plugin");
    let err = SettingsLoader::new()
        .path(&path)
        .without_env()
        .locate(dir.path())
        .load()
        .expect_err("plugin gone");
    assert!(matches!(err, SettingsError::PluginNotFound { .. }), "{err}");
}
