//! Loading, checking and derived views of the site settings.
//!
//! ## Loading
//! ```rust,no_run
//! use obs_kernel::config::load_settings;
//! use obs_kernel::record::record;
//!
//! let settings = load_settings("site/pelicanconf.toml")?;
//! let record = record(&settings)?;
//! assert_eq!(record["DEFAULT_PAGINATION"], 5);
//! # Ok::<(), obs_kernel::error::SettingsError>(())
//! ```
//!
//! ## URLs
//! ```rust
//! use obs_kernel::url::{UrlContext, UrlTemplate};
//!
//! let template = UrlTemplate::parse("pages/{slug}.html").unwrap();
//! assert_eq!(template.render(&UrlContext::with_slug("about")).unwrap(), "pages/about.html");
//! ```
pub mod config;
pub mod error;
pub mod feeds;
pub mod locate;
pub mod record;
pub mod url;
pub mod validate;

pub use obs_domain as domain;

pub mod prelude {
    pub use crate::config::{SettingsLoader, load_settings};
    pub use crate::error::{SettingsError, SettingsErrorExt};
    pub use crate::feeds::{FeedFormat, FeedPlan, FeedRequest, FeedScope};
    pub use crate::locate::{Located, ThemeLocation, locate};
    pub use crate::record::{lookup, record};
    pub use crate::url::{UrlContext, UrlTemplate};
    pub use crate::validate::{Issue, validate};
    pub use obs_domain::config::{Link, Settings, SiteSettings};
    pub use obs_domain::feeds::FeedSet;
}
