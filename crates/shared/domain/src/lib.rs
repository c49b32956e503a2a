//! # Domain Models
//!
//! Pure data types describing one site's build settings, with minimal dependencies
//! (`serde`, `bitflags`). Keep it lean: no I/O and no validation here, only the
//! record, its defaults and a few lookups over it. Loading and checking live in `obs-kernel`.

pub mod config;
pub mod constants;
pub mod feeds;
