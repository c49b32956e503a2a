pub mod check;
pub mod feeds;
pub mod show;
pub mod url;
