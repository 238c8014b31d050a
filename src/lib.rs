//! This is intended to serve as a binary crate.
//!
//! The library side prepares iOS app archives for side-loading on macOS:
//! extraction into a private working directory, quarantine removal,
//! repacking, and a check for an official macOS release on the App Store.
pub mod alert;
pub mod app;
pub mod check;
pub mod compat;
pub mod config;
pub mod error;
pub mod io;
pub mod ipa;
pub mod itunes;
pub mod preferences;
pub mod shell;
pub mod store;
