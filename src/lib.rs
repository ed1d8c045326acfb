//! app-settings: per-component settings with deprecation support
//!
//! A library for resolving a reusable component's settings from its own
//! defaults and the host application's prefixed overrides, carrying
//! renamed and replaced settings through a deprecation cycle.

pub mod deprecation;
pub mod manifest;
pub mod resolver;
pub mod source;
pub mod value;
