//! A shim library for Larchier that wraps reqwest.
//! The whole crate is:
//!
//! ```no_run
//! pub use reqwest::*;
//! ```
//!
//! It exists so the TLS backend and other reqwest features
//! can be picked per platform in one place (rustls on Linux,
//! the native backend everywhere else) instead of in every
//! crate that makes requests.

pub use reqwest::*;
