//! Mock infrastructure for testing upstream APIs
//!
//! Wraps a wiremock server standing in for Groq or Gemini, with helpers to
//! mount typical responses and inspect what the proxy sent.

pub mod upstream;

pub use upstream::*;
