//! Proxy module
//!
//! Credential selection, header rewriting and request forwarding to the
//! Groq and Gemini upstreams, plus the delegates the router hands off to.

pub mod credentials;
pub mod delegate;
pub mod gemini;
pub mod groq;
pub mod headers;
pub mod logging;
pub mod openai;
pub mod relay;
pub mod verify;

pub use credentials::{KeyChooser, RandomChooser};
pub use delegate::Delegate;
pub use gemini::GeminiProxy;
pub use groq::GroqProxy;
pub use openai::OpenAiCompatDelegate;
pub use verify::VerifyDelegate;
