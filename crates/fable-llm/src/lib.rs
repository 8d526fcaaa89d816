//! # Fable LLM
//!
//! The external text service boundary for Fable agents.
//!
//! Everything a Fable agent needs from a language model goes through two
//! calls: [`TextService::summarize`] (extract the facts worth remembering
//! from a conversational turn, or merge a batch of stored facts) and
//! [`TextService::generate`] (produce an in-character reply). Both calls are
//! slow and fallible by nature; callers are expected to treat an error or a
//! no-signal answer as "nothing came back" and degrade gracefully.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fable_llm::{GeminiClient, GenerationParams, TextService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::from_env()?;
//!
//! let params = GenerationParams::hard_defaults().with_temperature(0.7);
//! let reply = client.generate("Say hello in one sentence.", &params).await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

mod error;
mod gemini;
mod params;
mod sentinel;
mod service;

pub use error::{LlmError, LlmResult};
pub use gemini::GeminiClient;
pub use params::GenerationParams;
pub use sentinel::is_no_signal;
pub use service::TextService;
