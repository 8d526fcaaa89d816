//! Generation parameter resolution
//!
//! Agents carry their own generation settings, callers may override per call,
//! and anything left unset falls back to hard defaults. The precedence is
//! resolved once per request via [`GenerationParams::overlaid`] rather than
//! through ad-hoc map merges:
//!
//! call-site override > per-agent config > hard default

use serde::{Deserialize, Serialize};

/// Sampling parameters for a generation call.
///
/// Every field is optional; `None` means "defer to the next layer down".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature
    pub temperature: Option<f32>,

    /// Top-k sampling cutoff
    pub top_k: Option<i32>,

    /// Nucleus sampling cutoff
    pub top_p: Option<f32>,

    /// Output length cap, in tokens
    pub max_output_tokens: Option<i32>,
}

impl GenerationParams {
    /// Create a parameter set with every field unset
    pub fn new() -> Self {
        Self::default()
    }

    /// The bottom layer of the precedence chain: every field populated
    pub fn hard_defaults() -> Self {
        Self {
            temperature: Some(0.9),
            top_k: Some(40),
            top_p: Some(0.95),
            max_output_tokens: Some(1024),
        }
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the top-k cutoff
    pub fn with_top_k(mut self, top_k: i32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Set the nucleus sampling cutoff
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set the output token cap
    pub fn with_max_output_tokens(mut self, max_output_tokens: i32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    /// Layer `over` on top of `self`: any field set in `over` wins.
    pub fn overlaid(&self, over: &GenerationParams) -> Self {
        Self {
            temperature: over.temperature.or(self.temperature),
            top_k: over.top_k.or(self.top_k),
            top_p: over.top_p.or(self.top_p),
            max_output_tokens: over.max_output_tokens.or(self.max_output_tokens),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_prefers_upper_layer() {
        let agent = GenerationParams::new().with_temperature(0.4).with_top_k(20);
        let call = GenerationParams::new().with_temperature(1.2);

        let resolved = GenerationParams::hard_defaults()
            .overlaid(&agent)
            .overlaid(&call);

        assert_eq!(resolved.temperature, Some(1.2)); // call-site wins
        assert_eq!(resolved.top_k, Some(20)); // agent config wins over default
        assert_eq!(resolved.top_p, Some(0.95)); // fell through to hard default
        assert_eq!(resolved.max_output_tokens, Some(1024));
    }

    #[test]
    fn overlay_of_empty_layer_changes_nothing() {
        let base = GenerationParams::hard_defaults();
        assert_eq!(base.overlaid(&GenerationParams::new()), base);
    }
}
