use thiserror::Error;

/// Errors surfaced while loading or validating a [`MatchingConfig`](super::MatchingConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidEnvValue { var: &'static str, value: String },

    #[error("embedding dimension cannot be zero")]
    ZeroEmbeddingDim,

    #[error("initial_k cannot be zero")]
    ZeroInitialK,

    #[error("final_k cannot be zero")]
    ZeroFinalK,

    #[error("final_k ({final_k}) cannot exceed initial_k ({initial_k})")]
    FinalKExceedsInitialK { final_k: usize, initial_k: usize },

    #[error("regeneration concurrency cannot be zero")]
    ZeroRegenConcurrency,
}
