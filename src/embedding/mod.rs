//! Embedding coercion, validation, and lazy regeneration.
//!
//! Stored vectors arrive in whatever shape the data layer preserved: a
//! numeric array, a JSON-encoded string, or nothing. [`EmbeddingResolver`]
//! turns any of those into a usable vector or the all-zero placeholder,
//! requesting regeneration from the [`EmbeddingProvider`](crate::provider::EmbeddingProvider)
//! when the stored value is unusable. Every failure path degrades to the
//! placeholder; nothing here errors.

mod resolver;


pub use resolver::{
    EmbeddingResolver, ResolvedEmbedding, coerce_embedding, is_placeholder, placeholder,
    validate_embedding,
};
