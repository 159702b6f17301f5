//! Trait definition for the platform collaborator.
//!
//! The broker never decides whether a capability is granted; it delegates
//! every status query and every user prompt to a [`Platform`] implementation.

use async_trait::async_trait;

use crate::types::PromptCompletion;

/// The platform's capability subsystem as seen by the broker.
///
/// The synchronous methods are side-effect-free point-in-time oracles. The
/// async [`request_capabilities`](Self::request_capabilities) method is the
/// prompt adapter: given a batch of names it eventually produces exactly one
/// [`PromptCompletion`], in arbitrary order relative to other issuances.
///
/// Implementations are expected to be cheaply shareable behind an `Arc` so
/// prompt tasks can hold them across await points.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Whether this platform level supports runtime capability prompts.
    ///
    /// Below that level the model does not exist: the broker treats every
    /// capability as implicitly granted and never issues a prompt, and
    /// rationale queries are inapplicable.
    fn supports_runtime_prompts(&self) -> bool;

    /// Returns `true` when `name` is currently granted.
    fn is_granted(&self, name: &str) -> bool;

    /// Returns `true` when policy has permanently revoked `name`.
    ///
    /// Distinct from "not yet decided": a revoked capability is denied
    /// without ever prompting.
    fn is_revoked(&self, name: &str) -> bool;

    /// Returns `true` when the user should be shown an explanation before
    /// `name` is requested again (e.g. they denied it once already).
    fn should_show_rationale(&self, name: &str) -> bool;

    /// Prompt the user for a batch of capabilities.
    ///
    /// The platform guarantees exactly one completion per issuance. The
    /// completion's pairs may arrive in any order and are re-associated by
    /// name on the broker side.
    async fn request_capabilities(&self, names: Vec<String>) -> PromptCompletion;
}
