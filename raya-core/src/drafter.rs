use async_trait::async_trait;

/// Failure of the generative-text collaborator. Always recovered by the
/// caller with a deterministic fallback; never fatal.
#[derive(Debug, thiserror::Error)]
pub enum DrafterError {
    #[error("text generation unavailable: {0}")]
    Unavailable(String),
}

/// Opaque seam over the external text-generation service. The booking
/// engine depends only on receiving some non-empty string within a bounded
/// time; prompt construction stays behind this trait.
#[async_trait]
pub trait MessageDrafter: Send + Sync {
    /// Draft the payment-confirmation email body for a customer.
    async fn draft_confirmation(
        &self,
        user_name: &str,
        booking_ref: &str,
    ) -> Result<String, DrafterError>;

    /// Draft a short festive greeting for a customer.
    async fn draft_greeting(&self, user_name: &str) -> Result<String, DrafterError>;
}
