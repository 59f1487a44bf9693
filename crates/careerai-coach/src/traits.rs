use anyhow::Result;
use async_trait::async_trait;

/// Produces the assistant side of a turn
///
/// Single operation, text in and text out, so a model-backed implementation
/// can replace the keyword one without touching the session layer.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, prompt: &str) -> Result<String>;

    /// Short identifier used in logs
    fn name(&self) -> &str;
}
