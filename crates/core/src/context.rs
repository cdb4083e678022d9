use tokio_util::sync::CancellationToken;

use crate::{AppError, AppResult};

/// Per-operation context handed from the host runtime to every remote call.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancellation: CancellationToken,
}

impl RequestContext {
    /// Creates a context with a fresh cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context bound to an existing cancellation token.
    #[must_use]
    pub fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self { cancellation }
    }

    /// Returns the cancellation token.
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Returns true once the host runtime cancelled the operation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Fails with [`AppError::Cancelled`] when the operation was cancelled.
    pub fn ensure_active(&self) -> AppResult<()> {
        if self.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        Ok(())
    }

    /// Resolves when the operation is cancelled.
    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await;
    }
}

#[cfg(test)]
mod tests {
    use tokio_util::sync::CancellationToken;

    use super::RequestContext;

    #[tokio::test]
    async fn cancelling_the_token_fails_ensure_active() {
        let token = CancellationToken::new();
        let context = RequestContext::with_cancellation(token.clone());
        assert!(context.ensure_active().is_ok());

        token.cancel();
        context.cancelled().await;
        assert!(context.ensure_active().is_err());
    }
}
