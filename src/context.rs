//! Cancellation and deadlines for API calls.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::api::{ShippingError, ShippingResult};

/// Carries cancellation and an optional deadline into each API call.
///
/// Cloning a context shares its cancellation token, so cancelling any clone
/// cancels them all. Use [`RequestContext::child`] for a context that can be
/// cancelled on its own.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Derives a context that expires `timeout` from now.
    ///
    /// A timeout too large to represent adds no deadline at all.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.clone(),
        }
    }

    /// Derives a context that expires at `deadline`.
    /// An existing, earlier deadline is kept.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current <= deadline => current,
            _ => deadline,
        };

        Self {
            token: self.token.clone(),
            deadline: Some(deadline),
        }
    }

    /// Derives a context cancelled whenever this one is, but not vice versa.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    /// Fails if this context is already cancelled or past its deadline.
    pub fn check(&self) -> ShippingResult<()> {
        if self.token.is_cancelled() {
            return Err(ShippingError::Cancelled);
        }

        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(ShippingError::Timeout),
            _ => Ok(()),
        }
    }

    /// Runs `future` to completion unless this context finishes first.
    ///
    /// If the context wins, `future` is dropped mid-flight.
    pub async fn run<F, T>(&self, future: F) -> ShippingResult<T>
    where
        F: Future<Output = ShippingResult<T>>,
    {
        self.check()?;

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(ShippingError::Cancelled),
            _ = deadline => Err(ShippingError::Timeout),
            result = future => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn background_runs_to_completion() {
        let ctx = RequestContext::background();
        let value = ctx.run(async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
        assert!(ctx.deadline().is_none());
    }

    #[tokio::test]
    async fn cancelled_context_never_polls_the_future() {
        let ctx = RequestContext::background();
        ctx.cancel();

        let polled = AtomicBool::new(false);
        let result = ctx
            .run(async {
                polled.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(ShippingError::Cancelled)));
        assert!(!polled.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn cancelling_mid_flight_interrupts() {
        let ctx = RequestContext::background();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let result: ShippingResult<()> = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(ShippingError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_elapses_into_timeout() {
        let ctx = RequestContext::background().with_timeout(Duration::from_millis(50));

        let result: ShippingResult<()> = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(ShippingError::Timeout)));
    }

    #[tokio::test(start_paused = true)]
    async fn expired_deadline_fails_check() {
        let ctx = RequestContext::background().with_timeout(Duration::from_millis(10));
        tokio::time::advance(Duration::from_millis(20)).await;
        assert!(matches!(ctx.check(), Err(ShippingError::Timeout)));
    }

    #[tokio::test]
    async fn unrepresentable_timeout_adds_no_deadline() {
        let ctx = RequestContext::background().with_timeout(Duration::MAX);
        assert!(ctx.deadline().is_none());
        assert!(ctx.check().is_ok());

        let bounded = RequestContext::background().with_timeout(Duration::from_secs(1));
        assert_eq!(bounded.with_timeout(Duration::MAX).deadline(), bounded.deadline());
    }

    #[tokio::test]
    async fn earlier_deadline_wins() {
        let now = Instant::now();
        let ctx = RequestContext::background().with_deadline(now + Duration::from_secs(1));
        let looser = ctx.with_deadline(now + Duration::from_secs(10));
        assert_eq!(looser.deadline(), Some(now + Duration::from_secs(1)));
    }

    #[tokio::test]
    async fn child_cancellation_does_not_propagate_up() {
        let parent = RequestContext::background();
        let child = parent.child();

        child.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());

        let other = parent.child();
        parent.cancel();
        assert!(other.is_cancelled());
    }
}
