//! Re-deriving the view after a successful mutation.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use futures_util::future::BoxFuture;
use tokio::sync::Notify;

use crate::aggregator::ViewModel;
use crate::client::transport::GatewayClient;

/// Brings the displayed page up to date with the upstream.
pub trait PageRefresher: Send + Sync {
    fn refresh(&self) -> BoxFuture<'_, ()>;
}

/// Re-runs the aggregator for one page through the gateway's JSON view and
/// keeps the latest model.
#[derive(Debug)]
pub struct ViewRefresher {
    client: GatewayClient,
    path: String,
    current: ArcSwapOption<ViewModel>,
    updated: Notify,
}

impl ViewRefresher {
    pub fn new(client: GatewayClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            current: ArcSwapOption::empty(),
            updated: Notify::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Latest model, if a refresh has completed.
    pub fn current(&self) -> Option<Arc<ViewModel>> {
        self.current.load_full()
    }

    /// Wait for the next refresh to complete (or one that completed unobserved).
    pub async fn updated(&self) -> Option<Arc<ViewModel>> {
        self.updated.notified().await;
        self.current()
    }

    async fn reload(&self) {
        match self.client.fetch_view(&self.path).await {
            Ok(model) => {
                if let Some(error) = model.error() {
                    tracing::warn!(path = %self.path, error = %error, "Refreshed view is degraded");
                }
                self.current.store(Some(Arc::new(model)));
            }
            Err(e) => {
                tracing::warn!(path = %self.path, error = %e, "View refresh failed");
            }
        }
        self.updated.notify_one();
    }
}

impl PageRefresher for ViewRefresher {
    fn refresh(&self) -> BoxFuture<'_, ()> {
        Box::pin(self.reload())
    }
}
