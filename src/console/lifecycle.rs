use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

/// Teardown signal shared by a controller and the calls it has in flight.
///
/// Once [`Lifecycle::destroy`] runs, every future wrapped with
/// [`Lifecycle::until_destroyed`] resolves to `None` and its result is
/// dropped, so no state update can land on a torn-down controller.
#[derive(Clone)]
pub struct Lifecycle {
    destroyed: Arc<watch::Sender<bool>>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        let (destroyed, _) = watch::channel(false);
        Self {
            destroyed: Arc::new(destroyed),
        }
    }

    pub fn destroy(&self) {
        self.destroyed.send_replace(true);
    }

    pub fn is_destroyed(&self) -> bool {
        *self.destroyed.borrow()
    }

    pub async fn until_destroyed<F: Future>(&self, fut: F) -> Option<F::Output> {
        let mut rx = self.destroyed.subscribe();
        let cancelled = async move {
            loop {
                let destroyed = *rx.borrow_and_update();
                if destroyed {
                    return;
                }
                if rx.changed().await.is_err() {
                    std::future::pending::<()>().await;
                }
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => None,
            out = fut => Some(out),
        }
    }
}
