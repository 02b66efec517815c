//! Ties fetches to the lifetime of the screen that started them.

use std::future::Future;
use tokio::sync::watch;
use tracing::debug;

/// Held by the screen host; dropping it unmounts the screen.
#[derive(Debug)]
pub struct MountGuard {
    unmounted: watch::Sender<bool>,
}

impl MountGuard {
    pub fn unmount(self) {}
}

impl Drop for MountGuard {
    fn drop(&mut self) {
        let _ = self.unmounted.send(true);
    }
}

/// Handle passed to screens so their fetches can tell whether anyone is
/// still looking at the result.
#[derive(Debug, Clone)]
pub struct ScreenScope {
    unmounted: watch::Receiver<bool>,
}

impl ScreenScope {
    pub fn mount() -> (MountGuard, ScreenScope) {
        let (tx, rx) = watch::channel(false);
        (MountGuard { unmounted: tx }, ScreenScope { unmounted: rx })
    }

    pub fn is_mounted(&self) -> bool {
        !*self.unmounted.borrow()
    }

    /// Drive `fut` while the screen stays mounted.
    ///
    /// Returns `None` if the screen unmounts first; the future is dropped and
    /// its result, if any arrives later, is never observed.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        if !self.is_mounted() {
            debug!("screen already unmounted, fetch skipped");
            return None;
        }

        let mut unmounted = self.unmounted.clone();
        tokio::select! {
            output = fut => {
                if self.is_mounted() {
                    Some(output)
                } else {
                    debug!("discarding result that arrived after unmount");
                    None
                }
            }
            _ = wait_for_unmount(&mut unmounted) => {
                debug!("screen unmounted, in-flight fetch abandoned");
                None
            }
        }
    }
}

async fn wait_for_unmount(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}
