//! Outside-pointer dismissal as a scoped resource.
//!
//! A dropdown that is open wants to know about pointer-downs landing outside
//! its bounds. Rather than a process-global listener that widgets attach and
//! forget, observation is a subscription on a registry: `subscribe` returns a
//! guard, and dropping the guard (or closing the scope that owns it)
//! unsubscribes. Registration therefore stays symmetric with open/close
//! across any number of cycles and across teardown.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use log::trace;

use crate::geometry::Rect;

/// A widget that can be dismissed by an outside pointer-down.
pub trait DismissTarget: Send + Sync {
    /// Stable widget identifier.
    fn target_id(&self) -> String;

    /// Whether the widget's transient UI is currently showing.
    fn is_open(&self) -> bool;

    /// The widget's rendered bounds, if the renderer has reported them.
    fn bounds(&self) -> Option<Rect>;

    /// Close the transient UI (and clear transient state).
    fn dismiss(&self);
}

struct Subscription {
    token: u64,
    target: Box<dyn DismissTarget>,
}

/// Registry of open widgets observing pointer-downs.
#[derive(Clone, Default)]
pub struct DismissRegistry {
    inner: Arc<Mutex<Vec<Subscription>>>,
    next_token: Arc<AtomicU64>,
}

impl DismissRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a target for outside-pointer dismissal.
    ///
    /// The subscription lives until the returned guard is dropped.
    pub fn subscribe(&self, target: Box<dyn DismissTarget>) -> DismissGuard {
        let token = self.next_token.fetch_add(1, Ordering::SeqCst);
        let id = target.target_id();
        if let Ok(mut subs) = self.inner.lock() {
            subs.push(Subscription { token, target });
        }
        trace!("dismiss registry: subscribed {id}");
        DismissGuard {
            registry: self.clone(),
            token,
            id,
        }
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.inner.lock().map(|subs| subs.len()).unwrap_or(0)
    }

    /// Check if no subscriptions are live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Report a pointer-down at a cell position.
    ///
    /// Every open subscribed target whose bounds do not contain the point is
    /// dismissed. Targets without reported bounds are left alone. Returns the
    /// ids of the dismissed targets.
    pub fn pointer_down(&self, x: u16, y: u16) -> Vec<String> {
        let mut dismissed = Vec::new();
        if let Ok(subs) = self.inner.lock() {
            for sub in subs.iter() {
                if !sub.target.is_open() {
                    continue;
                }
                let Some(bounds) = sub.target.bounds() else {
                    continue;
                };
                if !bounds.contains(x, y) {
                    sub.target.dismiss();
                    dismissed.push(sub.target.target_id());
                }
            }
        }
        for id in &dismissed {
            trace!("dismiss registry: dismissed {id} on outside pointer-down");
        }
        dismissed
    }

    fn unsubscribe(&self, token: u64) {
        if let Ok(mut subs) = self.inner.lock() {
            subs.retain(|sub| sub.token != token);
        }
    }
}

impl std::fmt::Debug for DismissRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DismissRegistry")
            .field("subscriptions", &self.len())
            .finish()
    }
}

/// Guard for a dismissal subscription; dropping it unsubscribes.
pub struct DismissGuard {
    registry: DismissRegistry,
    token: u64,
    id: String,
}

impl DismissGuard {
    /// The subscribed widget's id.
    pub fn target_id(&self) -> &str {
        &self.id
    }
}

impl Drop for DismissGuard {
    fn drop(&mut self) {
        self.registry.unsubscribe(self.token);
        trace!("dismiss registry: unsubscribed {}", self.id);
    }
}

impl std::fmt::Debug for DismissGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DismissGuard").field("id", &self.id).finish()
    }
}
