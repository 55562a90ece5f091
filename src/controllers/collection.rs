//! Collection view controller: owns the fetched product collection and the
//! per-row selection set, and orchestrates bulk delete as a
//! partial-failure-tolerant batch followed by a full refetch.

use std::collections::BTreeSet;

use futures::future::join_all;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::errors::GatewayError;
use crate::gateway::ProductGateway;
use crate::models::Product;
use crate::notify::ToastChannel;

/// Immutable snapshot of the listing.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionState {
    Loading,
    Loaded {
        items: Vec<Product>,
        selection: BTreeSet<String>,
    },
    LoadFailed(GatewayError),
}

impl CollectionState {
    pub fn items(&self) -> &[Product] {
        match self {
            CollectionState::Loaded { items, .. } => items,
            _ => &[],
        }
    }

    pub fn selection(&self) -> Option<&BTreeSet<String>> {
        match self {
            CollectionState::Loaded { selection, .. } => Some(selection),
            _ => None,
        }
    }

    /// Row count for the footer display.
    pub fn row_count(&self) -> usize {
        self.items().len()
    }

    /// The select-all indicator reflects only an exact match: checked iff
    /// every row is selected and there is at least one row.
    pub fn all_selected(&self) -> bool {
        match self {
            CollectionState::Loaded { items, selection } => {
                !items.is_empty() && selection.len() == items.len()
            }
            _ => false,
        }
    }
}

/// Cloneable controller; clones share the same state. The items vector and
/// selection set are owned here exclusively; consumers read snapshots.
#[derive(Clone)]
pub struct CollectionController {
    gateway: ProductGateway,
    toasts: ToastChannel,
    state_tx: watch::Sender<CollectionState>,
}

impl CollectionController {
    pub fn new(gateway: ProductGateway, toasts: ToastChannel) -> Self {
        let (state_tx, _) = watch::channel(CollectionState::Loading);
        Self {
            gateway,
            toasts,
            state_tx,
        }
    }

    pub fn state(&self) -> CollectionState {
        self.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CollectionState> {
        self.state_tx.subscribe()
    }

    fn transition(&self, next: CollectionState) {
        self.state_tx.send_replace(next);
    }

    /// Full refetch. Always resynchronizes with server truth and starts
    /// from an empty selection; failures surface as `LoadFailed` with no
    /// automatic retry.
    pub async fn refresh(&self) {
        self.transition(CollectionState::Loading);
        match self.gateway.list().await {
            Ok(items) => {
                debug!(rows = items.len(), "collection refreshed");
                self.transition(CollectionState::Loaded {
                    items,
                    selection: BTreeSet::new(),
                });
            }
            Err(err) => {
                warn!(%err, "collection refresh failed");
                self.transition(CollectionState::LoadFailed(err));
            }
        }
    }

    /// Explicit retry after a failed load.
    pub async fn retry(&self) {
        self.refresh().await;
    }

    /// Toggle one row's checkbox. SKUs not present in the collection are
    /// ignored.
    pub fn toggle_row(&self, sku: &str) {
        let CollectionState::Loaded {
            items,
            mut selection,
        } = self.state()
        else {
            warn!(sku, "selection ignored: collection is not loaded");
            return;
        };

        if !items.iter().any(|item| item.sku == sku) {
            warn!(sku, "selection ignored: unknown sku");
            return;
        }

        if !selection.remove(sku) {
            selection.insert(sku.to_string());
        }
        self.transition(CollectionState::Loaded { items, selection });
    }

    /// Select every row or clear the selection.
    pub fn set_select_all(&self, selected: bool) {
        let CollectionState::Loaded { items, .. } = self.state() else {
            warn!("select-all ignored: collection is not loaded");
            return;
        };

        let selection = if selected {
            items.iter().map(|item| item.sku.clone()).collect()
        } else {
            BTreeSet::new()
        };
        self.transition(CollectionState::Loaded { items, selection });
    }

    /// The update hand-off target: available only when exactly one row is
    /// selected.
    pub fn update_target(&self) -> Option<String> {
        match self.state() {
            CollectionState::Loaded { selection, .. } if selection.len() == 1 => {
                selection.into_iter().next()
            }
            _ => None,
        }
    }

    /// Delete every selected row. Deletions run concurrently and settle
    /// independently; this is not atomic. Once every outcome has resolved
    /// the selection is cleared unconditionally and a full refetch
    /// resynchronizes the view, so a row whose deletion failed reappears.
    pub async fn delete_selected(&self) {
        let selected: Vec<String> = match &*self.state_tx.borrow() {
            CollectionState::Loaded { selection, .. } if !selection.is_empty() => {
                selection.iter().cloned().collect()
            }
            _ => {
                debug!("bulk delete ignored: nothing selected");
                return;
            }
        };

        info!(count = selected.len(), "bulk delete started");
        let outcomes = join_all(selected.into_iter().map(|sku| {
            let gateway = self.gateway.clone();
            async move {
                let result = gateway.delete(&sku).await;
                (sku, result)
            }
        }))
        .await;

        let total = outcomes.len();
        let mut failed = 0usize;
        for (sku, outcome) in &outcomes {
            if let Err(err) = outcome {
                warn!(sku, %err, "delete failed");
                failed += 1;
            }
        }

        // The selection is invalidated regardless of per-item outcome; the
        // refetch below makes it moot anyway, but a failed refetch must not
        // leave stale SKUs selected.
        self.set_select_all(false);

        if failed == 0 {
            self.toasts
                .success(format!("Deleted {} product(s)", total));
        } else {
            self.toasts
                .error(format!("{} of {} deletions failed", failed, total));
        }

        self.refresh().await;
    }
}
