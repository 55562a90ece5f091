//! Form state controller: drives a single product draft through
//! draft, validating, submitting, and settled states for both the creation
//! and update flows. All draft mutation funnels through `handle_change`.

use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::errors::{FormError, GatewayError};
use crate::gateway::ProductGateway;
use crate::models::{FieldChange, Product, ProductDraft};
use crate::notify::ToastChannel;
use crate::validation::{validate, ValidationPolicy};

const TRANSITION_CHANNEL_CAPACITY: usize = 16;

/// Immutable snapshot of the form at one point in its lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    /// Update flow only: the product behind the SKU is being fetched.
    Loading,
    /// The fetch failed; a retry action is available.
    LoadFailed(GatewayError),
    /// Editable. A failed submission attaches its error here with the
    /// draft preserved so the user can correct and resubmit.
    Idle {
        draft: ProductDraft,
        error: Option<FormError>,
    },
    /// A submission is in flight; inputs are disabled and a second submit
    /// is rejected until settlement.
    Submitting { draft: ProductDraft },
    /// The gateway confirmed the write. Published as a transition before
    /// the controller settles back to `Idle` with a reset draft.
    Committed(Product),
}

impl FormState {
    pub fn draft(&self) -> Option<&ProductDraft> {
        match self {
            FormState::Idle { draft, .. } | FormState::Submitting { draft } => Some(draft),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FormError> {
        match self {
            FormState::Idle { error, .. } => error.as_ref(),
            _ => None,
        }
    }

    /// Inputs accept edits only while idle.
    pub fn inputs_enabled(&self) -> bool {
        matches!(self, FormState::Idle { .. })
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, FormState::Submitting { .. })
    }
}

#[derive(Debug, Clone)]
enum FormMode {
    Create,
    Update { sku: String },
}

/// Cloneable controller; clones share the same state.
#[derive(Clone)]
pub struct FormController {
    gateway: ProductGateway,
    toasts: ToastChannel,
    policy: ValidationPolicy,
    mode: FormMode,
    state_tx: watch::Sender<FormState>,
    transitions_tx: broadcast::Sender<FormState>,
}

impl FormController {
    /// Creation flow: starts editable with an empty draft.
    pub fn for_create(
        gateway: ProductGateway,
        toasts: ToastChannel,
        policy: ValidationPolicy,
    ) -> Self {
        Self::with_initial(
            gateway,
            toasts,
            policy,
            FormMode::Create,
            FormState::Idle {
                draft: ProductDraft::default(),
                error: None,
            },
        )
    }

    /// Update flow: starts loading; call `load` to fetch the product.
    pub fn for_update(
        gateway: ProductGateway,
        toasts: ToastChannel,
        policy: ValidationPolicy,
        sku: impl Into<String>,
    ) -> Self {
        Self::with_initial(
            gateway,
            toasts,
            policy,
            FormMode::Update { sku: sku.into() },
            FormState::Loading,
        )
    }

    fn with_initial(
        gateway: ProductGateway,
        toasts: ToastChannel,
        policy: ValidationPolicy,
        mode: FormMode,
        initial: FormState,
    ) -> Self {
        let (state_tx, _) = watch::channel(initial);
        let (transitions_tx, _) = broadcast::channel(TRANSITION_CHANNEL_CAPACITY);
        Self {
            gateway,
            toasts,
            policy,
            mode,
            state_tx,
            transitions_tx,
        }
    }

    pub fn state(&self) -> FormState {
        self.state_tx.borrow().clone()
    }

    /// Latest-snapshot view of the form.
    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state_tx.subscribe()
    }

    /// Every transition in order, for subscribers that must not miss the
    /// transient `Committed` snapshot.
    pub fn transitions(&self) -> broadcast::Receiver<FormState> {
        self.transitions_tx.subscribe()
    }

    fn transition(&self, next: FormState) {
        let _ = self.transitions_tx.send(next.clone());
        self.state_tx.send_replace(next);
    }

    /// Fetch the product for the update flow and seed the draft from it.
    pub async fn load(&self) {
        let FormMode::Update { sku } = &self.mode else {
            warn!("load ignored: the creation flow has nothing to fetch");
            return;
        };

        self.transition(FormState::Loading);
        match self.gateway.get(sku).await {
            Ok(product) => {
                debug!(%sku, "product loaded into form");
                self.transition(FormState::Idle {
                    draft: ProductDraft::from_product(&product),
                    error: None,
                });
            }
            Err(err) => {
                warn!(%sku, %err, "product load failed");
                self.transition(FormState::LoadFailed(err));
            }
        }
    }

    /// Re-invoke the fetch after a failed load.
    pub async fn retry_load(&self) {
        if matches!(self.state(), FormState::LoadFailed(_)) {
            self.load().await;
        } else {
            warn!("retry ignored: the form is not in a failed-load state");
        }
    }

    /// Sole mutation entry point for the draft. Ignored while inputs are
    /// disabled (loading or submitting). Fresh input clears any attached
    /// error.
    pub fn handle_change(&self, change: FieldChange) {
        let FormState::Idle { draft, .. } = self.state() else {
            warn!("edit ignored: form inputs are disabled");
            return;
        };
        self.transition(FormState::Idle {
            draft: draft.apply(change),
            error: None,
        });
    }

    /// Validate and submit the draft. On validation failure the gateway is
    /// never called; on remote failure the draft is preserved verbatim.
    pub async fn submit(&self) {
        let draft = match self.state() {
            FormState::Idle { draft, .. } => draft,
            FormState::Submitting { .. } => {
                warn!("submit ignored: a submission is already in flight");
                return;
            }
            _ => {
                warn!("submit ignored: the form is not editable");
                return;
            }
        };

        let payload = match validate(&draft, self.policy) {
            Ok(payload) => payload,
            Err(err) => {
                debug!(%err, "validation rejected the draft");
                self.transition(FormState::Idle {
                    draft,
                    error: Some(err.into()),
                });
                return;
            }
        };

        self.transition(FormState::Submitting {
            draft: draft.clone(),
        });

        let result = match &self.mode {
            FormMode::Create => self.gateway.create(&payload).await,
            FormMode::Update { sku } => self.gateway.update(sku, &payload).await,
        };

        match result {
            Ok(product) => {
                info!(sku = %product.sku, "product saved");
                self.toasts.success(match &self.mode {
                    FormMode::Create => "Product created",
                    FormMode::Update { .. } => "Product updated",
                });
                self.transition(FormState::Committed(product.clone()));

                // Settle: empty draft for creation, re-synced to the server
                // value for update.
                let draft = match &self.mode {
                    FormMode::Create => ProductDraft::default(),
                    FormMode::Update { .. } => ProductDraft::from_product(&product),
                };
                self.transition(FormState::Idle { draft, error: None });
            }
            Err(err) => {
                warn!(%err, "submission failed");
                self.toasts.error(err.user_message());
                self.transition(FormState::Idle {
                    draft,
                    error: Some(err.into()),
                });
            }
        }
    }
}
