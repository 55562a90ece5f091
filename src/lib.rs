//! Client-side data synchronization core for a shoe-store inventory
//! manager.
//!
//! The crate owns the part of the UI that must correctly reconcile local
//! state with asynchronous, partially-failing network operations: a pure
//! validation engine, a REST product gateway, the form and collection
//! state controllers, and a transient notification channel. Rendering,
//! routing, and the server itself are external collaborators; every state
//! transition is observable as an immutable snapshot.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod catalog;
pub mod config;
pub mod controllers;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod notify;
pub mod validation;

pub use catalog::{Brand, ReferenceData, SizeChart, SizeOption};
pub use config::{load_config, AppConfig};
pub use controllers::{CollectionController, CollectionState, FormController, FormState};
pub use errors::{FormError, GatewayError, ValidationError};
pub use gateway::ProductGateway;
pub use models::{Category, FieldChange, Gender, Product, ProductDraft, ProductPayload};
pub use notify::{Toast, ToastChannel, ToastKind};
pub use validation::{validate, ValidationPolicy};
