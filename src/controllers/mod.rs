//! State controllers shared by the listing, creation, and update flows.
//! Each controller owns its state exclusively and publishes an immutable
//! snapshot per transition.

pub mod collection;
pub mod form;

pub use collection::{CollectionController, CollectionState};
pub use form::{FormController, FormState};
