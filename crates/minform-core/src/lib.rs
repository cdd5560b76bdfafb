//! Host-agnostic form input state management.
//!
//! One [`FormController`] instance tracks field values, per-field
//! validation messages and a derived validity flag, and hands a rendering
//! layer everything it needs to wire one input element through
//! [`FormController::attributes`]. Validation itself is injected by the
//! host as a function from values to messages.
//!
//! # Core Types
//!
//! - [`FormController`] - stateful controller for one form instance
//! - [`FormConfig`] - construction input (defaults plus optional validator)
//! - [`FieldAttributes`] - per-field wiring record for the rendering layer
//! - [`ChangeEvent`] / [`BlurEvent`] / [`SubmitEvent`] - host event seams
//! - [`MutableState`] - observable cell the controller state lives in
//!
//! # Example
//!
//! ```
//! use minform_core::{ChangeEvent, FieldMap, FormConfig, FormController};
//!
//! struct Keystroke(&'static str);
//!
//! impl ChangeEvent for Keystroke {
//!     fn value(&self) -> &str {
//!         self.0
//!     }
//! }
//!
//! let mut defaults = FieldMap::default();
//! defaults.insert("email".to_string(), String::new());
//!
//! let form = FormController::new(FormConfig {
//!     default_values: defaults,
//!     default_errors: None,
//! });
//!
//! form.attributes("email").on_change(&Keystroke("me@host"));
//! assert_eq!(form.values().get("email").unwrap(), "me@host");
//! assert!(form.is_valid());
//! ```

mod attributes;
mod controller;
mod events;
mod state;

pub use attributes::FieldAttributes;
pub use controller::{FieldMap, FieldName, FormConfig, FormController, Validator};
pub use events::{BlurEvent, ChangeEvent, SubmitEvent};
pub use state::MutableState;
