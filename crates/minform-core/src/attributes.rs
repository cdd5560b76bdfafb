//! Per-field wiring records produced by [`FormController::attributes`].
//!
//! [`FormController::attributes`]: crate::FormController::attributes

use std::fmt;
use std::rc::Rc;

use crate::controller::FieldName;
use crate::events::{BlurEvent, ChangeEvent};

/// Everything a rendering layer needs to wire one input element.
///
/// The record is a snapshot: value, error flag and helper text are read
/// from the controller at the moment of the accessor call. Request a
/// fresh record after state changes instead of holding on to one.
#[derive(Clone)]
pub struct FieldAttributes {
    name: FieldName,
    value: String,
    error: bool,
    helper_text: String,
    on_change: Rc<dyn Fn(&dyn ChangeEvent)>,
    on_blur: Rc<dyn Fn(&dyn BlurEvent)>,
    mount: Rc<dyn Fn()>,
}

impl FieldAttributes {
    pub(crate) fn new(
        name: FieldName,
        value: String,
        message: String,
        on_change: Rc<dyn Fn(&dyn ChangeEvent)>,
        on_blur: Rc<dyn Fn(&dyn BlurEvent)>,
        mount: Rc<dyn Fn()>,
    ) -> Self {
        Self {
            name,
            value,
            error: !message.is_empty(),
            helper_text: message,
            on_change,
            on_blur,
            mount,
        }
    }

    /// Stable field name pass-through.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current value of the field, empty string if never set.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// True iff the field currently carries a validation message.
    pub fn error(&self) -> bool {
        self.error
    }

    /// The validation message to display, empty string if none.
    pub fn helper_text(&self) -> &str {
        &self.helper_text
    }

    /// Forwards a change event to the controller; updates this field's
    /// value and leaves errors untouched.
    pub fn on_change(&self, event: &dyn ChangeEvent) {
        (self.on_change)(event);
    }

    /// Forwards a blur event to the controller; revalidates this field
    /// if a validator is registered.
    pub fn on_blur(&self, event: &dyn BlurEvent) {
        (self.on_blur)(event);
    }

    /// Defensive backfill, intended to run once when the field is first
    /// attached to a rendered element. Fields requested dynamically
    /// (absent from the construction defaults) get their empty-string
    /// entries here so later lookups never miss.
    pub fn mount(&self) {
        (self.mount)();
    }
}

impl fmt::Debug for FieldAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldAttributes")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("error", &self.error)
            .field("helper_text", &self.helper_text)
            .finish_non_exhaustive()
    }
}
