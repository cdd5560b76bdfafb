//! Scripted interaction testing for form controllers.
//!
//! This crate drives a [`FormController`] the way a user would drive a
//! rendered form: type into a field, leave it, press submit. It ships
//! simulated event types satisfying the controller's event seams plus a
//! [`FormRobot`] with assertion helpers for validating form state.
//!
//! # Example
//!
//! ```
//! use minform_testing::FormRobot;
//!
//! let robot = FormRobot::with_defaults(&[("email", "")]);
//! robot.type_into("email", "me@host");
//! robot.assert_value("email", "me@host");
//!
//! let outcome = robot.press_submit();
//! assert!(outcome.accepted);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use minform_core::{
    BlurEvent, ChangeEvent, FieldMap, FormConfig, FormController, SubmitEvent,
};

/// Simulated change event carrying the typed text.
pub struct TypedText(pub String);

impl ChangeEvent for TypedText {
    fn value(&self) -> &str {
        &self.0
    }
}

/// Simulated blur event naming the field the focus left.
pub struct FocusLeft(pub String);

impl BlurEvent for FocusLeft {
    fn target_name(&self) -> &str {
        &self.0
    }
}

/// Simulated submit event that records whether the controller suppressed
/// the default behavior.
#[derive(Default)]
pub struct FormSubmission {
    default_prevented: bool,
}

impl FormSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

impl SubmitEvent for FormSubmission {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

/// Result of pressing submit through the robot.
#[derive(Debug)]
pub struct SubmitOutcome {
    /// Whether the controller invoked the success callback.
    pub accepted: bool,
    /// The values handed to the success callback, when it ran.
    pub values: Option<FieldMap>,
    /// Whether the controller suppressed the default submission behavior.
    pub default_prevented: bool,
}

/// Drives a [`FormController`] with simulated user interaction.
pub struct FormRobot {
    form: FormController,
}

impl FormRobot {
    pub fn new(form: FormController) -> Self {
        Self { form }
    }

    /// Builds a controller from `(field, initial value)` pairs and wraps
    /// it in a robot.
    pub fn with_defaults(pairs: &[(&str, &str)]) -> Self {
        let default_values: FieldMap = pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Self::new(FormController::new(FormConfig {
            default_values,
            default_errors: None,
        }))
    }

    /// The controller under test.
    pub fn form(&self) -> &FormController {
        &self.form
    }

    /// Runs the mount backfill for `field`, as a rendering layer would on
    /// first attach.
    pub fn mount(&self, field: &str) {
        self.form.attributes(field).mount();
    }

    /// Mounts `field` and replaces its content with `text`.
    pub fn type_into(&self, field: &str, text: &str) {
        let attributes = self.form.attributes(field);
        attributes.mount();
        attributes.on_change(&TypedText(text.to_owned()));
    }

    /// Moves focus away from `field`, triggering blur validation.
    pub fn leave(&self, field: &str) {
        self.form
            .attributes(field)
            .on_blur(&FocusLeft(field.to_owned()));
    }

    /// Presses submit and reports whether the success callback fired and
    /// with which values.
    pub fn press_submit(&self) -> SubmitOutcome {
        let seen: Rc<RefCell<Option<FieldMap>>> = Rc::new(RefCell::new(None));
        let handler = self.form.submit({
            let seen = Rc::clone(&seen);
            move |values: &FieldMap| {
                *seen.borrow_mut() = Some(values.clone());
            }
        });

        let mut event = FormSubmission::new();
        handler(&mut event);

        let values = seen.borrow_mut().take();
        SubmitOutcome {
            accepted: values.is_some(),
            values,
            default_prevented: event.default_prevented(),
        }
    }

    /// Asserts the current value of `field`.
    pub fn assert_value(&self, field: &str, expected: &str) {
        let attributes = self.form.attributes(field);
        assert_eq!(
            attributes.value(),
            expected,
            "field '{}': expected value {:?}, got {:?}",
            field,
            expected,
            attributes.value()
        );
    }

    /// Asserts that `field` carries exactly `message`.
    pub fn assert_error(&self, field: &str, message: &str) {
        let attributes = self.form.attributes(field);
        assert!(
            attributes.error(),
            "field '{}': expected an error, found none",
            field
        );
        assert_eq!(
            attributes.helper_text(),
            message,
            "field '{}': expected message {:?}, got {:?}",
            field,
            message,
            attributes.helper_text()
        );
    }

    /// Asserts that `field` carries no validation message.
    pub fn assert_clean(&self, field: &str) {
        let attributes = self.form.attributes(field);
        assert!(
            !attributes.error() && attributes.helper_text().is_empty(),
            "field '{}': expected no error, got {:?}",
            field,
            attributes.helper_text()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_into_mounts_and_updates() {
        let robot = FormRobot::with_defaults(&[]);
        robot.type_into("title", "hello");
        robot.assert_value("title", "hello");
        robot.assert_clean("title");
    }

    #[test]
    fn mount_backfills_a_dynamic_field() {
        let robot = FormRobot::with_defaults(&[]);
        robot.mount("nickname");
        robot.assert_value("nickname", "");
        robot.assert_clean("nickname");
        assert!(robot.form().values().contains_key("nickname"));
        assert!(robot.form().errors().contains_key("nickname"));
    }

    #[test]
    fn press_submit_reports_prevented_default() {
        let robot = FormRobot::with_defaults(&[("email", "")]);
        let outcome = robot.press_submit();
        assert!(outcome.default_prevented);
        assert!(outcome.accepted);
    }

    #[test]
    fn leave_surfaces_validator_messages() {
        let robot = FormRobot::with_defaults(&[("email", "")]);
        robot.form().validate(|_values| {
            let mut messages = FieldMap::default();
            messages.insert("email".to_string(), "required".to_string());
            messages
        });
        robot.leave("email");
        robot.assert_error("email", "required");
    }
}
