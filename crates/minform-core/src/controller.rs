//! The form controller: values, errors, validity flag and the handlers
//! that mutate them.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::attributes::FieldAttributes;
use crate::events::{BlurEvent, ChangeEvent, SubmitEvent};
use crate::state::MutableState;

/// Identifier of one form field, key into [`FieldMap`].
pub type FieldName = String;

/// Mapping from field name to text. Used both for current values and for
/// validation messages, where the empty string means "no error".
pub type FieldMap = FxHashMap<FieldName, String>;

/// Host-supplied validation function: full values in, per-field messages
/// out. Fields omitted from the result are treated as having no error.
pub type Validator = Rc<dyn Fn(&FieldMap) -> FieldMap>;

/// Construction input for [`FormController::new`].
#[derive(Default)]
pub struct FormConfig {
    /// Initial field values; their key set fixes which fields exist.
    pub default_values: FieldMap,
    /// Validator installed at construction. Can be replaced later via
    /// [`FormController::validate`].
    pub default_errors: Option<Validator>,
}

struct FormCore {
    default_values: FieldMap,
    /// Same key set as `default_values`, every entry forced to the empty
    /// string. Built once at construction and reused by `reset`.
    blank_errors: FieldMap,
    values: MutableState<FieldMap>,
    errors: MutableState<FieldMap>,
    all_clear: Rc<Cell<bool>>,
    validator: RefCell<Option<Validator>>,
}

/// Stateful controller for one form instance.
///
/// Cheap to clone; clones share the same state. Each call to
/// [`FormController::new`] produces an independent instance, to be owned
/// by (and torn down with) one host component.
pub struct FormController {
    core: Rc<FormCore>,
}

impl Clone for FormController {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

/// Outcome of revalidating every field on submit.
struct FullValidation {
    send: bool,
    /// The validator's full output, shown to the user whether or not the
    /// submission goes through. `None` only when no validator is set.
    candidate: Option<FieldMap>,
}

impl FormController {
    pub fn new(config: FormConfig) -> Self {
        let FormConfig {
            default_values,
            default_errors,
        } = config;

        let blank_errors: FieldMap = default_values
            .keys()
            .map(|name| (name.clone(), String::new()))
            .collect();

        let values = MutableState::new(default_values.clone());
        let errors = MutableState::new(blank_errors.clone());

        let all_clear = Rc::new(Cell::new(true));
        {
            let flag = Rc::clone(&all_clear);
            errors.watch(move |errors: &FieldMap| {
                flag.set(errors.values().all(|message| message.is_empty()));
            });
        }
        // Watchers only fire on writes; derive the flag once for the
        // initial contents.
        errors.with(|map| all_clear.set(map.values().all(|message| message.is_empty())));

        Self {
            core: Rc::new(FormCore {
                default_values,
                blank_errors,
                values,
                errors,
                all_clear,
                validator: RefCell::new(default_errors),
            }),
        }
    }

    /// Snapshot of the current values.
    pub fn values(&self) -> FieldMap {
        self.core.values.get()
    }

    /// Snapshot of the current validation messages.
    pub fn errors(&self) -> FieldMap {
        self.core.errors.get()
    }

    /// Derived flag: true iff no field currently carries a message.
    /// Always consistent with [`FormController::errors`] by the time any
    /// mutating call returns.
    pub fn is_valid(&self) -> bool {
        self.core.all_clear.get()
    }

    /// Installs `validator`, replacing whatever was active (including the
    /// constructor-supplied one). Takes effect for all subsequent blur
    /// and submit validations.
    pub fn validate(&self, validator: impl Fn(&FieldMap) -> FieldMap + 'static) {
        *self.core.validator.borrow_mut() = Some(Rc::new(validator));
    }

    /// Produces the wiring for one rendered field: current value, error
    /// flag, helper text and the change/blur/mount dispatchers.
    ///
    /// Pure read; the only mutation reachable from the returned record is
    /// the [`FieldAttributes::mount`] backfill.
    pub fn attributes(&self, name: &str) -> FieldAttributes {
        let value = self
            .core
            .values
            .with(|values| values.get(name).cloned())
            .unwrap_or_default();
        let message = self
            .core
            .errors
            .with(|errors| errors.get(name).cloned())
            .unwrap_or_default();

        let on_change = {
            let controller = self.clone();
            let name = name.to_owned();
            Rc::new(move |event: &dyn ChangeEvent| controller.handle_change(&name, event))
        };
        let on_blur = {
            let controller = self.clone();
            Rc::new(move |event: &dyn BlurEvent| controller.handle_blur(event))
        };
        let mount = {
            let controller = self.clone();
            let name = name.to_owned();
            Rc::new(move || controller.mount_field(&name))
        };

        FieldAttributes::new(name.to_owned(), value, message, on_change, on_blur, mount)
    }

    /// Sets errors back to the all-empty construction mapping and values
    /// back to the construction defaults. The registered validator is
    /// kept.
    pub fn reset(&self) {
        log::trace!("reset to construction defaults");
        self.core.errors.set(self.core.blank_errors.clone());
        self.core.values.set(self.core.default_values.clone());
    }

    /// Wraps `on_valid` in a submit event handler.
    ///
    /// The handler suppresses the host's default submission behavior and
    /// revalidates every field. If any field's message would change, the
    /// new messages replace the stored ones and `on_valid` is not called.
    /// Otherwise `on_valid` receives the current values.
    ///
    /// Note the gate is "no message changed", not "no message present":
    /// a validator that returns the stored messages unchanged permits
    /// submission even when some of them are non-empty, and a missing
    /// validator always permits submission.
    pub fn submit<F>(&self, on_valid: F) -> impl Fn(&mut dyn SubmitEvent)
    where
        F: Fn(&FieldMap) + 'static,
    {
        let controller = self.clone();
        move |event: &mut dyn SubmitEvent| {
            event.prevent_default();
            let outcome = controller.validate_all_fields();
            if !outcome.send {
                if let Some(candidate) = outcome.candidate {
                    log::debug!("submit blocked; updating validation messages");
                    controller.core.errors.set(candidate);
                }
                return;
            }
            log::debug!("submit accepted");
            // Hand the callback a detached snapshot so it can freely call
            // back into the controller (reset after a successful submit is
            // the usual host pattern).
            let snapshot = controller.values();
            on_valid(&snapshot);
        }
    }

    fn handle_change(&self, name: &str, event: &dyn ChangeEvent) {
        let value = event.value().to_owned();
        log::trace!("change: {name} <- {value:?}");
        self.core.values.update(|values| {
            values.insert(name.to_owned(), value);
        });
    }

    fn handle_blur(&self, event: &dyn BlurEvent) {
        let validator = self.core.validator.borrow().clone();
        let Some(validator) = validator else {
            return;
        };
        let name = event.target_name().to_owned();
        // Run the validator against a detached snapshot; it may read the
        // controller itself.
        let snapshot = self.values();
        let candidate = validator(&snapshot);
        // Only this field's entry is touched; a blur on one field never
        // surfaces messages for the others.
        let message = candidate.get(&name).cloned().unwrap_or_default();
        log::trace!("blur: {name} -> {message:?}");
        self.core.errors.update(|errors| {
            errors.insert(name, message);
        });
    }

    fn mount_field(&self, name: &str) {
        if self.core.errors.with(|errors| !errors.contains_key(name)) {
            self.core.errors.update(|errors| {
                errors.insert(name.to_owned(), String::new());
            });
        }
        if self.core.values.with(|values| !values.contains_key(name)) {
            self.core.values.update(|values| {
                values.insert(name.to_owned(), String::new());
            });
        }
    }

    fn validate_all_fields(&self) -> FullValidation {
        let validator = self.core.validator.borrow().clone();
        let Some(validator) = validator else {
            return FullValidation {
                send: true,
                candidate: None,
            };
        };

        let snapshot = self.values();
        let candidate = validator(&snapshot);
        // Compare key-by-key over the stored key set; a key the validator
        // omitted counts as "no error" rather than "changed".
        let changed: SmallVec<[FieldName; 4]> = self.core.errors.with(|errors| {
            errors
                .iter()
                .filter(|(name, stored)| {
                    let fresh = candidate.get(name.as_str()).map(String::as_str).unwrap_or("");
                    fresh != stored.as_str()
                })
                .map(|(name, _)| name.clone())
                .collect()
        });

        if !changed.is_empty() {
            log::debug!("full validation changed {} field(s): {changed:?}", changed.len());
        }

        FullValidation {
            send: changed.is_empty(),
            candidate: Some(candidate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Typed(&'static str);

    impl ChangeEvent for Typed {
        fn value(&self) -> &str {
            self.0
        }
    }

    struct Left(&'static str);

    impl BlurEvent for Left {
        fn target_name(&self) -> &str {
            self.0
        }
    }

    struct Submission {
        prevented: bool,
    }

    impl SubmitEvent for Submission {
        fn prevent_default(&mut self) {
            self.prevented = true;
        }
    }

    fn defaults(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn form(pairs: &[(&str, &str)]) -> FormController {
        FormController::new(FormConfig {
            default_values: defaults(pairs),
            default_errors: None,
        })
    }

    #[test]
    fn construction_starts_clean_and_valid() {
        let form = form(&[("email", "a@b.c"), ("password", "")]);
        assert_eq!(form.values().get("email").unwrap(), "a@b.c");
        assert_eq!(form.errors().get("email").unwrap(), "");
        assert_eq!(form.errors().get("password").unwrap(), "");
        assert!(form.is_valid());
    }

    #[test]
    fn change_updates_value_and_leaves_errors_alone() {
        let form = form(&[("email", "")]);
        form.attributes("email").on_change(&Typed("me@host"));
        assert_eq!(form.values().get("email").unwrap(), "me@host");
        assert_eq!(form.errors().get("email").unwrap(), "");
    }

    #[test]
    fn blur_without_validator_is_a_no_op() {
        let form = form(&[("email", "")]);
        form.attributes("email").on_blur(&Left("email"));
        assert_eq!(form.errors().get("email").unwrap(), "");
        assert!(form.is_valid());
    }

    #[test]
    fn blur_updates_only_the_blurred_field() {
        let form = form(&[("email", ""), ("password", "")]);
        form.validate(|_values| {
            defaults(&[("email", "required"), ("password", "required")])
        });
        form.attributes("email").on_blur(&Left("email"));
        assert_eq!(form.errors().get("email").unwrap(), "required");
        assert_eq!(form.errors().get("password").unwrap(), "");
        assert!(!form.is_valid());
    }

    #[test]
    fn blur_treats_an_omitted_field_as_clean() {
        let form = form(&[("email", "")]);
        form.validate(|_values| FieldMap::default());
        form.attributes("email").on_blur(&Left("email"));
        assert_eq!(form.errors().get("email").unwrap(), "");
    }

    #[test]
    fn validate_replaces_the_constructor_validator() {
        let constructed: Validator =
            Rc::new(|_values: &FieldMap| defaults(&[("email", "from constructor")]));
        let form = FormController::new(FormConfig {
            default_values: defaults(&[("email", "")]),
            default_errors: Some(constructed),
        });
        form.validate(|_values| defaults(&[("email", "from validate")]));
        form.attributes("email").on_blur(&Left("email"));
        assert_eq!(form.errors().get("email").unwrap(), "from validate");
    }

    #[test]
    fn validity_flag_recovers_when_messages_clear() {
        let form = form(&[("email", "")]);
        form.validate(|values| {
            let message = if values.get("email").map(String::as_str) == Some("") {
                "required"
            } else {
                ""
            };
            defaults(&[("email", message)])
        });
        form.attributes("email").on_blur(&Left("email"));
        assert!(!form.is_valid());

        form.attributes("email").on_change(&Typed("me@host"));
        form.attributes("email").on_blur(&Left("email"));
        assert!(form.is_valid());
    }

    #[test]
    fn submit_prevents_the_default_behavior() {
        let form = form(&[("email", "")]);
        let handler = form.submit(|_values| {});
        let mut event = Submission { prevented: false };
        handler(&mut event);
        assert!(event.prevented);
    }

    #[test]
    fn reset_is_idempotent() {
        let form = form(&[("email", "seed")]);
        form.validate(|_values| defaults(&[("email", "bad")]));
        form.attributes("email").on_change(&Typed("edited"));
        form.attributes("email").on_blur(&Left("email"));

        form.reset();
        let once_values = form.values();
        let once_errors = form.errors();
        form.reset();
        assert_eq!(form.values(), once_values);
        assert_eq!(form.errors(), once_errors);
        assert_eq!(form.values().get("email").unwrap(), "seed");
        assert_eq!(form.errors().get("email").unwrap(), "");
        assert!(form.is_valid());
    }

    #[test]
    fn reset_keeps_the_registered_validator() {
        let form = form(&[("email", "")]);
        form.validate(|_values| defaults(&[("email", "still here")]));
        form.reset();
        form.attributes("email").on_blur(&Left("email"));
        assert_eq!(form.errors().get("email").unwrap(), "still here");
    }

    #[test]
    fn accessor_backfills_a_field_missing_from_defaults() {
        let form = form(&[]);
        let attrs = form.attributes("nickname");
        assert_eq!(attrs.value(), "");
        assert!(!attrs.error());
        assert_eq!(attrs.helper_text(), "");

        attrs.mount();
        assert_eq!(form.values().get("nickname").unwrap(), "");
        assert_eq!(form.errors().get("nickname").unwrap(), "");
        assert!(form.is_valid());
    }

    #[test]
    fn accessor_reads_do_not_mutate_state() {
        let form = form(&[("email", "")]);
        let values_before = form.values();
        let errors_before = form.errors();
        let _ = form.attributes("ghost");
        assert_eq!(form.values(), values_before);
        assert_eq!(form.errors(), errors_before);
    }

    #[test]
    fn success_callback_may_call_back_into_the_form() {
        let form = form(&[("email", "seed")]);
        form.attributes("email").on_change(&Typed("edited"));

        let handler = form.submit({
            let form = form.clone();
            move |values: &FieldMap| {
                assert_eq!(values.get("email").unwrap(), "edited");
                // The callback gets a detached snapshot, so mutating the
                // form from inside it must work.
                form.reset();
            }
        });
        let mut event = Submission { prevented: false };
        handler(&mut event);

        assert_eq!(form.values().get("email").unwrap(), "seed");
        assert!(form.is_valid());
    }

    #[test]
    fn controllers_are_independent() {
        let a = form(&[("email", "")]);
        let b = form(&[("email", "")]);
        a.attributes("email").on_change(&Typed("only a"));
        assert_eq!(a.values().get("email").unwrap(), "only a");
        assert_eq!(b.values().get("email").unwrap(), "");
    }
}
