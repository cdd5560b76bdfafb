//! Event contracts between the controller and the host UI layer.
//!
//! The controller never inspects concrete event types from whatever UI
//! toolkit hosts it. It only needs three narrow views, one per handler,
//! mirroring the fields a DOM-style event would carry.

/// Input-change notification; carries the new text of the field
/// (`target.value` in DOM terms).
pub trait ChangeEvent {
    fn value(&self) -> &str;
}

/// Focus-loss notification; identifies which field was left
/// (`target.name` in DOM terms).
pub trait BlurEvent {
    fn target_name(&self) -> &str;
}

/// Form-submission notification. The controller always suppresses the
/// host's default submission behavior before validating.
pub trait SubmitEvent {
    fn prevent_default(&mut self);
}
