use alloc::string::String;

use serde::{Deserialize, Serialize};

use crate::action::Action;

/// A structured action intent produced by an external reasoning component.
///
/// An intent is transient: it is consumed by exactly one resolution turn
/// and discarded afterwards. The selection criteria are a free-text
/// fragment matched against device names, kinds, and room names; the
/// action is absent for pass-through conversational turns that require no
/// device mutation.
///
/// The reasoning component is an untrusted upstream producer, so every
/// field is re-validated by the engine before any state changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Free-text device selection criteria.
    pub selection_criteria: String,
    /// The requested action, if any.
    #[serde(flatten)]
    pub action: Option<Action>,
}

impl Intent {
    /// Creates an [`Intent`] carrying an [`Action`].
    #[must_use]
    #[inline]
    pub const fn act(selection_criteria: String, action: Action) -> Self {
        Self {
            selection_criteria,
            action: Some(action),
        }
    }

    /// Creates a pass-through [`Intent`] without an [`Action`].
    #[must_use]
    #[inline]
    pub const fn pass_through(selection_criteria: String) -> Self {
        Self {
            selection_criteria,
            action: None,
        }
    }
}
