//! Welcome form state

use crate::session::{CheckType, ParticipantName};

/// The pre-session form: name, check type, inline error
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WelcomeForm {
    pub name: String,
    pub check_type: CheckType,
    pub error: Option<String>,
    /// A `start-session` request is in flight
    pub loading: bool,
}

impl WelcomeForm {
    pub fn type_char(&mut self, c: char) {
        if !self.loading {
            self.name.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if !self.loading {
            self.name.pop();
        }
    }

    pub fn toggle_check_type(&mut self) {
        if !self.loading {
            self.check_type = self.check_type.toggled();
        }
    }

    /// Validate and mark the form as loading.
    ///
    /// Returns the inputs to start with, or `None` when the form is busy or
    /// the name is blank (in which case the inline error is set).
    pub fn begin_start(&mut self) -> Option<(String, CheckType)> {
        if self.loading {
            return None;
        }
        if let Err(e) = ParticipantName::parse(&self.name) {
            self.error = Some(e.to_string());
            return None;
        }
        self.loading = true;
        self.error = None;
        Some((self.name.clone(), self.check_type))
    }

    /// The start request failed; keep the inputs for a retry
    pub fn start_failed(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }
}
