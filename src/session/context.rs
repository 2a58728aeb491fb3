//! Session context types

use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which daily check-in flow a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckType {
    /// Start-of-day check-in
    #[default]
    Start,
    /// End-of-day check-out
    End,
}

impl CheckType {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckType::Start => "start",
            CheckType::End => "end",
        }
    }

    /// Label used on the welcome form
    pub fn option_label(self) -> &'static str {
        match self {
            CheckType::Start => "🌅 Start of Day",
            CheckType::End => "🌇 End of Day",
        }
    }

    /// Label used in the chat header
    pub fn header_label(self) -> &'static str {
        match self {
            CheckType::Start => "🌅 Morning Check-in",
            CheckType::End => "🌇 Evening Check-out",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            CheckType::Start => CheckType::End,
            CheckType::End => CheckType::Start,
        }
    }
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-reported position in the dialogue.
///
/// Stored exactly as the service sent it; the client never derives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current: u32,
    pub total: u32,
}

impl Progress {
    pub fn new(current: u32, total: u32) -> Self {
        Self { current, total }
    }

    /// Completion fraction clamped to `[0, 1]`; `0` when `total` is zero
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (f64::from(self.current) / f64::from(self.total)).clamp(0.0, 1.0)
    }

    /// Whole-number percentage for a progress bar width
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // fraction is in [0, 1]
    pub fn percent(&self) -> u16 {
        (self.fraction() * 100.0).round() as u16
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.current, self.total)
    }
}

/// Trimmed, non-empty participant name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantName(String);

impl ParticipantName {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One active check-in. Everything but `progress` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    session_id: String,
    participant: ParticipantName,
    check_type: CheckType,
    progress: Progress,
}

impl SessionContext {
    pub fn new(
        session_id: impl Into<String>,
        participant: ParticipantName,
        check_type: CheckType,
        progress: Progress,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            participant,
            check_type,
            progress,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn participant(&self) -> &ParticipantName {
        &self.participant
    }

    pub fn check_type(&self) -> CheckType {
        self.check_type
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Replace progress with a server-reported value.
    pub(crate) fn replace_progress(&mut self, progress: Progress) {
        if progress.total != self.progress.total {
            tracing::warn!(
                session_id = %self.session_id,
                old_total = self.progress.total,
                new_total = progress.total,
                "Service changed the step count mid-session"
            );
        }
        self.progress = progress;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_trimmed() {
        let name = ParticipantName::parse("  Ana \t").unwrap();
        assert_eq!(name.as_str(), "Ana");
    }

    #[test]
    fn test_blank_names_rejected() {
        for raw in ["", "   ", "\n\t "] {
            assert_eq!(ParticipantName::parse(raw), Err(ValidationError::EmptyName));
        }
    }

    #[test]
    fn test_progress_fraction() {
        assert_eq!(Progress::new(1, 5).percent(), 20);
        assert_eq!(Progress::new(0, 5).percent(), 0);
        assert_eq!(Progress::new(5, 5).percent(), 100);
        assert_eq!(Progress::new(1, 3).percent(), 33);
    }

    #[test]
    fn test_progress_fraction_clamped() {
        assert_eq!(Progress::new(7, 5).percent(), 100);
        assert_eq!(Progress::new(3, 0).percent(), 0);
    }

    #[test]
    fn test_progress_display() {
        assert_eq!(Progress::new(0, 5).to_string(), "0 / 5");
    }

    #[test]
    fn test_check_type_labels() {
        assert_eq!(CheckType::default(), CheckType::Start);
        assert_eq!(CheckType::Start.header_label(), "🌅 Morning Check-in");
        assert_eq!(CheckType::End.header_label(), "🌇 Evening Check-out");
        assert_eq!(CheckType::Start.toggled(), CheckType::End);
        assert_eq!(CheckType::End.to_string(), "end");
    }

    #[test]
    fn test_replace_progress_keeps_identity() {
        let mut context = SessionContext::new(
            "s1",
            ParticipantName::parse("Ana").unwrap(),
            CheckType::Start,
            Progress::new(0, 5),
        );
        context.replace_progress(Progress::new(2, 5));
        assert_eq!(context.progress(), Progress::new(2, 5));
        assert_eq!(context.session_id(), "s1");
        assert_eq!(context.participant().as_str(), "Ana");
    }
}
