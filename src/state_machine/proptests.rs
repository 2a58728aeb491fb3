//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::transition::*;
use super::*;
use crate::session::{CheckType, ParticipantName, Progress, SessionContext, TurnOrigin};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context(progress: Progress) -> SessionContext {
    SessionContext::new(
        "test-session",
        ParticipantName::parse("Ana").unwrap(),
        CheckType::Start,
        progress,
    )
}

/// Minimal stand-in for the driver: applies effects and counts requests
#[derive(Debug)]
struct Model {
    state: ConvState,
    context: SessionContext,
    turns: Vec<TurnOrigin>,
    outstanding: u32,
    requests: u32,
    last_reported: Option<Progress>,
    ended: bool,
}

impl Model {
    fn new() -> Self {
        Self {
            state: ConvState::Composing,
            context: test_context(Progress::new(0, 5)),
            turns: vec![TurnOrigin::Bot],
            outstanding: 0,
            requests: 0,
            last_reported: None,
            ended: false,
        }
    }

    fn apply(&mut self, event: Event) -> Result<(), TransitionError> {
        if let Event::ServiceReply {
            progress: Some(p), ..
        } = &event
        {
            if self.state == ConvState::AwaitingResponse {
                self.last_reported = Some(*p);
            }
        }
        let settles = matches!(
            event,
            Event::ServiceReply { .. } | Event::ServiceFailed { .. }
        );

        let result = transition(&self.state, &self.context, event)?;
        self.state = result.new_state;
        if settles {
            self.outstanding -= 1;
        }
        for effect in result.effects {
            match effect {
                Effect::AppendTurn { origin, .. } => self.turns.push(origin),
                Effect::ReplaceProgress(p) => self.context.replace_progress(p),
                Effect::SendMessage { .. } => {
                    self.outstanding += 1;
                    self.requests += 1;
                }
                Effect::CancelRemoteSession => {}
                Effect::EndSession => self.ended = true,
            }
        }
        Ok(())
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_state() -> impl Strategy<Value = ConvState> {
    prop_oneof![
        Just(ConvState::Composing),
        Just(ConvState::AwaitingResponse),
        Just(ConvState::Completed),
    ]
}

fn arb_progress() -> impl Strategy<Value = Progress> {
    (0u32..8, 1u32..8).prop_map(|(current, total)| Progress::new(current.min(total), total))
}

fn arb_submit_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-zA-Z ]{1,30}".prop_map(|text| Event::UserSubmit { text }),
        "[ \t]{0,4}".prop_map(|text| Event::UserSubmit { text }),
    ]
}

fn arb_reply_event() -> impl Strategy<Value = Event> {
    (
        "[a-zA-Z?!. ]{1,40}",
        proptest::option::of(arb_progress()),
        prop::bool::weighted(0.15),
    )
        .prop_map(|(message, progress, completed)| Event::ServiceReply {
            message,
            progress,
            completed,
        })
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        4 => arb_submit_event(),
        3 => arb_reply_event(),
        1 => "[a-z ]{1,20}".prop_map(|detail| Event::ServiceFailed { detail }),
        1 => Just(Event::UserReset),
        1 => Just(Event::UserAbandon),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // At most one exchange is ever outstanding
    #[test]
    fn prop_single_outstanding_request(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut model = Model::new();
        for event in events {
            if model.ended {
                break;
            }
            let _ = model.apply(event);
            prop_assert!(model.outstanding <= 1, "outstanding = {}", model.outstanding);
            prop_assert_eq!(model.outstanding == 1, model.state == ConvState::AwaitingResponse);
        }
    }

    // Progress equals the latest reported value, never a derived one
    #[test]
    fn prop_progress_is_server_authoritative(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut model = Model::new();
        for event in events {
            if model.ended {
                break;
            }
            let _ = model.apply(event);
            let expected = model.last_reported.unwrap_or(Progress::new(0, 5));
            prop_assert_eq!(model.context.progress(), expected);
        }
    }

    // Each request is preceded by exactly one user turn
    #[test]
    fn prop_user_turns_match_requests(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut model = Model::new();
        for event in events {
            if model.ended {
                break;
            }
            let _ = model.apply(event);
            let user_turns = model.turns.iter().filter(|o| **o == TurnOrigin::User).count();
            prop_assert_eq!(user_turns, model.requests as usize);
        }
    }

    // Rejected events leave state, transcript, requests and progress untouched
    #[test]
    fn prop_rejections_are_noops(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut model = Model::new();
        for event in events {
            if model.ended {
                break;
            }
            let before = (model.state, model.turns.clone(), model.requests, model.context.progress());
            if model.apply(event).is_err() {
                let after = (model.state, model.turns.clone(), model.requests, model.context.progress());
                prop_assert_eq!(before, after);
            }
        }
    }

    // A rejected submit is always one of the documented reasons
    #[test]
    fn prop_submit_rejections_are_documented(state in arb_state(), event in arb_submit_event()) {
        let ctx = test_context(Progress::new(0, 5));
        if let Err(err) = transition(&state, &ctx, event) {
            let documented = matches!(
                err,
                TransitionError::EmptyMessage
                    | TransitionError::AwaitingResponse
                    | TransitionError::Completed
            );
            prop_assert!(documented, "unexpected rejection: {:?}", err);
        }
    }

    // Completed never issues another request; only reset leaves it
    #[test]
    fn prop_completed_is_terminal(event in arb_event()) {
        let ctx = test_context(Progress::new(5, 5));
        match transition(&ConvState::Completed, &ctx, event.clone()) {
            Ok(result) => {
                prop_assert_eq!(event, Event::UserReset);
                prop_assert_eq!(result.effects, vec![Effect::EndSession]);
            }
            Err(_) => {}
        }
    }

    // Composing accepts any non-blank text
    #[test]
    fn prop_composing_accepts_text(text in "[a-zA-Z]{1,10}[a-zA-Z ]{0,20}") {
        let ctx = test_context(Progress::new(0, 5));
        let result = transition(&ConvState::Composing, &ctx, Event::UserSubmit { text: text.clone() });
        prop_assert!(result.is_ok(), "Composing should accept text: {:?}", result);
        let result = result.unwrap();
        prop_assert_eq!(result.new_state, ConvState::AwaitingResponse);
        prop_assert_eq!(
            result.effects,
            vec![Effect::append_user(text.trim()), Effect::send_message(text.trim())]
        );
    }

    // Only a reply flagged completed reaches Completed
    #[test]
    fn prop_completion_follows_flag(event in arb_reply_event()) {
        let ctx = test_context(Progress::new(0, 5));
        let completed = matches!(event, Event::ServiceReply { completed: true, .. });
        let result = transition(&ConvState::AwaitingResponse, &ctx, event).unwrap();
        prop_assert_eq!(result.new_state.is_terminal(), completed);
        let sends = result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::SendMessage { .. }));
        prop_assert!(!sends, "a reply must not trigger another request");
    }
}
