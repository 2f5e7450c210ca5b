//! Submission gate for snip
//!
//! Intercepts a qualifying submission keystroke, suspends it, resolves an
//! asynchronous analysis, and either re-triggers the native send or
//! prompts the user. State machine:
//!
//! `Idle -> Intercepted -> Resolving -> {Sent | AwaitingUserChoice} -> Idle`
//!
//! No path may leave the gate parked in `Intercepted` or `Resolving`.

use snip_core::{AnalysisBackend, Verdict};
use snip_editor::{Document, FieldRef, HostAction, KeyPress, Tracker};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Idle,
    Intercepted,
    Resolving,
    AwaitingUserChoice,
}

/// Synchronous decision for a keystroke: suppression must happen inside
/// the event handler, before any asynchronous work begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    Suppress,
    PassThrough,
}

/// How an intercepted keystroke was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The submission went through (allowed, or failed open).
    Sent,
    /// The user is being prompted; the gate awaits a choice.
    Prompt,
    /// The result was stale or the target vanished; nothing happened.
    Dropped,
}

/// The two exclusive modal actions. Escape maps to [`Gate::dismiss`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Clean,
    SendAnyway,
}

#[derive(Debug)]
struct Pending {
    target: FieldRef,
    verdict: Option<Verdict>,
}

#[derive(Debug, Default)]
pub struct Gate {
    state: GateState,
    pending: Option<Pending>,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// The verdict behind the current prompt, for the presenter.
    pub fn pending_verdict(&self) -> Option<&Verdict> {
        self.pending.as_ref().and_then(|p| p.verdict.as_ref())
    }

    /// Synchronous keystroke handling. A qualifying submission gesture
    /// with a valid current target is intercepted; while a cycle is in
    /// flight any further submission attempt is suppressed and dropped.
    pub fn on_key(
        &mut self,
        doc: &Document,
        tracker: &Tracker,
        press: &KeyPress,
    ) -> KeyDisposition {
        if !press.is_submission() {
            return KeyDisposition::PassThrough;
        }
        match self.state {
            GateState::Idle => match tracker.current(doc) {
                Some(target) => {
                    self.state = GateState::Intercepted;
                    self.pending = Some(Pending {
                        target,
                        verdict: None,
                    });
                    KeyDisposition::Suppress
                }
                None => KeyDisposition::PassThrough,
            },
            busy => {
                debug!(?busy, "submission attempt while gate busy, dropped");
                KeyDisposition::Suppress
            }
        }
    }

    /// Resolve the intercepted keystroke: exactly one assessment per
    /// interception. Backend failure fails open to a send. A result that
    /// arrives for a target no longer current is discarded.
    pub async fn resolve(
        &mut self,
        doc: &mut Document,
        tracker: &Tracker,
        backend: &dyn AnalysisBackend,
    ) -> Outcome {
        if self.state != GateState::Intercepted {
            debug!(state = ?self.state, "resolve called outside interception");
            return Outcome::Dropped;
        }
        self.state = GateState::Resolving;

        let target = match self.pending.as_ref() {
            Some(p) => p.target,
            None => {
                self.reset();
                return Outcome::Dropped;
            }
        };
        let Some(text) = target.read(doc) else {
            debug!("target vanished before assessment");
            self.reset();
            return Outcome::Dropped;
        };

        let assessed = backend.assess(&text).await;

        // Staleness check: the keystroke belonged to this target's
        // generation; a newer target wins.
        let still_current = tracker
            .current(doc)
            .is_some_and(|now| now.generation == target.generation);
        if !still_current {
            debug!("discarding assessment for superseded target");
            self.reset();
            return Outcome::Dropped;
        }

        match assessed {
            Err(e) => {
                warn!(backend = backend.name(), error = %e, "analysis failed, failing open");
                self.send(doc, &target);
                self.reset();
                Outcome::Sent
            }
            Ok(verdict) if !verdict.should_block => {
                self.send(doc, &target);
                self.reset();
                Outcome::Sent
            }
            Ok(verdict) => {
                if let Some(p) = self.pending.as_mut() {
                    p.verdict = Some(verdict);
                }
                self.state = GateState::AwaitingUserChoice;
                Outcome::Prompt
            }
        }
    }

    /// Apply one of the modal's exclusive actions.
    pub fn choose(&mut self, doc: &mut Document, choice: Choice) {
        if self.state != GateState::AwaitingUserChoice {
            return;
        }
        let Some(pending) = self.pending.take() else {
            self.reset();
            return;
        };
        match choice {
            Choice::Clean => {
                if let Some(cleaned) = pending.verdict.as_ref().and_then(|v| v.cleaned.as_deref())
                {
                    pending.target.write(doc, cleaned);
                }
                doc.focus(pending.target.node);
            }
            Choice::SendAnyway => {
                self.send(doc, &pending.target);
            }
        }
        self.reset();
    }

    /// Escape: dismiss without sending. The user re-submits manually.
    pub fn dismiss(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.pending = None;
        self.state = GateState::Idle;
    }

    /// Trigger the page's native submit affordance: prefer a detectable
    /// send control, otherwise synthesize the Enter submission.
    fn send(&self, doc: &mut Document, target: &FieldRef) {
        match doc.find_send_control() {
            Some(control) => doc.push_action(HostAction::ClickedSend(control)),
            None => doc.push_action(HostAction::SynthesizedEnter(target.node)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use snip_core::{Error, Result};
    use snip_editor::{Command, NodeId};

    struct FixedBackend(Verdict);

    #[async_trait]
    impl AnalysisBackend for FixedBackend {
        async fn assess(&self, _text: &str) -> Result<Verdict> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl AnalysisBackend for FailingBackend {
        async fn assess(&self, _text: &str) -> Result<Verdict> {
            Err(Error::RemoteAnalysis {
                status: 500,
                body: None,
            })
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn blocking_verdict(cleaned: &str) -> Verdict {
        Verdict {
            should_block: true,
            cleaned: Some(cleaned.to_string()),
            summary: None,
        }
    }

    fn setup(text: &str) -> (Document, Tracker, NodeId) {
        let mut doc = Document::new();
        let field = doc.create_element("textarea");
        doc.append_child(doc.root(), field);
        doc.set_text(field, text);
        let mut tracker = Tracker::new();
        tracker.handle(&doc, &Command::FocusTarget(field));
        (doc, tracker, field)
    }

    #[test]
    fn test_non_submission_keys_pass_through() {
        let (doc, tracker, _field) = setup("hi");
        let mut gate = Gate::new();

        assert_eq!(
            gate.on_key(&doc, &tracker, &KeyPress::shift_enter()),
            KeyDisposition::PassThrough
        );
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[test]
    fn test_no_target_passes_through() {
        let doc = Document::new();
        let tracker = Tracker::new();
        let mut gate = Gate::new();

        assert_eq!(
            gate.on_key(&doc, &tracker, &KeyPress::enter()),
            KeyDisposition::PassThrough
        );
    }

    #[tokio::test]
    async fn test_allow_sends_immediately() {
        let (mut doc, tracker, field) = setup("clean text");
        let mut gate = Gate::new();

        assert_eq!(
            gate.on_key(&doc, &tracker, &KeyPress::enter()),
            KeyDisposition::Suppress
        );
        let outcome = gate
            .resolve(&mut doc, &tracker, &FixedBackend(Verdict::allow()))
            .await;

        assert_eq!(outcome, Outcome::Sent);
        assert_eq!(gate.state(), GateState::Idle);
        assert_eq!(doc.actions(), &[HostAction::SynthesizedEnter(field)]);
    }

    #[tokio::test]
    async fn test_send_control_preferred_over_synthesis() {
        let (mut doc, tracker, _field) = setup("clean text");
        let button = doc.create_element("button");
        doc.set_attr(button, "type", "submit");
        doc.append_child(doc.root(), button);
        let mut gate = Gate::new();

        gate.on_key(&doc, &tracker, &KeyPress::enter());
        gate.resolve(&mut doc, &tracker, &FixedBackend(Verdict::allow()))
            .await;

        assert_eq!(doc.actions(), &[HostAction::ClickedSend(button)]);
    }

    #[tokio::test]
    async fn test_block_prompts_then_clean() {
        let (mut doc, tracker, field) = setup("please fix");
        let mut gate = Gate::new();

        gate.on_key(&doc, &tracker, &KeyPress::enter());
        let outcome = gate
            .resolve(&mut doc, &tracker, &FixedBackend(blocking_verdict("fix")))
            .await;
        assert_eq!(outcome, Outcome::Prompt);
        assert_eq!(gate.state(), GateState::AwaitingUserChoice);
        assert!(gate.pending_verdict().is_some());

        gate.choose(&mut doc, Choice::Clean);
        assert_eq!(gate.state(), GateState::Idle);
        assert_eq!(doc.text(field), Some("fix"));
        // Input re-fired, target refocused, nothing sent.
        assert_eq!(doc.actions(), &[HostAction::InputNotified(field)]);
        assert_eq!(doc.focused(), Some(field));
    }

    #[tokio::test]
    async fn test_send_anyway_sends_original() {
        let (mut doc, tracker, field) = setup("please fix");
        let mut gate = Gate::new();

        gate.on_key(&doc, &tracker, &KeyPress::enter());
        gate.resolve(&mut doc, &tracker, &FixedBackend(blocking_verdict("fix")))
            .await;
        gate.choose(&mut doc, Choice::SendAnyway);

        assert_eq!(gate.state(), GateState::Idle);
        assert_eq!(doc.text(field), Some("please fix"));
        assert_eq!(doc.actions(), &[HostAction::SynthesizedEnter(field)]);
    }

    #[tokio::test]
    async fn test_escape_dismisses_without_send() {
        let (mut doc, tracker, field) = setup("please fix");
        let mut gate = Gate::new();

        gate.on_key(&doc, &tracker, &KeyPress::enter());
        gate.resolve(&mut doc, &tracker, &FixedBackend(blocking_verdict("fix")))
            .await;
        gate.dismiss();

        assert_eq!(gate.state(), GateState::Idle);
        assert_eq!(doc.text(field), Some("please fix"));
        assert!(doc.actions().is_empty());
    }

    #[tokio::test]
    async fn test_backend_failure_fails_open() {
        let (mut doc, tracker, field) = setup("text");
        let mut gate = Gate::new();

        gate.on_key(&doc, &tracker, &KeyPress::enter());
        let outcome = gate.resolve(&mut doc, &tracker, &FailingBackend).await;

        assert_eq!(outcome, Outcome::Sent);
        assert_eq!(gate.state(), GateState::Idle);
        assert_eq!(doc.actions(), &[HostAction::SynthesizedEnter(field)]);
    }

    #[tokio::test]
    async fn test_busy_gate_drops_new_attempts() {
        let (mut doc, tracker, _field) = setup("please fix");
        let mut gate = Gate::new();

        gate.on_key(&doc, &tracker, &KeyPress::enter());
        gate.resolve(&mut doc, &tracker, &FixedBackend(blocking_verdict("fix")))
            .await;
        assert_eq!(gate.state(), GateState::AwaitingUserChoice);

        // A second Enter while prompting is suppressed and starts nothing.
        assert_eq!(
            gate.on_key(&doc, &tracker, &KeyPress::enter()),
            KeyDisposition::Suppress
        );
        assert_eq!(gate.state(), GateState::AwaitingUserChoice);
    }

    #[tokio::test]
    async fn test_stale_result_is_discarded() {
        let (mut doc, mut tracker, _a) = setup("please fix");
        let b = doc.create_element("textarea");
        doc.append_child(doc.root(), b);
        let mut gate = Gate::new();

        gate.on_key(&doc, &tracker, &KeyPress::enter());
        // Focus moves to another field while the assessment is pending.
        tracker.handle(&doc, &Command::FocusTarget(b));

        let outcome = gate
            .resolve(&mut doc, &tracker, &FixedBackend(blocking_verdict("fix")))
            .await;
        assert_eq!(outcome, Outcome::Dropped);
        assert_eq!(gate.state(), GateState::Idle);
        assert!(doc.actions().is_empty());
    }
}
