//! Linear step machine shared by the plan and client wizards.
//!
//! A [`Flow`] names its data-entry steps, the required fields of each step and
//! what happens once the last step is submitted. [`Wizard`] owns the step
//! index, the draft and the in-flight flag; submission goes through a
//! [`Submitter`].

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::logging::{
    fingerprint, log_audit, log_step_blocked, log_step_change, log_submission, log_wizard_reset,
};

/// What a flow does after its last data-entry step is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Move to a terminal success step (index `ENTRY_STEPS`) and keep the result.
    SuccessStep,
    /// Close the dialog: draft discarded, step back to zero.
    CloseDialog,
}

pub trait Flow: Send + Sync + 'static {
    type Draft: Default + Clone + PartialEq + Serialize + Send + Sync;
    /// A complete, validated draft.
    type Submission: Serialize + Send + Sync;
    type Output: Clone + Send;

    const NAME: &'static str;
    /// Number of data-entry steps.
    const ENTRY_STEPS: usize;
    const COMPLETION: Completion;

    /// Required fields of `step` that are still empty.
    fn missing_fields(draft: &Self::Draft, step: usize) -> Vec<&'static str>;

    /// `None` while any required field of any step is empty.
    fn submission(draft: &Self::Draft) -> Option<Self::Submission>;

    /// Fields worth logging about a finished submission.
    fn describe(_output: &Self::Output) -> Map<String, Value> {
        Map::new()
    }
}

#[async_trait]
pub trait Submitter<F: Flow>: Send + Sync {
    async fn submit(&self, submission: &F::Submission) -> F::Output;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Advance<T> {
    /// Required fields are empty; nothing changed.
    Blocked { missing: Vec<&'static str> },
    Moved { from: usize, to: usize },
    Submitted(T),
    /// Submission in flight or already on the success step.
    Idle,
}

/// Holds the in-flight flag for the duration of a submission. Cleared on
/// drop, so an abandoned submission future leaves the wizard usable.
struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    fn set(flag: &'a mut bool) -> Self {
        *flag = true;
        InFlight(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

pub struct Wizard<F: Flow> {
    step: usize,
    draft: F::Draft,
    in_flight: bool,
    outcome: Option<F::Output>,
}

impl<F: Flow> Default for Wizard<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Flow> Wizard<F> {
    pub fn new() -> Self {
        Self {
            step: 0,
            draft: F::Draft::default(),
            in_flight: false,
            outcome: None,
        }
    }

    /// Highest step index this flow can reach.
    pub fn max_step() -> usize {
        match F::COMPLETION {
            Completion::SuccessStep => F::ENTRY_STEPS,
            Completion::CloseDialog => F::ENTRY_STEPS - 1,
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn draft(&self) -> &F::Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut F::Draft {
        &mut self.draft
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Result kept on the success step.
    pub fn outcome(&self) -> Option<&F::Output> {
        self.outcome.as_ref()
    }

    pub fn on_success_step(&self) -> bool {
        self.step >= F::ENTRY_STEPS
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        if self.on_success_step() {
            return Vec::new();
        }
        F::missing_fields(&self.draft, self.step)
    }

    /// Whether the "next" action is enabled.
    pub fn can_advance(&self) -> bool {
        !self.in_flight && !self.on_success_step() && self.missing_fields().is_empty()
    }

    pub async fn advance<S>(&mut self, submitter: &S) -> Advance<F::Output>
    where
        S: Submitter<F> + ?Sized,
    {
        if self.in_flight || self.on_success_step() {
            return Advance::Idle;
        }
        let missing = self.missing_fields();
        if !missing.is_empty() {
            log_step_blocked(F::NAME, self.step, &missing);
            return Advance::Blocked { missing };
        }
        if self.step + 1 == F::ENTRY_STEPS {
            return self.submit(submitter).await;
        }
        let from = self.step;
        self.step += 1;
        log_step_change(F::NAME, from, self.step);
        Advance::Moved { from, to: self.step }
    }

    pub fn retreat(&mut self) -> usize {
        if !self.in_flight && !self.on_success_step() && self.step > 0 {
            let from = self.step;
            self.step -= 1;
            log_step_change(F::NAME, from, self.step);
        }
        self.step
    }

    /// Submit the draft from any data-entry step, provided every step's
    /// required fields are filled.
    pub async fn finalize<S>(&mut self, submitter: &S) -> Advance<F::Output>
    where
        S: Submitter<F> + ?Sized,
    {
        if self.in_flight || self.on_success_step() {
            return Advance::Idle;
        }
        self.submit(submitter).await
    }

    async fn submit<S>(&mut self, submitter: &S) -> Advance<F::Output>
    where
        S: Submitter<F> + ?Sized,
    {
        let Some(submission) = F::submission(&self.draft) else {
            let missing: Vec<&'static str> = (0..F::ENTRY_STEPS)
                .flat_map(|step| F::missing_fields(&self.draft, step))
                .collect();
            log_step_blocked(F::NAME, self.step, &missing);
            return Advance::Blocked { missing };
        };
        let output = {
            let _flight = InFlight::set(&mut self.in_flight);
            log_audit(F::NAME, &fingerprint(&submission));
            submitter.submit(&submission).await
        };
        log_submission(F::NAME, self.step, F::describe(&output));

        match F::COMPLETION {
            Completion::SuccessStep => {
                let from = self.step;
                self.step = F::ENTRY_STEPS;
                self.outcome = Some(output.clone());
                log_step_change(F::NAME, from, self.step);
            }
            Completion::CloseDialog => self.reset(),
        }
        Advance::Submitted(output)
    }

    /// Close or cancel: discard the draft and return to the first step.
    pub fn cancel(&mut self) {
        let step = self.step;
        self.reset();
        log_wizard_reset(F::NAME, step);
    }

    fn reset(&mut self) {
        self.step = 0;
        self.draft = F::Draft::default();
        self.in_flight = false;
        self.outcome = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq, Serialize)]
    struct Pair {
        a: String,
        b: String,
    }

    struct Two;

    impl Flow for Two {
        type Draft = Pair;
        type Submission = Pair;
        type Output = String;
        const NAME: &'static str = "two";
        const ENTRY_STEPS: usize = 2;
        const COMPLETION: Completion = Completion::SuccessStep;

        fn missing_fields(draft: &Pair, step: usize) -> Vec<&'static str> {
            match step {
                0 if draft.a.is_empty() => vec!["a"],
                1 if draft.b.is_empty() => vec!["b"],
                _ => Vec::new(),
            }
        }

        fn submission(draft: &Pair) -> Option<Pair> {
            (!draft.a.is_empty() && !draft.b.is_empty()).then(|| draft.clone())
        }
    }

    struct Echo;

    #[async_trait]
    impl Submitter<Two> for Echo {
        async fn submit(&self, pair: &Pair) -> String {
            format!("{}{}", pair.a, pair.b)
        }
    }

    #[tokio::test]
    async fn test_blocked_then_moves() {
        let mut w: Wizard<Two> = Wizard::new();
        assert_eq!(w.advance(&Echo).await, Advance::Blocked { missing: vec!["a"] });
        assert_eq!(w.step(), 0);
        w.draft_mut().a = "x".into();
        assert_eq!(w.advance(&Echo).await, Advance::Moved { from: 0, to: 1 });
    }

    #[tokio::test]
    async fn test_last_step_submits_to_success_step() {
        let mut w: Wizard<Two> = Wizard::new();
        w.draft_mut().a = "x".into();
        w.draft_mut().b = "y".into();
        w.advance(&Echo).await;
        assert_eq!(w.advance(&Echo).await, Advance::Submitted("xy".to_string()));
        assert_eq!(w.step(), Wizard::<Two>::max_step());
        assert_eq!(w.outcome().map(String::as_str), Some("xy"));
        assert_eq!(w.advance(&Echo).await, Advance::Idle);
        assert_eq!(w.retreat(), 2);
    }

    #[tokio::test]
    async fn test_finalize_checks_every_step() {
        let mut w: Wizard<Two> = Wizard::new();
        w.draft_mut().b = "y".into();
        assert_eq!(w.finalize(&Echo).await, Advance::Blocked { missing: vec!["a"] });
        assert!(!w.is_in_flight());
    }

    struct Stalled;

    #[async_trait]
    impl Submitter<Two> for Stalled {
        async fn submit(&self, _pair: &Pair) -> String {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            String::new()
        }
    }

    #[tokio::test]
    async fn test_abandoned_submission_clears_in_flight() {
        let mut w: Wizard<Two> = Wizard::new();
        w.draft_mut().a = "x".into();
        w.draft_mut().b = "y".into();
        w.advance(&Echo).await;

        let timed_out = tokio::time::timeout(std::time::Duration::from_millis(20), w.advance(&Stalled)).await;
        assert!(timed_out.is_err());
        assert!(!w.is_in_flight());
        assert_eq!(w.step(), 1);
        assert_eq!(w.advance(&Echo).await, Advance::Submitted("xy".to_string()));
    }

    #[test]
    fn test_retreat_floors_at_zero() {
        let mut w: Wizard<Two> = Wizard::new();
        assert_eq!(w.retreat(), 0);
        assert_eq!(w.retreat(), 0);
    }
}
