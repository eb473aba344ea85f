//! Scripted form filling.
//!
//! A script supplies answers by reference and the number of instances each
//! repeat should end up with. Filling walks the form forward exactly as a
//! user would: answers are committed screen by screen, prompts are accepted
//! until the requested count exists, and the whole form is validated at the
//! end.

use std::collections::BTreeMap;

use form_engine::{EngineError, Navigator, PendingAnswers, Screen};
use form_model::{AnswerValue, FailureKind, FormModel, ValidationOutcome};
use form_tree::FormTree;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::logging::redact_value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerScript {
    #[serde(default)]
    pub values: BTreeMap<String, AnswerValue>,
    /// Instances wanted per repeat reference, e.g. `"/member": 2`.
    #[serde(default)]
    pub repeats: BTreeMap<String, usize>,
}

impl AnswerScript {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillOptions {
    pub evaluate_constraints: bool,
    pub mark_completed: bool,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            evaluate_constraints: true,
            mark_completed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Rejected while committing a screen.
    Commit,
    /// Found by the final whole-form validation.
    Validation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub stage: Stage,
    pub reference: String,
    pub kind: FailureKind,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillReport {
    pub screens: usize,
    pub answers: usize,
    pub instances_added: usize,
    pub failure: Option<Failure>,
}

impl FillReport {
    pub fn is_valid(&self) -> bool {
        self.failure.is_none()
    }
}

fn describe_failure(tree: &FormTree, outcome: &ValidationOutcome, stage: Stage) -> Option<Failure> {
    let (position, kind) = outcome.failure()?;
    Some(Failure {
        stage,
        reference: tree
            .reference(position)
            .unwrap_or_else(|| position.to_string()),
        kind,
        message: match kind {
            FailureKind::ConstraintViolated => tree.constraint_message(position),
            FailureKind::RequiredButEmpty => None,
        },
    })
}

/// Fills the form behind `nav` from `script`.
///
/// A rejected commit stops the walk and is reported; engine errors such as
/// form design errors are returned.
pub fn fill(
    nav: &mut Navigator<FormTree>,
    script: &AnswerScript,
    options: FillOptions,
) -> Result<FillReport, EngineError> {
    let _span = info_span!("fill", title = nav.model().title()).entered();
    let mut report = FillReport {
        screens: 0,
        answers: 0,
        instances_added: 0,
        failure: None,
    };
    loop {
        let mut pending = PendingAnswers::new();
        match nav.current_screen()? {
            Screen::BeginningOfForm => {}
            Screen::EndOfForm => break,
            Screen::Questions { questions, .. } => {
                report.screens += 1;
                for question in questions {
                    let scripted = nav
                        .model()
                        .reference(&question)
                        .and_then(|reference| script.values.get(&reference).map(|v| (reference, v)));
                    match scripted {
                        Some((reference, value)) => {
                            let shown = value.to_string();
                            debug!(%reference, value = redact_value(&shown), "scripted answer");
                            pending.set(question, value.clone());
                            report.answers += 1;
                        }
                        // unanswered widgets still commit, so required checks run
                        None => pending.clear(question),
                    }
                }
            }
            Screen::RepeatPrompt {
                position, existing, ..
            } => {
                report.screens += 1;
                let wanted = nav
                    .model()
                    .repeat_reference(&position)
                    .and_then(|reference| script.repeats.get(&reference).copied())
                    .unwrap_or(0);
                if existing < wanted {
                    match nav.add_repeat() {
                        Ok(_) => {
                            report.instances_added += 1;
                            continue;
                        }
                        Err(EngineError::NonFatal { message }) => {
                            warn!(%message, "declining repeat prompt");
                        }
                        Err(error) => return Err(error),
                    }
                }
            }
        }
        let outcome = nav.move_forward(&pending, options.evaluate_constraints)?;
        if !outcome.is_valid() {
            report.failure = describe_failure(nav.model(), &outcome, Stage::Commit);
            return Ok(report);
        }
    }

    let outcome = nav.validate(options.mark_completed);
    report.failure = describe_failure(nav.model(), &outcome, Stage::Validation);
    info!(
        screens = report.screens,
        answers = report.answers,
        valid = report.is_valid(),
        "fill finished"
    );
    Ok(report)
}
