//! Lesson engine: ordered steps validated against repository state.
//!
//! A lesson owns a setup function, its steps, and an optional per-step
//! completion hook. Validators are plain function pointers over the
//! command, the repo, the structured result, and the checkpoint map -
//! no hidden closures over the controller.

pub mod catalog;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::remote::RemoteStore;
use crate::repo::types::CmdResult;
use crate::repo::Repo;

/// Repo snapshots captured at the start of each step, keyed by step
/// index. Checkpoint 0 is the state right after setup.
pub type Checkpoints = BTreeMap<usize, Repo>;

/// The command line as the validator sees it.
#[derive(Debug, Clone)]
pub struct CommandRecord {
    pub line: String,
    pub tokens: Vec<String>,
}

impl CommandRecord {
    pub fn new(line: &str) -> Self {
        CommandRecord { line: line.to_string(), tokens: crate::shellwords::tokenize(line) }
    }

    /// True for `git <sub> …` commands.
    pub fn is_git(&self, sub: &str) -> bool {
        self.tokens.first().map(String::as_str) == Some("git")
            && self.tokens.get(1).map(String::as_str) == Some(sub)
    }
}

pub type Validator = fn(&CommandRecord, &Repo, &CmdResult, &Checkpoints) -> bool;
pub type SetupFn = fn(&mut Repo, &mut RemoteStore);
/// Called with the index of the step that just completed.
pub type StepHook = fn(usize, &mut Repo, &mut RemoteStore);

pub struct Step {
    pub title: &'static str,
    pub prompt: &'static str,
    pub hint: &'static str,
    pub validator: Validator,
}

/// One multiple-choice question shown after the steps.
pub struct Quiz {
    pub question: &'static str,
    pub choices: &'static [&'static str],
    pub answer: usize,
}

pub struct Lesson {
    pub id: &'static str,
    pub title: &'static str,
    pub steps: Vec<Step>,
    pub quiz: Option<Quiz>,
    pub setup: SetupFn,
    pub on_step_complete: Option<StepHook>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizState {
    pub passed: bool,
    pub attempts: u32,
}

/// Durable per-lesson progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonState {
    pub step_index: usize,
    pub completed: bool,
    #[serde(default)]
    pub quiz: QuizState,
    /// Repo as of the last executed command, restored on re-entry.
    #[serde(default)]
    pub repo: Option<Repo>,
    #[serde(default)]
    pub checkpoints: Checkpoints,
}

/// Enter a lesson: restore its saved repo, or run setup for a first
/// visit and record checkpoint 0.
pub fn activate(lesson: &Lesson, state: &mut LessonState, repo: &mut Repo, store: &mut RemoteStore) {
    match &state.repo {
        Some(saved) => *repo = saved.clone(),
        None => {
            *repo = Repo::new();
            (lesson.setup)(repo, store);
            state.checkpoints.insert(0, repo.clone());
        }
    }
}

/// Run the current step's validator repeatedly after a command; each
/// pass advances, checkpoints, and fires the completion hook. Returns
/// progress lines for the UI.
pub fn advance(
    lesson: &Lesson,
    state: &mut LessonState,
    record: &CommandRecord,
    repo: &mut Repo,
    store: &mut RemoteStore,
    result: &CmdResult,
) -> Vec<String> {
    let mut notes = Vec::new();
    while !state.completed && state.step_index < lesson.steps.len() {
        let step = &lesson.steps[state.step_index];
        if !(step.validator)(record, repo, result, &state.checkpoints) {
            break;
        }
        let finished = state.step_index;
        state.step_index += 1;
        state.checkpoints.insert(state.step_index, repo.clone());
        notes.push(format!("✔ Step complete: {}", step.title));
        tracing::info!(lesson = lesson.id, step = step.title, "step complete");
        if let Some(hook) = lesson.on_step_complete {
            hook(finished, repo, store);
        }
        if state.step_index == lesson.steps.len() {
            state.completed = true;
            notes.push(format!("Lesson complete: {}", lesson.title));
            tracing::info!(lesson = lesson.id, "lesson complete");
        }
    }
    notes
}

/// Restore the checkpoint for the current step ("reset repo").
pub fn reset_to_checkpoint(state: &LessonState, repo: &mut Repo) -> bool {
    match state.checkpoints.get(&state.step_index) {
        Some(checkpoint) => {
            *repo = checkpoint.clone();
            true
        }
        None => false,
    }
}
