//! The app controller: one repo, the remote store, lesson progress, and
//! badges, glued to durable state.
//!
//! Every command flows through `run_command`: dispatch, lesson
//! validation, badge awards, autosave. The UI only ever sees structured
//! results and progress notes.

use anyhow::{bail, Result};
use std::collections::BTreeMap;

use crate::badges::{self, BadgeMap};
use crate::dispatch;
use crate::lessons::{self, catalog, CommandRecord, Lesson, LessonState};
use crate::persist::store::StateStore;
use crate::persist::AppState;
use crate::remote::RemoteStore;
use crate::repo::types::CmdResult;
use crate::repo::{Repo, RepoView};

/// A command's structured result plus lesson/badge progress lines.
pub struct CommandOutcome {
    pub result: CmdResult,
    pub notes: Vec<String>,
}

pub struct App {
    pub repo: Repo,
    pub remotes: RemoteStore,
    pub lesson_states: BTreeMap<String, LessonState>,
    pub active_lesson: Option<String>,
    pub badges: BadgeMap,
    catalog: Vec<Lesson>,
    store: Option<Box<dyn StateStore>>,
    autosave: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Fresh app with no backing store: seeded remote, empty progress.
    pub fn new() -> Self {
        let mut remotes = RemoteStore::new();
        remotes.seed();
        let mut badge_map = BadgeMap::new();
        badges::merge_definitions(&mut badge_map);
        App {
            repo: Repo::new(),
            remotes,
            lesson_states: BTreeMap::new(),
            active_lesson: None,
            badges: badge_map,
            catalog: catalog::catalog(),
            store: None,
            autosave: false,
        }
    }

    /// App backed by a store; restores saved state when present.
    pub fn with_store(store: Box<dyn StateStore>, autosave: bool) -> Result<Self> {
        let mut app = App::new();
        if let Some(state) = store.load()? {
            app.import_state(state)?;
        }
        app.store = Some(store);
        app.autosave = autosave;
        Ok(app)
    }

    /// Execute one command line and run the whole post-command pipeline.
    pub fn run_command(&mut self, line: &str) -> CommandOutcome {
        let result = dispatch::dispatch(&mut self.repo, &mut self.remotes, line);
        let record = CommandRecord::new(line);
        self.after_command(&record, result)
    }

    /// External-editor write; validated like any other command.
    pub fn apply_edit(&mut self, path: &str, content: &str) -> CommandOutcome {
        self.repo.edit_file(path, content);
        let record = CommandRecord::new(&format!("edit {path}"));
        self.after_command(&record, CmdResult::ok_empty())
    }

    fn after_command(&mut self, record: &CommandRecord, result: CmdResult) -> CommandOutcome {
        let mut notes = Vec::new();

        if let Some(id) = self.active_lesson.clone() {
            if let Some(idx) = catalog::find(&self.catalog, &id) {
                let lesson = &self.catalog[idx];
                let state = self.lesson_states.entry(id).or_default();
                notes = lessons::advance(
                    lesson,
                    state,
                    record,
                    &mut self.repo,
                    &mut self.remotes,
                    &result,
                );
            }
        }

        if let Some(event) = self.repo.last_event.clone() {
            for id in badges::award_for_event(&mut self.badges, &event) {
                notes.push(badge_note(id));
            }
        }
        for id in self.sync_badges() {
            notes.push(badge_note(id));
        }

        self.save_active_repo();
        self.persist();
        CommandOutcome { result, notes }
    }

    /// Switch to a lesson, running its setup on first entry. Returns the
    /// intro lines for the UI.
    pub fn activate_lesson(&mut self, id: &str) -> Result<Vec<String>> {
        let Some(idx) = catalog::find(&self.catalog, id) else {
            bail!("unknown lesson '{id}'");
        };
        let lesson = &self.catalog[idx];
        self.active_lesson = Some(lesson.id.to_string());
        let state = self.lesson_states.entry(lesson.id.to_string()).or_default();
        lessons::activate(lesson, state, &mut self.repo, &mut self.remotes);

        let mut lines = vec![format!("Lesson: {}", lesson.title)];
        if state.completed {
            lines.push("Already completed. Commands still work; experiment freely.".to_string());
        } else if let Some(step) = lesson.steps.get(state.step_index) {
            lines.push(format!(
                "Step {}/{}: {}",
                state.step_index + 1,
                lesson.steps.len(),
                step.title
            ));
            lines.push(step.prompt.to_string());
            lines.push(format!("hint: {}", step.hint));
        }
        self.save_active_repo();
        self.persist();
        Ok(lines)
    }

    /// One line per lesson with progress markers.
    pub fn lesson_overview(&self) -> Vec<String> {
        self.catalog
            .iter()
            .map(|lesson| {
                let state = self.lesson_states.get(lesson.id);
                let marker = match state {
                    Some(s) if s.completed => "x",
                    Some(_) => ">",
                    None => " ",
                };
                let progress = state
                    .map(|s| format!("{}/{}", s.step_index.min(lesson.steps.len()), lesson.steps.len()))
                    .unwrap_or_else(|| format!("0/{}", lesson.steps.len()));
                format!("[{marker}] {:24} {:22} {progress}", lesson.id, lesson.title)
            })
            .collect()
    }

    /// Prompt and hint for the active step, if any.
    pub fn current_step_lines(&self) -> Vec<String> {
        let Some(id) = &self.active_lesson else {
            return vec!["No active lesson. Use 'lesson <id>' to start one.".to_string()];
        };
        let Some(idx) = catalog::find(&self.catalog, id) else {
            return Vec::new();
        };
        let lesson = &self.catalog[idx];
        let Some(state) = self.lesson_states.get(id) else {
            return Vec::new();
        };
        if state.completed {
            return vec![format!("Lesson '{}' is complete.", lesson.title)];
        }
        match lesson.steps.get(state.step_index) {
            Some(step) => vec![
                format!("Step {}/{}: {}", state.step_index + 1, lesson.steps.len(), step.title),
                step.prompt.to_string(),
                format!("hint: {}", step.hint),
            ],
            None => Vec::new(),
        }
    }

    /// Restore the active lesson's checkpoint for the current step.
    pub fn reset_step(&mut self) -> bool {
        let Some(id) = self.active_lesson.clone() else {
            return false;
        };
        let Some(state) = self.lesson_states.get(&id) else {
            return false;
        };
        let restored = lessons::reset_to_checkpoint(state, &mut self.repo);
        if restored {
            self.save_active_repo();
            self.persist();
        }
        restored
    }

    /// Answer the active lesson's quiz. Returns feedback lines.
    pub fn answer_quiz(&mut self, choice: usize) -> Vec<String> {
        let Some(id) = self.active_lesson.clone() else {
            return vec!["No active lesson.".to_string()];
        };
        let Some(idx) = catalog::find(&self.catalog, &id) else {
            return Vec::new();
        };
        let Some(quiz) = &self.catalog[idx].quiz else {
            return vec!["This lesson has no quiz.".to_string()];
        };
        let state = self.lesson_states.entry(id).or_default();
        if state.quiz.passed {
            return vec!["Quiz already passed.".to_string()];
        }
        state.quiz.attempts += 1;

        let mut lines = if choice == quiz.answer {
            state.quiz.passed = true;
            vec!["Correct!".to_string()]
        } else {
            vec!["Not quite - try again.".to_string()]
        };
        for id in self.sync_badges() {
            lines.push(badge_note(id));
        }
        self.persist();
        lines
    }

    /// Question plus numbered choices for the active lesson.
    pub fn quiz_lines(&self) -> Vec<String> {
        let Some(id) = &self.active_lesson else {
            return vec!["No active lesson.".to_string()];
        };
        let Some(idx) = catalog::find(&self.catalog, id) else {
            return Vec::new();
        };
        match &self.catalog[idx].quiz {
            Some(quiz) => {
                let mut lines = vec![quiz.question.to_string()];
                for (i, choice) in quiz.choices.iter().enumerate() {
                    lines.push(format!("  {i}) {choice}"));
                }
                lines.push("Answer with: quiz <number>".to_string());
                lines
            }
            None => vec!["This lesson has no quiz.".to_string()],
        }
    }

    pub fn badge_overview(&self) -> Vec<String> {
        badges::BADGES
            .iter()
            .map(|def| {
                let earned = self.badges.get(def.id).map(|s| s.earned).unwrap_or(false);
                let marker = if earned { "x" } else { " " };
                format!("[{marker}] {:16} {}", def.name, def.description)
            })
            .collect()
    }

    /// Snapshot for the graph/terminal renderer.
    pub fn snapshot(&self) -> RepoView {
        self.repo.render()
    }

    pub fn export_state(&self) -> AppState {
        let mut lessons = self.lesson_states.clone();
        if let Some(id) = &self.active_lesson {
            if let Some(state) = lessons.get_mut(id) {
                state.repo = Some(self.repo.clone());
            }
        }
        AppState {
            version: crate::persist::STATE_VERSION,
            active_lesson_id: self.active_lesson.clone(),
            lessons,
            badges: self.badges.clone(),
            remote_store: self.remotes.clone(),
        }
    }

    /// Replace all state with an import. Badge definitions are merged so
    /// badges added since the export still appear.
    pub fn import_state(&mut self, state: AppState) -> Result<()> {
        state.validate()?;
        self.lesson_states = state.lessons;
        self.active_lesson = state.active_lesson_id;
        self.badges = state.badges;
        badges::merge_definitions(&mut self.badges);
        self.remotes = state.remote_store;
        self.remotes.seed();

        // Restore the active lesson's repo.
        self.repo = self
            .active_lesson
            .as_ref()
            .and_then(|id| self.lesson_states.get(id))
            .and_then(|s| s.repo.clone())
            .unwrap_or_default();
        Ok(())
    }

    fn sync_badges(&mut self) -> Vec<&'static str> {
        let completed: Vec<String> = self
            .lesson_states
            .iter()
            .filter(|(_, s)| s.completed)
            .map(|(id, _)| id.clone())
            .collect();
        let all_quizzes = self
            .catalog
            .iter()
            .filter(|l| l.quiz.is_some())
            .all(|l| self.lesson_states.get(l.id).map(|s| s.quiz.passed).unwrap_or(false));
        badges::sync_awards(&mut self.badges, completed.iter().map(String::as_str), all_quizzes)
    }

    fn save_active_repo(&mut self) {
        if let Some(id) = &self.active_lesson {
            if let Some(state) = self.lesson_states.get_mut(id) {
                state.repo = Some(self.repo.clone());
            }
        }
    }

    fn persist(&mut self) {
        if !self.autosave {
            return;
        }
        let Some(store) = &self.store else {
            return;
        };
        let state = self.export_state();
        if let Err(err) = store.save(&state) {
            tracing::warn!(error = %err, "autosave failed");
        }
    }
}

fn badge_note(id: &str) -> String {
    let name = badges::definition(id).map(|d| d.name).unwrap_or(id);
    format!("Badge earned: {name}")
}
