//! Achievements.
//!
//! Badges are earned two ways: event-driven, by matching the repo's last
//! event after each command, and by a periodic sync over lesson and quiz
//! state. Awards are idempotent; earning a badge twice is a no-op.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::repo::now;
use crate::repo::types::LastEvent;

pub struct BadgeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const BADGES: &[BadgeDef] = &[
    BadgeDef { id: "first-commit", name: "First Commit", description: "Record your first commit." },
    BadgeDef { id: "branch-builder", name: "Branch Builder", description: "Create a branch." },
    BadgeDef { id: "merge-master", name: "Merge Master", description: "Complete a merge." },
    BadgeDef { id: "conflict-tamer", name: "Conflict Tamer", description: "Conclude a conflicted merge." },
    BadgeDef { id: "clean-desk", name: "Clean Desk", description: "Stash uncommitted work." },
    BadgeDef { id: "time-traveler", name: "Time Traveler", description: "Hard-reset to an earlier commit." },
    BadgeDef { id: "historian", name: "Historian", description: "Revert a commit." },
    BadgeDef { id: "publisher", name: "Publisher", description: "Push commits to a remote." },
    BadgeDef { id: "team-player", name: "Team Player", description: "Pull a teammate's commits." },
    BadgeDef { id: "quiz-whiz", name: "Quiz Whiz", description: "Pass every lesson quiz." },
    BadgeDef { id: "lesson-basics", name: "Committed", description: "Finish 'Your first commit'." },
    BadgeDef { id: "lesson-branching", name: "Branched Out", description: "Finish 'Branching out'." },
    BadgeDef { id: "lesson-merge-conflicts", name: "Peacekeeper", description: "Finish 'Resolving a conflict'." },
    BadgeDef { id: "lesson-undoing-changes", name: "Eraser", description: "Finish 'Undoing work'." },
    BadgeDef { id: "lesson-remotes", name: "Connected", description: "Finish 'Working with a remote'." },
    BadgeDef { id: "lesson-staying-in-sync", name: "In Sync", description: "Finish 'Staying in sync'." },
];

pub fn definition(id: &str) -> Option<&'static BadgeDef> {
    BADGES.iter().find(|d| d.id == id)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BadgeState {
    pub earned: bool,
    pub earned_at: Option<u64>,
}

pub type BadgeMap = BTreeMap<String, BadgeState>;

/// Make sure every defined badge has an entry, so new badges appear for
/// saves created before they existed.
pub fn merge_definitions(badges: &mut BadgeMap) {
    for def in BADGES {
        badges.entry(def.id.to_string()).or_default();
    }
}

/// Award one badge. Returns true only the first time.
pub fn award(badges: &mut BadgeMap, id: &str) -> bool {
    let state = badges.entry(id.to_string()).or_default();
    if state.earned {
        return false;
    }
    state.earned = true;
    state.earned_at = Some(now());
    tracing::info!(badge = id, "badge earned");
    true
}

/// Event-driven awards. Returns newly earned badge ids.
pub fn award_for_event(badges: &mut BadgeMap, event: &LastEvent) -> Vec<&'static str> {
    let ids: &[&'static str] = match event {
        LastEvent::Commit { merge: false, .. } => &["first-commit"],
        LastEvent::Commit { merge: true, .. } => &["merge-master", "conflict-tamer"],
        LastEvent::Branch { .. } => &["branch-builder"],
        LastEvent::Merge { conflicts: 0, .. } => &["merge-master"],
        LastEvent::Stash => &["clean-desk"],
        LastEvent::ResetHard { .. } => &["time-traveler"],
        LastEvent::Revert { .. } => &["historian"],
        LastEvent::Push { .. } => &["publisher"],
        LastEvent::Pull { .. } => &["team-player"],
        _ => &[],
    };
    ids.iter().filter(|id| award(badges, id)).copied().collect()
}

/// Sync pass: lesson-completion badges and the all-quizzes badge.
pub fn sync_awards<'a>(
    badges: &mut BadgeMap,
    completed_lessons: impl Iterator<Item = &'a str>,
    all_quizzes_passed: bool,
) -> Vec<&'static str> {
    let mut earned = Vec::new();
    for lesson_id in completed_lessons {
        let badge_id = format!("lesson-{lesson_id}");
        if let Some(def) = definition(&badge_id) {
            if award(badges, def.id) {
                earned.push(def.id);
            }
        }
    }
    if all_quizzes_passed && award(badges, "quiz-whiz") {
        earned.push("quiz-whiz");
    }
    earned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn award_is_idempotent() {
        let mut badges = BadgeMap::new();
        assert!(award(&mut badges, "first-commit"));
        let at = badges["first-commit"].earned_at;
        assert!(!award(&mut badges, "first-commit"));
        assert_eq!(badges["first-commit"].earned_at, at);
    }

    #[test]
    fn commit_event_awards_first_commit() {
        let mut badges = BadgeMap::new();
        let event = LastEvent::Commit { id: "a".into(), message: "m".into(), merge: false };
        assert_eq!(award_for_event(&mut badges, &event), vec!["first-commit"]);
        assert!(award_for_event(&mut badges, &event).is_empty());
    }

    #[test]
    fn merge_commit_awards_both_merge_badges() {
        let mut badges = BadgeMap::new();
        let event = LastEvent::Commit { id: "a".into(), message: "m".into(), merge: true };
        assert_eq!(
            award_for_event(&mut badges, &event),
            vec!["merge-master", "conflict-tamer"]
        );
    }

    #[test]
    fn sync_awards_lesson_badges() {
        let mut badges = BadgeMap::new();
        let earned = sync_awards(&mut badges, ["basics"].into_iter(), false);
        assert_eq!(earned, vec!["lesson-basics"]);
        assert!(!badges.contains_key("quiz-whiz") || !badges["quiz-whiz"].earned);

        let earned = sync_awards(&mut badges, ["basics"].into_iter(), true);
        assert_eq!(earned, vec!["quiz-whiz"]);
    }

    #[test]
    fn definitions_merge_without_clobbering() {
        let mut badges = BadgeMap::new();
        award(&mut badges, "first-commit");
        merge_definitions(&mut badges);
        assert!(badges["first-commit"].earned);
        assert_eq!(badges.len(), BADGES.len());
    }
}
