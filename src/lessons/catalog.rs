//! The built-in lessons.
//!
//! Setup functions build repository state through the same plumbing the
//! commands use; validators read state (and occasionally the command or
//! the checkpoint map) and nothing else.

use super::{Checkpoints, CommandRecord, Lesson, Quiz, Step};
use crate::remote::{RemoteStore, SEED_REMOTE_URL};
use crate::repo::types::{CmdResult, IndexEntry, LastEvent};
use crate::repo::{Repo, DEFAULT_BRANCH};

pub fn catalog() -> Vec<Lesson> {
    vec![basics(), branching(), merge_conflicts(), undoing_changes(), remotes(), staying_in_sync()]
}

pub fn find(lessons: &[Lesson], id: &str) -> Option<usize> {
    lessons.iter().position(|l| l.id == id)
}

// ---- setup helpers ----

fn bootstrap(repo: &mut Repo) {
    repo.initialized = true;
    repo.branches.insert(DEFAULT_BRANCH.to_string(), None);
    repo.ensure_branch_meta(DEFAULT_BRANCH);
}

fn commit_file(repo: &mut Repo, path: &str, content: &str, message: &str) -> String {
    repo.working_files.insert(path.to_string(), content.to_string());
    repo.index.insert(path.to_string(), IndexEntry::Add(content.to_string()));
    repo.create_commit(message, None)
}

fn switch_branch(repo: &mut Repo, name: &str) {
    if !repo.branches.contains_key(name) {
        let head = repo.head_id();
        repo.branches.insert(name.to_string(), head);
        repo.ensure_branch_meta(name);
    }
    repo.current_branch = name.to_string();
    let head = repo.branches[name].clone();
    let snapshot = repo.snapshot_of(head.as_deref());
    repo.sync_working_to(snapshot);
    repo.index.clear();
}

// ---- lesson 1: basics ----

fn setup_empty(_repo: &mut Repo, _store: &mut RemoteStore) {}

fn v_initialized(_r: &CommandRecord, repo: &Repo, _res: &CmdResult, _c: &Checkpoints) -> bool {
    repo.initialized
}

fn v_file_created(_r: &CommandRecord, repo: &Repo, _res: &CmdResult, _c: &Checkpoints) -> bool {
    !repo.working_files.is_empty()
}

fn v_staged(_r: &CommandRecord, repo: &Repo, _res: &CmdResult, _c: &Checkpoints) -> bool {
    !repo.index.is_empty()
}

fn v_committed(_r: &CommandRecord, repo: &Repo, _res: &CmdResult, _c: &Checkpoints) -> bool {
    !repo.commit_order.is_empty()
}

fn v_viewed_log(record: &CommandRecord, _repo: &Repo, res: &CmdResult, _c: &Checkpoints) -> bool {
    record.is_git("log") && res.ok
}

fn basics() -> Lesson {
    Lesson {
        id: "basics",
        title: "Your first commit",
        steps: vec![
            Step {
                title: "Initialize a repository",
                prompt: "Turn this empty folder into a Git repository.",
                hint: "git init",
                validator: v_initialized,
            },
            Step {
                title: "Create a file",
                prompt: "Create a README with some content.",
                hint: "echo \"# My Project\" > README.md",
                validator: v_file_created,
            },
            Step {
                title: "Stage your change",
                prompt: "Tell Git which changes belong in the next commit.",
                hint: "git add README.md",
                validator: v_staged,
            },
            Step {
                title: "Commit",
                prompt: "Record the staged snapshot with a message.",
                hint: "git commit -m \"Add README\"",
                validator: v_committed,
            },
            Step {
                title: "Inspect the history",
                prompt: "Look at what you just recorded.",
                hint: "git log --oneline",
                validator: v_viewed_log,
            },
        ],
        quiz: Some(Quiz {
            question: "Which command moves changes from the working tree into the staging area?",
            choices: &["git commit", "git add", "git push"],
            answer: 1,
        }),
        setup: setup_empty,
        on_step_complete: None,
    }
}

// ---- lesson 2: branching ----

fn setup_single_commit(repo: &mut Repo, _store: &mut RemoteStore) {
    bootstrap(repo);
    commit_file(repo, "/README.md", "# Branching practice\n", "Initial commit");
}

fn v_branch_created(_r: &CommandRecord, repo: &Repo, _res: &CmdResult, _c: &Checkpoints) -> bool {
    repo.branches.len() >= 2
}

fn v_on_other_branch(_r: &CommandRecord, repo: &Repo, _res: &CmdResult, _c: &Checkpoints) -> bool {
    repo.current_branch != DEFAULT_BRANCH
}

fn v_branch_ahead(_r: &CommandRecord, repo: &Repo, _res: &CmdResult, _c: &Checkpoints) -> bool {
    let main_head = repo.branches.get(DEFAULT_BRANCH).cloned().flatten();
    repo.current_branch != DEFAULT_BRANCH && repo.head_id().is_some() && repo.head_id() != main_head
}

fn v_back_on_main(_r: &CommandRecord, repo: &Repo, _res: &CmdResult, _c: &Checkpoints) -> bool {
    repo.current_branch == DEFAULT_BRANCH
}

fn v_merged(_r: &CommandRecord, repo: &Repo, res: &CmdResult, _c: &Checkpoints) -> bool {
    res.ok && matches!(repo.last_event, Some(LastEvent::Merge { .. }))
}

fn branching() -> Lesson {
    Lesson {
        id: "branching",
        title: "Branching out",
        steps: vec![
            Step {
                title: "Create a branch",
                prompt: "Make a new branch for your experiment.",
                hint: "git branch feature",
                validator: v_branch_created,
            },
            Step {
                title: "Switch to it",
                prompt: "Move your HEAD onto the new branch.",
                hint: "git checkout feature",
                validator: v_on_other_branch,
            },
            Step {
                title: "Commit on the branch",
                prompt: "Change something and commit it on the branch.",
                hint: "echo \"idea\" > idea.txt, then add and commit",
                validator: v_branch_ahead,
            },
            Step {
                title: "Return to main",
                prompt: "Switch back to main; your file disappears from the tree.",
                hint: "git checkout main",
                validator: v_back_on_main,
            },
            Step {
                title: "Merge your work",
                prompt: "Bring the branch's commits into main.",
                hint: "git merge feature",
                validator: v_merged,
            },
        ],
        quiz: Some(Quiz {
            question: "After committing on 'feature' and switching back to 'main', where is the new commit?",
            choices: &[
                "Gone - switching branches deletes commits",
                "Still on 'feature', reachable when you merge",
                "Automatically copied onto 'main'",
            ],
            answer: 1,
        }),
        setup: setup_single_commit,
        on_step_complete: None,
    }
}

// ---- lesson 3: merge conflicts ----

fn setup_conflicting_branches(repo: &mut Repo, _store: &mut RemoteStore) {
    bootstrap(repo);
    commit_file(repo, "/config", "blue", "Add config");
    switch_branch(repo, "feature");
    commit_file(repo, "/config", "green", "Prefer green");
    switch_branch(repo, DEFAULT_BRANCH);
    commit_file(repo, "/config", "red", "Prefer red");
}

fn v_conflict_hit(_r: &CommandRecord, repo: &Repo, _res: &CmdResult, _c: &Checkpoints) -> bool {
    repo.merge_state.as_ref().is_some_and(|m| !m.conflicts.is_empty())
}

fn v_conflict_edited(_r: &CommandRecord, repo: &Repo, _res: &CmdResult, _c: &Checkpoints) -> bool {
    repo.merge_state.as_ref().is_some_and(|m| {
        !m.conflicts.is_empty()
            && m.conflicts.iter().all(|path| {
                repo.working_files
                    .get(path)
                    .is_some_and(|content| !content.contains("<<<<<<<"))
            })
    })
}

fn v_resolution_staged(_r: &CommandRecord, repo: &Repo, _res: &CmdResult, _c: &Checkpoints) -> bool {
    repo.merge_state.as_ref().is_some_and(|m| m.conflicts.is_empty())
}

fn v_merge_concluded(_r: &CommandRecord, repo: &Repo, _res: &CmdResult, _c: &Checkpoints) -> bool {
    repo.merge_state.is_none() && repo.head_commit().is_some_and(|c| c.parents.len() == 2)
}

fn merge_conflicts() -> Lesson {
    Lesson {
        id: "merge-conflicts",
        title: "Resolving a conflict",
        steps: vec![
            Step {
                title: "Attempt the merge",
                prompt: "Both branches changed 'config'. Try merging 'feature' into main.",
                hint: "git merge feature",
                validator: v_conflict_hit,
            },
            Step {
                title: "Resolve the conflict",
                prompt: "Open 'config', remove the markers, and keep the content you want.",
                hint: "echo \"purple\" > config",
                validator: v_conflict_edited,
            },
            Step {
                title: "Mark it resolved",
                prompt: "Stage the resolved file so Git knows the conflict is settled.",
                hint: "git add config",
                validator: v_resolution_staged,
            },
            Step {
                title: "Conclude the merge",
                prompt: "Commit to finish the merge.",
                hint: "git commit -m \"Merge feature\"",
                validator: v_merge_concluded,
            },
        ],
        quiz: Some(Quiz {
            question: "What does the text between <<<<<<< HEAD and ======= show?",
            choices: &[
                "The incoming branch's version",
                "Your current branch's version",
                "The common ancestor's version",
            ],
            answer: 1,
        }),
        setup: setup_conflicting_branches,
        on_step_complete: None,
    }
}

// ---- lesson 4: undoing changes ----

fn setup_two_commits(repo: &mut Repo, _store: &mut RemoteStore) {
    bootstrap(repo);
    commit_file(repo, "/README.md", "# Undo practice\n", "Initial commit");
    commit_file(repo, "/notes.txt", "remember the milk\n", "Add notes");
}

fn v_dirty(_r: &CommandRecord, repo: &Repo, _res: &CmdResult, _c: &Checkpoints) -> bool {
    repo.is_dirty()
}

fn v_stashed(_r: &CommandRecord, repo: &Repo, _res: &CmdResult, _c: &Checkpoints) -> bool {
    !repo.stash.is_empty() && !repo.is_dirty()
}

fn v_popped(_r: &CommandRecord, repo: &Repo, res: &CmdResult, _c: &Checkpoints) -> bool {
    res.ok && matches!(repo.last_event, Some(LastEvent::StashPop))
}

fn v_reset_clean(_r: &CommandRecord, repo: &Repo, _res: &CmdResult, _c: &Checkpoints) -> bool {
    matches!(repo.last_event, Some(LastEvent::ResetHard { .. })) && !repo.is_dirty()
}

fn v_reverted(_r: &CommandRecord, repo: &Repo, _res: &CmdResult, _c: &Checkpoints) -> bool {
    matches!(repo.last_event, Some(LastEvent::Revert { .. }))
}

fn undoing_changes() -> Lesson {
    Lesson {
        id: "undoing-changes",
        title: "Undoing work",
        steps: vec![
            Step {
                title: "Make a mess",
                prompt: "Change or create a file without committing it.",
                hint: "echo \"scratch\" > scratch.txt",
                validator: v_dirty,
            },
            Step {
                title: "Stash it",
                prompt: "Park the uncommitted work and get a clean tree.",
                hint: "git stash",
                validator: v_stashed,
            },
            Step {
                title: "Bring it back",
                prompt: "Restore the stashed work.",
                hint: "git stash pop",
                validator: v_popped,
            },
            Step {
                title: "Throw it away",
                prompt: "Discard everything uncommitted and return to HEAD.",
                hint: "git reset --hard",
                validator: v_reset_clean,
            },
            Step {
                title: "Revert a commit",
                prompt: "Undo the 'Add notes' commit without rewriting history.",
                hint: "git log --oneline, then git revert <hash>",
                validator: v_reverted,
            },
        ],
        quiz: Some(Quiz {
            question: "How does 'git revert' differ from 'git reset --hard'?",
            choices: &[
                "revert makes a new commit that undoes one; reset moves the branch pointer",
                "They are aliases for the same operation",
                "reset is safer because it keeps history",
            ],
            answer: 0,
        }),
        setup: setup_two_commits,
        on_step_complete: None,
    }
}

// ---- lesson 5: remotes ----

fn setup_seeded_store(_repo: &mut Repo, store: &mut RemoteStore) {
    store.seed();
}

fn v_cloned_sample(_r: &CommandRecord, repo: &Repo, _res: &CmdResult, _c: &Checkpoints) -> bool {
    repo.initialized && repo.remotes.get("origin").map(String::as_str) == Some(SEED_REMOTE_URL)
}

fn v_listed_remotes(record: &CommandRecord, _repo: &Repo, res: &CmdResult, _c: &Checkpoints) -> bool {
    record.is_git("remote") && res.ok
}

fn v_local_commit_on_clone(_r: &CommandRecord, repo: &Repo, res: &CmdResult, _c: &Checkpoints) -> bool {
    res.ok
        && repo.commit_order.len() > 2
        && matches!(repo.last_event, Some(LastEvent::Commit { .. }))
}

fn v_pushed(_r: &CommandRecord, repo: &Repo, res: &CmdResult, _c: &Checkpoints) -> bool {
    res.ok && matches!(repo.last_event, Some(LastEvent::Push { .. }))
}

fn remotes() -> Lesson {
    Lesson {
        id: "remotes",
        title: "Working with a remote",
        steps: vec![
            Step {
                title: "Clone the sample project",
                prompt: "Fetch a copy of the shared repository.",
                hint: "git clone https://git-tutor.example/sample-project.git",
                validator: v_cloned_sample,
            },
            Step {
                title: "Inspect the remote",
                prompt: "See where 'origin' points.",
                hint: "git remote -v",
                validator: v_listed_remotes,
            },
            Step {
                title: "Commit locally",
                prompt: "Add a file and commit it. The remote does not see it yet.",
                hint: "echo \"notes\" > notes.md, git add, git commit",
                validator: v_local_commit_on_clone,
            },
            Step {
                title: "Publish it",
                prompt: "Push your commit and set the upstream.",
                hint: "git push -u origin main",
                validator: v_pushed,
            },
        ],
        quiz: Some(Quiz {
            question: "What does 'git push -u origin main' record besides sending commits?",
            choices: &[
                "Nothing extra",
                "The upstream, so later push/pull can omit the remote and branch",
                "A tag named 'origin/main'",
            ],
            answer: 1,
        }),
        setup: setup_seeded_store,
        on_step_complete: None,
    }
}

// ---- lesson 6: staying in sync ----

fn v_pulled_teammate_work(
    _r: &CommandRecord,
    repo: &Repo,
    res: &CmdResult,
    checkpoints: &Checkpoints,
) -> bool {
    // Compare against the head recorded when this step started.
    let step_start_head = checkpoints.get(&1).and_then(|r| r.head_id());
    res.ok
        && matches!(repo.last_event, Some(LastEvent::Pull { .. }))
        && repo.head_id() != step_start_head
}

fn v_local_commit_since_step(
    _r: &CommandRecord,
    repo: &Repo,
    res: &CmdResult,
    checkpoints: &Checkpoints,
) -> bool {
    let step_start_head = checkpoints.get(&2).and_then(|r| r.head_id());
    res.ok
        && matches!(repo.last_event, Some(LastEvent::Commit { merge: false, .. }))
        && repo.head_id() != step_start_head
}

fn v_pull_merged(_r: &CommandRecord, repo: &Repo, res: &CmdResult, _c: &Checkpoints) -> bool {
    res.ok
        && matches!(repo.last_event, Some(LastEvent::Pull { .. }))
        && repo.head_commit().is_some_and(|c| c.parents.len() == 2)
}

/// Plant teammate commits on the seed remote as the lesson progresses.
fn sync_hook(finished_step: usize, _repo: &mut Repo, store: &mut RemoteStore) {
    let Some(remote) = store.repo_mut(SEED_REMOTE_URL) else {
        return;
    };
    match finished_step {
        0 => {
            remote.append_commit(
                DEFAULT_BRANCH,
                "Fix typo in README",
                &[("/README.md", "# Sample Project\n\nA small repository used by the Git Tutor lessons. Fixed.\n")],
            );
        }
        2 => {
            remote.append_commit(
                DEFAULT_BRANCH,
                "Clarify contributing guide",
                &[("/CONTRIBUTING.md", "# Contributing\n\nBranch, commit, push, and open a review.\n")],
            );
        }
        _ => {}
    }
}

fn staying_in_sync() -> Lesson {
    Lesson {
        id: "staying-in-sync",
        title: "Staying in sync",
        steps: vec![
            Step {
                title: "Clone the sample project",
                prompt: "Start from the shared repository again.",
                hint: "git clone https://git-tutor.example/sample-project.git",
                validator: v_cloned_sample,
            },
            Step {
                title: "Pull the teammate's fix",
                prompt: "A teammate already pushed a commit. Fetch and integrate it.",
                hint: "git pull",
                validator: v_pulled_teammate_work,
            },
            Step {
                title: "Commit your own change",
                prompt: "Add something of your own and commit it locally.",
                hint: "echo \"mine\" > mine.txt, git add, git commit",
                validator: v_local_commit_since_step,
            },
            Step {
                title: "Pull divergent work",
                prompt: "The teammate pushed again while you worked. Pull; Git merges the histories.",
                hint: "git pull",
                validator: v_pull_merged,
            },
            Step {
                title: "Share the result",
                prompt: "Push the merged history back.",
                hint: "git push",
                validator: v_pushed,
            },
        ],
        quiz: Some(Quiz {
            question: "Your branch and the remote diverged. What does 'git pull' do here?",
            choices: &[
                "Overwrites your commits with the remote's",
                "Fails permanently; you must clone again",
                "Imports the remote commits and merges them with yours",
            ],
            answer: 2,
        }),
        setup: setup_seeded_store,
        on_step_complete: Some(sync_hook),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        let lessons = catalog();
        let mut ids: Vec<&str> = lessons.iter().map(|l| l.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), lessons.len());
    }

    #[test]
    fn every_lesson_has_steps_and_a_quiz() {
        for lesson in catalog() {
            assert!(!lesson.steps.is_empty(), "{} has no steps", lesson.id);
            assert!(lesson.quiz.is_some(), "{} has no quiz", lesson.id);
            if let Some(quiz) = &lesson.quiz {
                assert!(quiz.answer < quiz.choices.len());
            }
        }
    }

    #[test]
    fn conflict_setup_produces_divergent_branches() {
        let mut repo = Repo::new();
        let mut store = RemoteStore::new();
        setup_conflicting_branches(&mut repo, &mut store);
        assert_eq!(repo.current_branch, DEFAULT_BRANCH);
        assert_eq!(repo.working_files["/config"], "red");
        let feature_head = repo.branches["feature"].clone().unwrap();
        assert_eq!(repo.commits[&feature_head].files["/config"], "green");
        assert!(!repo.is_dirty());
    }

    #[test]
    fn seed_url_matches_clone_hints() {
        let lessons = catalog();
        let lesson = &lessons[find(&lessons, "remotes").unwrap()];
        assert!(lesson.steps[0].hint.contains(SEED_REMOTE_URL));
    }
}
