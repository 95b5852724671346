//! Three-way snapshot merge.
//!
//! Pure function of three snapshots plus the incoming branch name; the
//! repository mutation in `commands::merge` is a thin wrapper over this.

use std::collections::BTreeSet;

use super::types::Snapshot;

/// Result of merging `ours` and `theirs` against a common `base`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Merged tree. Conflicting paths carry marker-filled buffers.
    pub files: Snapshot,
    /// Paths that could not be merged automatically, sorted.
    pub conflicts: Vec<String>,
}

impl MergeOutcome {
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// Merge per path over `base ∪ ours ∪ theirs`:
/// ours==theirs takes either side (covers both-deleted), a side equal to
/// base yields to the other side, anything else is a conflict.
pub fn three_way(base: &Snapshot, ours: &Snapshot, theirs: &Snapshot, their_label: &str) -> MergeOutcome {
    let mut paths: BTreeSet<&String> = BTreeSet::new();
    paths.extend(base.keys());
    paths.extend(ours.keys());
    paths.extend(theirs.keys());

    let mut files = Snapshot::new();
    let mut conflicts = Vec::new();

    for path in paths {
        let b = base.get(path);
        let o = ours.get(path);
        let t = theirs.get(path);

        let merged = if o == t {
            o.cloned()
        } else if o == b {
            t.cloned()
        } else if t == b {
            o.cloned()
        } else {
            conflicts.push(path.clone());
            Some(conflict_buffer(
                o.map(String::as_str).unwrap_or(""),
                t.map(String::as_str).unwrap_or(""),
                their_label,
            ))
        };

        if let Some(content) = merged {
            files.insert(path.clone(), content);
        }
    }

    MergeOutcome { files, conflicts }
}

/// Marker-filled buffer written to the working tree for a conflict.
fn conflict_buffer(ours: &str, theirs: &str, their_label: &str) -> String {
    format!("<<<<<<< HEAD\n{ours}\n=======\n{theirs}\n>>>>>>> {their_label}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(entries: &[(&str, &str)]) -> Snapshot {
        entries.iter().map(|(p, c)| (p.to_string(), c.to_string())).collect()
    }

    #[test]
    fn non_overlapping_edits_merge_cleanly() {
        let base = snap(&[("/f", "1")]);
        let ours = snap(&[("/f", "1"), ("/g", "3")]);
        let theirs = snap(&[("/f", "2")]);
        let out = three_way(&base, &ours, &theirs, "feat");
        assert!(out.is_clean());
        assert_eq!(out.files, snap(&[("/f", "2"), ("/g", "3")]));
    }

    #[test]
    fn divergent_edits_conflict_with_markers() {
        let base = snap(&[("/config", "blue")]);
        let ours = snap(&[("/config", "red")]);
        let theirs = snap(&[("/config", "green")]);
        let out = three_way(&base, &ours, &theirs, "feat");
        assert_eq!(out.conflicts, vec!["/config".to_string()]);
        let buffer = &out.files["/config"];
        assert!(buffer.contains("<<<<<<< HEAD"));
        assert!(buffer.contains("red"));
        assert!(buffer.contains("======="));
        assert!(buffer.contains("green"));
        assert!(buffer.contains(">>>>>>> feat"));
    }

    #[test]
    fn both_deleted_stays_deleted() {
        let base = snap(&[("/gone", "x")]);
        let out = three_way(&base, &Snapshot::new(), &Snapshot::new(), "feat");
        assert!(out.is_clean());
        assert!(out.files.is_empty());
    }

    #[test]
    fn deletion_on_one_side_wins_when_other_untouched() {
        let base = snap(&[("/f", "1"), ("/g", "2")]);
        let ours = snap(&[("/g", "2")]);
        let theirs = snap(&[("/f", "1"), ("/g", "2")]);
        let out = three_way(&base, &ours, &theirs, "feat");
        assert!(out.is_clean());
        assert_eq!(out.files, snap(&[("/g", "2")]));
    }

    #[test]
    fn clean_merge_is_commutative() {
        let base = snap(&[("/a", "1"), ("/b", "2")]);
        let left = snap(&[("/a", "10"), ("/b", "2")]);
        let right = snap(&[("/a", "1"), ("/b", "20"), ("/c", "3")]);
        let ab = three_way(&base, &left, &right, "x");
        let ba = three_way(&base, &right, &left, "x");
        assert!(ab.is_clean() && ba.is_clean());
        assert_eq!(ab.files, ba.files);
    }
}
