//! Commit graph queries: ancestry, merge bases, first-parent walks.

use std::collections::{HashMap, HashSet, VecDeque};

use super::Repo;

impl Repo {
    /// True when `ancestor` is reachable from `descendant` through parent
    /// links. Reflexive: every commit is its own ancestor.
    pub fn is_ancestor(&self, ancestor: &str, descendant: &str) -> bool {
        let mut queue = VecDeque::from([descendant.to_string()]);
        let mut seen = HashSet::new();
        while let Some(id) = queue.pop_front() {
            if id == ancestor {
                return true;
            }
            if !seen.insert(id.clone()) {
                continue;
            }
            if let Some(commit) = self.commits.get(&id) {
                queue.extend(commit.parents.iter().cloned());
            }
        }
        false
    }

    /// Lowest-cost common ancestor of two commits: breadth-first from both
    /// sides, minimizing summed distance, ties broken by BFS order from
    /// `ours`. `None` when the histories are disjoint.
    pub fn merge_base(&self, ours: &str, theirs: &str) -> Option<String> {
        let (our_dist, our_order) = self.bfs_distances(ours);
        let (their_dist, _) = self.bfs_distances(theirs);

        let mut best: Option<(u32, &String)> = None;
        for id in &our_order {
            if let Some(&d2) = their_dist.get(id) {
                let cost = our_dist[id] + d2;
                if best.map_or(true, |(b, _)| cost < b) {
                    best = Some((cost, id));
                }
            }
        }
        best.map(|(_, id)| id.clone())
    }

    /// Walk `count` steps along first parents from `start` (`HEAD~N`).
    pub fn nth_first_parent(&self, start: &str, count: usize) -> Option<String> {
        let mut current = start.to_string();
        for _ in 0..count {
            let commit = self.commits.get(&current)?;
            current = commit.parents.first()?.clone();
        }
        Some(current)
    }

    /// First-parent chain from HEAD, newest first. Stops on a missing
    /// parent or a cycle.
    pub fn history(&self) -> Vec<&super::types::Commit> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.head_id();
        while let Some(id) = current {
            if !seen.insert(id.clone()) {
                break;
            }
            match self.commits.get(&id) {
                Some(commit) => {
                    out.push(commit);
                    current = commit.parents.first().cloned();
                }
                None => break,
            }
        }
        out
    }

    /// Distances from `start` over parent links, plus visitation order.
    fn bfs_distances(&self, start: &str) -> (HashMap<String, u32>, Vec<String>) {
        let mut dist = HashMap::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([(start.to_string(), 0u32)]);
        while let Some((id, d)) = queue.pop_front() {
            if dist.contains_key(&id) {
                continue;
            }
            dist.insert(id.clone(), d);
            order.push(id.clone());
            if let Some(commit) = self.commits.get(&id) {
                for parent in &commit.parents {
                    queue.push_back((parent.clone(), d + 1));
                }
            }
        }
        (dist, order)
    }
}
