use std::collections::HashMap;

use crate::api::{self, CommentId};

/// Nesting cap for reply chains. A reply whose parent already sits at the
/// cap is attached to the capped ancestor instead, so the forest's
/// structural depth is bounded and recursive rendering cannot blow the
/// stack on pathological threads.
pub const MAX_DEPTH: usize = 32;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommentNode {
    pub comment: api::Comment,

    /// 0 for roots; bounded by `MAX_DEPTH + 1`.
    pub depth: usize,

    /// Replies in the order they were authored.
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    pub fn id(&self) -> CommentId {
        self.comment.id
    }

    pub fn reply_count(&self) -> usize {
        self.children.len()
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Forest {
    pub roots: Vec<CommentNode>,
}

impl Forest {
    /// Builds a reply forest from a flat list of comments, delivered in
    /// ascending creation order. Two passes, O(n): an `id -> index` lookup,
    /// then parent assignment. A comment whose `parent_id` matches no
    /// fetched id (or references itself) is demoted to a root rather than
    /// dropped. Parent cycles are broken deterministically: the earliest
    /// comment of every unreachable cluster becomes a root. Every input
    /// comment ends up in the forest exactly once.
    pub fn build(comments: Vec<api::Comment>) -> Forest {
        let n = comments.len();
        let mut index = HashMap::with_capacity(n);
        for (i, c) in comments.iter().enumerate() {
            index.entry(c.id).or_insert(i);
        }

        // First pass: resolve parent links. Unknown parents and
        // self-references demote to root.
        let parent: Vec<Option<usize>> = comments
            .iter()
            .enumerate()
            .map(|(i, c)| match c.parent_id {
                Some(p) => match index.get(&p) {
                    Some(&pi) if pi != i => Some(pi),
                    _ => {
                        tracing::warn!(comment = ?c.id, parent = ?p, "comment parent not in fetched set, demoting to root");
                        None
                    }
                },
                None => None,
            })
            .collect();

        // Second pass: child lists and roots, both in input order.
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut roots = Vec::new();
        for (i, p) in parent.iter().enumerate() {
            match p {
                Some(p) => children[*p].push(i),
                None => roots.push(i),
            }
        }

        // Anything not reachable from a root sits on (or under) a parent
        // cycle. Re-root the earliest such comment and repeat until the
        // whole input is reachable.
        let mut visited = vec![false; n];
        let mut stack = roots.clone();
        while let Some(i) = stack.pop() {
            if !visited[i] {
                visited[i] = true;
                stack.extend(children[i].iter().copied());
            }
        }
        for i in 0..n {
            if !visited[i] {
                let p = parent[i].expect("unreachable comment without a parent link");
                tracing::warn!(comment = ?comments[i].id, "comment parent chain is cyclic, demoting to root");
                children[p].retain(|&c| c != i);
                roots.push(i);
                let mut stack = vec![i];
                while let Some(j) = stack.pop() {
                    if !visited[j] {
                        visited[j] = true;
                        stack.extend(children[j].iter().copied());
                    }
                }
            }
        }

        // Depth cap: a comment nested deeper than MAX_DEPTH is re-attached
        // to its ancestor sitting at the cap, flattening the overflow while
        // keeping every comment in place.
        let mut depth = vec![0usize; n];
        let mut stack: Vec<usize> = roots.clone();
        while let Some(i) = stack.pop() {
            for &c in &children[i] {
                depth[c] = depth[i] + 1;
                stack.push(c);
            }
        }
        let mut eff_children: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (i, p) in parent.iter().enumerate() {
            let Some(mut target) = *p else { continue };
            if !children[target].contains(&i) {
                // re-rooted above
                continue;
            }
            if depth[i] > MAX_DEPTH {
                while depth[target] > MAX_DEPTH {
                    target = parent[target].expect("capped ancestor walk escaped the tree");
                }
            }
            eff_children[target].push(i);
        }

        // Assemble. Recursion is fine here: the effective forest is at most
        // MAX_DEPTH + 1 levels deep.
        let mut slots: Vec<Option<api::Comment>> = comments.into_iter().map(Some).collect();
        let forest = Forest {
            roots: roots
                .iter()
                .map(|&i| assemble(i, 0, &eff_children, &mut slots))
                .collect(),
        };
        debug_assert_eq!(forest.len(), n, "comment lost or duplicated during tree build");
        forest
    }

    /// Total number of comments across the forest.
    pub fn len(&self) -> usize {
        fn count(n: &CommentNode) -> usize {
            1 + n.children.iter().map(count).sum::<usize>()
        }
        self.roots.iter().map(count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn find(&self, id: CommentId) -> Option<&CommentNode> {
        fn find_in(nodes: &[CommentNode], id: CommentId) -> Option<&CommentNode> {
            for node in nodes {
                if node.id() == id {
                    return Some(node);
                }
                if let Some(found) = find_in(&node.children, id) {
                    return Some(found);
                }
            }
            None
        }
        find_in(&self.roots, id)
    }
}

fn assemble(
    i: usize,
    depth: usize,
    eff_children: &[Vec<usize>],
    slots: &mut Vec<Option<api::Comment>>,
) -> CommentNode {
    CommentNode {
        comment: slots[i].take().expect("comment assembled twice"),
        depth,
        children: eff_children[i]
            .clone()
            .into_iter()
            .map(|c| assemble(c, depth + 1, eff_children, slots))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Comment, PostId, Uuid};
    use chrono::{Duration, Utc};

    fn id(n: u128) -> CommentId {
        CommentId(Uuid::from_u128(n))
    }

    fn comment(n: u128, parent: Option<u128>) -> Comment {
        Comment {
            id: id(n),
            post_id: PostId::stub(),
            parent_id: parent.map(id),
            body: format!("comment {}", n),
            display_name: None,
            is_anonymous: false,
            author_id: None,
            created_at: Utc::now() + Duration::seconds(n as i64),
        }
    }

    #[test]
    fn orphan_becomes_root() {
        // roots = [1, 3]; node 1's children = [2]
        let forest = Forest::build(vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, Some(99)),
        ]);
        let roots: Vec<_> = forest.roots.iter().map(|r| r.id()).collect();
        assert_eq!(roots, vec![id(1), id(3)]);
        assert_eq!(forest.roots[0].children.len(), 1);
        assert_eq!(forest.roots[0].children[0].id(), id(2));
        assert_eq!(forest.len(), 3);
    }

    #[test]
    fn children_keep_input_order() {
        let forest = Forest::build(vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, Some(1)),
            comment(4, Some(1)),
        ]);
        let kids: Vec<_> = forest.roots[0].children.iter().map(|c| c.id()).collect();
        assert_eq!(kids, vec![id(2), id(3), id(4)]);
    }

    #[test]
    fn self_reference_becomes_root() {
        let forest = Forest::build(vec![comment(1, Some(1)), comment(2, Some(1))]);
        assert_eq!(forest.roots.len(), 1);
        assert_eq!(forest.roots[0].children[0].id(), id(2));
        assert_eq!(forest.len(), 2);
    }

    #[test]
    fn two_cycle_is_broken_at_earliest_member() {
        let forest = Forest::build(vec![
            comment(1, Some(2)),
            comment(2, Some(1)),
            comment(3, Some(2)),
        ]);
        // 1 is re-rooted; 2 stays its child; 3 stays under 2.
        assert_eq!(forest.roots.len(), 1);
        assert_eq!(forest.roots[0].id(), id(1));
        assert_eq!(forest.roots[0].children[0].id(), id(2));
        assert_eq!(forest.roots[0].children[0].children[0].id(), id(3));
        assert_eq!(forest.len(), 3);
    }

    #[test]
    fn depth_is_capped_by_flattening() {
        let chain: Vec<_> = (0..MAX_DEPTH as u128 + 10)
            .map(|n| comment(n + 1, (n > 0).then(|| n)))
            .collect();
        let total = chain.len();
        let forest = Forest::build(chain);
        assert_eq!(forest.len(), total);

        let mut node = &forest.roots[0];
        let mut max_depth = 0;
        loop {
            max_depth = max_depth.max(node.depth);
            match node.children.first() {
                Some(c) => node = c,
                None => break,
            }
        }
        assert_eq!(max_depth, MAX_DEPTH + 1);

        // The ancestor at the cap absorbed the whole overflow.
        let capped = forest.find(id(MAX_DEPTH as u128 + 1)).unwrap();
        assert_eq!(capped.depth, MAX_DEPTH);
        assert_eq!(capped.children.len(), 9);
        assert!(capped.children.iter().all(|c| c.children.is_empty()));
    }

    #[test]
    fn empty_input_yields_empty_forest() {
        assert!(Forest::build(Vec::new()).is_empty());
    }
}
