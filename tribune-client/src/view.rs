use std::collections::{HashMap, HashSet};

use crate::{
    api::CommentId,
    comment::{CommentNode, Forest},
};

/// Per-comment rendering state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NodeState {
    Viewing,
    Editing { buffer: String },
}

/// Ephemeral UI state for one rendered thread, keyed by comment id so it
/// survives the full tree rebuilds that follow every mutation. This lives in
/// the rendering component, not in module globals, so several independent
/// thread views can coexist (and be tested) side by side.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ThreadView {
    /// Absent: children were never rendered (lazy). Present: rendered once,
    /// now toggled by visibility only.
    expanded: HashMap<CommentId, bool>,
    editing: HashMap<CommentId, String>,
    replying: HashSet<CommentId>,
    /// One mutation at a time; the triggering control is disabled while an
    /// operation is in flight.
    busy: bool,
}

impl ThreadView {
    pub fn new() -> ThreadView {
        ThreadView::default()
    }

    /// `None` until the subtree is first expanded, then the current
    /// visibility.
    pub fn expansion(&self, id: CommentId) -> Option<bool> {
        self.expanded.get(&id).copied()
    }

    pub fn is_expanded(&self, id: CommentId) -> bool {
        self.expansion(id) == Some(true)
    }

    pub fn toggle_expanded(&mut self, id: CommentId) {
        let e = self.expanded.entry(id).or_insert(false);
        *e = !*e;
    }

    pub fn node_state(&self, id: CommentId) -> NodeState {
        match self.editing.get(&id) {
            Some(buffer) => NodeState::Editing {
                buffer: buffer.clone(),
            },
            None => NodeState::Viewing,
        }
    }

    pub fn start_edit(&mut self, id: CommentId, current_body: &str) {
        self.editing
            .entry(id)
            .or_insert_with(|| String::from(current_body));
    }

    pub fn set_edit_buffer(&mut self, id: CommentId, text: String) {
        if let Some(buffer) = self.editing.get_mut(&id) {
            *buffer = text;
        }
    }

    pub fn edit_buffer(&self, id: CommentId) -> Option<&str> {
        self.editing.get(&id).map(|s| s as &str)
    }

    /// Cancelling discards the buffer; the next render shows the original
    /// body again.
    pub fn cancel_edit(&mut self, id: CommentId) {
        self.editing.remove(&id);
    }

    /// Called once the update mutation succeeded; the refreshed tree carries
    /// the new body.
    pub fn finish_edit(&mut self, id: CommentId) {
        self.editing.remove(&id);
    }

    pub fn is_replying(&self, id: CommentId) -> bool {
        self.replying.contains(&id)
    }

    pub fn open_reply(&mut self, id: CommentId) {
        self.replying.insert(id);
    }

    pub fn close_reply(&mut self, id: CommentId) {
        self.replying.remove(&id);
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn begin_mutation(&mut self) {
        self.busy = true;
    }

    pub fn end_mutation(&mut self) {
        self.busy = false;
    }

    /// The bodies currently visible to the user, in render order: a node's
    /// children only count once that node has been expanded and is not
    /// collapsed. Drives the expand/collapse tests and the reply labels.
    pub fn visible_bodies(&self, forest: &Forest) -> Vec<String> {
        let mut out = Vec::new();
        for node in &forest.roots {
            self.collect_visible(node, &mut out);
        }
        out
    }

    fn collect_visible(&self, node: &CommentNode, out: &mut Vec<String>) {
        let body = match self.node_state(node.id()) {
            NodeState::Viewing => node.comment.body.clone(),
            NodeState::Editing { buffer } => buffer,
        };
        out.push(body);
        if self.is_expanded(node.id()) {
            for child in &node.children {
                self.collect_visible(child, out);
            }
        }
    }
}

/// Toggle label for a subtree, pluralized on the live child count.
pub fn reply_label(count: usize) -> String {
    match count {
        1 => String::from("1 Reply"),
        n => format!("{} Replies", n),
    }
}
