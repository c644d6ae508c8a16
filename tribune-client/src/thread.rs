use crate::{
    api::{self, UserId},
    Forest,
};

/// Everything needed to render one discussion thread. Rebuilt from scratch
/// on every load or refresh; no state is kept across page loads beyond the
/// ephemeral UI in [`crate::ThreadView`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ThreadDump {
    /// Identity behind the active session, if any.
    pub viewer: Option<UserId>,
    pub post: api::Post,
    pub comments: Forest,
    pub attachments: Vec<api::Attachment>,
}

impl ThreadDump {
    pub fn new(
        viewer: Option<UserId>,
        post: api::Post,
        comments: Vec<api::Comment>,
        attachments: Vec<api::Attachment>,
    ) -> ThreadDump {
        ThreadDump {
            viewer,
            post,
            comments: Forest::build(comments),
            attachments,
        }
    }

    /// A viewer may edit or delete a comment if they authored it, or if they
    /// authored the post it belongs to (thread-owner moderation). Anonymous
    /// viewers manage nothing.
    pub fn can_manage(&self, comment: &api::Comment) -> bool {
        let Some(viewer) = self.viewer else {
            return false;
        };
        comment.author_id == Some(viewer) || self.post.author_id == viewer
    }

    /// Replying needs an active session.
    pub fn can_reply(&self) -> bool {
        self.viewer.is_some()
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }
}
