use uuid::Uuid;

use crate::{Error, PostId, Time, UserId, STUB_UUID};

/// Label shown instead of the stored display name whenever a comment was
/// posted with anonymity on.
pub const ANONYMOUS_LABEL: &str = "Chose Anonymity";

/// Label shown when a comment carries no display name at all (legacy rows).
pub const FALLBACK_LABEL: &str = "Member";

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
pub struct CommentId(pub Uuid);

impl CommentId {
    pub fn stub() -> CommentId {
        CommentId(STUB_UUID)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,

    /// `None` marks a top-level comment on the post.
    pub parent_id: Option<CommentId>,

    pub body: String,
    pub display_name: Option<String>,
    pub is_anonymous: bool,

    /// Absent for anonymous or legacy rows.
    pub author_id: Option<UserId>,

    /// The fetch layer delivers comments in ascending `created_at` order.
    pub created_at: Time,
}

impl Comment {
    /// Resolves the author label shown next to the comment. Anonymity wins
    /// over any stored display name.
    pub fn author_label(&self) -> &str {
        if self.is_anonymous {
            return ANONYMOUS_LABEL;
        }
        match &self.display_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => FALLBACK_LABEL,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    pub post_id: PostId,
    pub parent_id: Option<CommentId>,
    pub body: String,
    pub display_name: Option<String>,
    pub is_anonymous: bool,
    pub author_id: Option<UserId>,
}

impl NewComment {
    // See comments on other `validate` functions throughout tribune-api
    pub fn validate(&self) -> Result<(), Error> {
        if self.body.trim().is_empty() {
            return Err(Error::EmptyCommentBody);
        }
        crate::validate_string(&self.body)?;
        if let Some(name) = &self.display_name {
            crate::validate_string(name)?;
        }
        Ok(())
    }
}
