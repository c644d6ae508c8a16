use uuid::Uuid;

use crate::{Error, ForumSlug, Time, UserId, STUB_UUID};

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
pub struct PostId(pub Uuid);

impl PostId {
    pub fn stub() -> PostId {
        PostId(STUB_UUID)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Post {
    pub id: PostId,
    pub forum_slug: ForumSlug,

    pub title: String,
    pub body: String,
    pub status: PostStatus,

    pub author_id: UserId,
    /// Denormalized label kept in sync by a backend RPC; `None` renders as
    /// an empty author span.
    pub author_display: Option<String>,
    pub is_anonymous: bool,

    pub created_at: Time,
}

impl Post {
    /// Drafts are only visible to their author.
    pub fn visible_to(&self, viewer: Option<UserId>) -> bool {
        match self.status {
            PostStatus::Published => true,
            PostStatus::Draft => viewer == Some(self.author_id),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewPost {
    pub forum_slug: ForumSlug,
    pub title: String,
    pub body: String,
    pub status: PostStatus,
    pub is_anonymous: bool,
}

impl NewPost {
    // See comments on other `validate` functions throughout tribune-api
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() || self.body.trim().is_empty() {
            return Err(Error::EmptyPostField);
        }
        crate::validate_string(&self.title)?;
        crate::validate_string(&self.body)?;
        crate::validate_string(&self.forum_slug.0)?;
        Ok(())
    }
}
