use async_trait::async_trait;

use crate::{
    api::{self, CommentId, Error, ForumSlug, PostId, UserId},
    ThreadDump,
};

/// Filters for thread listings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PostQuery {
    pub forum: Option<ForumSlug>,
    /// Only posts written by this member.
    pub author: Option<UserId>,
    /// Best-effort substring search over title and body.
    pub search: Option<String>,
    pub published_only: bool,
    /// Only posts without any comment.
    pub unanswered_only: bool,
    pub limit: usize,
}

impl Default for PostQuery {
    fn default() -> PostQuery {
        PostQuery {
            forum: None,
            author: None,
            search: None,
            published_only: true,
            unanswered_only: false,
            limit: 50,
        }
    }
}

impl PostQuery {
    pub fn for_forum(slug: ForumSlug) -> PostQuery {
        PostQuery {
            forum: Some(slug),
            ..PostQuery::default()
        }
    }

    /// Everything a member wrote, drafts included. Whether another viewer
    /// actually gets the drafts is the store's visibility rule, not ours.
    pub fn authored_by(user: UserId) -> PostQuery {
        PostQuery {
            author: Some(user),
            published_only: false,
            ..PostQuery::default()
        }
    }
}

/// The boundary to the hosted backend. All persistence, authorization and
/// query execution happen on the other side of this trait; the client only
/// refetches and rebuilds. Implemented over REST by `tribune-web` and
/// in-memory by `tribune-mock-server`.
#[async_trait(?Send)]
pub trait ThreadStore {
    /// Identity behind the active session, or `None` when logged out.
    async fn whoami(&self) -> Result<Option<api::UserId>, Error>;

    async fn get_post(&self, id: PostId) -> Result<api::Post, Error>;
    async fn list_posts(&self, query: &PostQuery) -> Result<Vec<api::Post>, Error>;
    /// Publishing is reserved to approved authors; the store enforces it.
    async fn create_post(&self, post: api::NewPost) -> Result<PostId, Error>;
    async fn forum_counts(&self, slug: &ForumSlug) -> Result<api::ForumCounts, Error>;

    /// All comments for a post, ascending creation order.
    async fn list_comments(&self, post: PostId) -> Result<Vec<api::Comment>, Error>;
    async fn add_comment(&self, comment: api::NewComment) -> Result<CommentId, Error>;
    async fn update_comment(&self, id: CommentId, body: String) -> Result<(), Error>;
    async fn delete_comment(&self, id: CommentId) -> Result<(), Error>;

    async fn list_attachments(&self, post: PostId) -> Result<Vec<api::Attachment>, Error>;

    async fn author_status(&self) -> Result<Option<api::AuthorProfile>, Error>;
    async fn set_anonymity(&self, anonymous: bool) -> Result<(), Error>;
}

/// The refetch-and-rebuild step behind which every mutation hides: fetch the
/// post, its comments and attachments, and build a fresh [`ThreadDump`].
/// Draft posts are only handed to their author.
pub async fn fetch_thread<S: ThreadStore + ?Sized>(
    store: &S,
    id: PostId,
) -> Result<ThreadDump, Error> {
    let viewer = store.whoami().await?;
    let post = store.get_post(id).await?;
    if !post.visible_to(viewer) {
        return Err(Error::PostNotPublished);
    }
    let comments = store.list_comments(id).await?;
    let attachments = store.list_attachments(id).await?;
    Ok(ThreadDump::new(viewer, post, comments, attachments))
}

/// Builds a comment submission from the author's stored profile, looked up
/// at submit time so the display name and anonymity preference are current
/// even when the UI has not finished loading them.
pub async fn compose_comment<S: ThreadStore + ?Sized>(
    store: &S,
    post: PostId,
    parent: Option<CommentId>,
    body: String,
) -> Result<api::NewComment, Error> {
    let author_id = store.whoami().await?;
    let profile = store.author_status().await?;
    Ok(api::NewComment {
        post_id: post,
        parent_id: parent,
        body,
        display_name: profile.as_ref().and_then(|p| p.display_name.clone()),
        is_anonymous: profile.as_ref().map(|p| p.is_anonymous).unwrap_or(false),
        author_id,
    })
}
