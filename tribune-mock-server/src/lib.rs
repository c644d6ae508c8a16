use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
    rc::Rc,
};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use tribune_client::{
    api::{
        self, AuthToken, AuthorProfile, Comment, CommentId, Error, ForumCounts, ForumSlug,
        NewComment, NewPost, NewSession, Post, PostId, PostStatus, Time, UserId, Uuid,
    },
    PostQuery, ThreadStore,
};

/// In-memory stand-in for the hosted backend: accounts, sessions, posts,
/// comments and the row-level permission checks the real service enforces.
/// Timestamps come from a deterministic clock so listing order is stable in
/// tests.
pub struct MockServer {
    users: BTreeMap<UserId, DbUser>,
    posts: BTreeMap<PostId, Post>,
    // insertion order doubles as ascending creation order
    comments: Vec<Comment>,
    attachments: Vec<api::Attachment>,
    clock: i64,
}

#[derive(Debug)]
struct DbUser {
    // uid is in profile.user_id
    email: String,
    pass: String,
    profile: AuthorProfile,
    sessions: HashMap<AuthToken, Device>,
}

#[derive(Debug)]
struct Device(String);

impl MockServer {
    pub fn new() -> MockServer {
        MockServer {
            users: BTreeMap::new(),
            posts: BTreeMap::new(),
            comments: Vec::new(),
            attachments: Vec::new(),
            clock: 0,
        }
    }

    fn tick(&mut self) -> Time {
        self.clock += 1;
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(self.clock)
    }

    pub fn admin_create_user(
        &mut self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> UserId {
        let id = UserId(Uuid::new_v4());
        let mut profile = AuthorProfile::stub(id);
        profile.email = Some(String::from(email));
        profile.display_name = Some(String::from(display_name));
        self.users.insert(
            id,
            DbUser {
                email: String::from(email),
                pass: String::from(password),
                profile,
                sessions: HashMap::new(),
            },
        );
        id
    }

    /// Flips the author-approval bit admins normally set through the
    /// backend dashboard.
    pub fn admin_approve_author(&mut self, id: UserId) {
        if let Some(u) = self.users.get_mut(&id) {
            u.profile.approved = true;
        }
    }

    pub fn auth(&mut self, s: NewSession) -> Result<AuthToken, Error> {
        s.validate()?;
        for u in self.users.values_mut() {
            if u.email == s.email {
                if s.password != u.pass {
                    return Err(Error::PermissionDenied);
                }
                let tok = AuthToken(Uuid::new_v4());
                u.sessions.insert(tok, Device(String::from("tests")));
                return Ok(tok);
            }
        }
        Err(Error::PermissionDenied)
    }

    pub fn unauth(&mut self, tok: AuthToken) -> Result<(), Error> {
        let u = self.resolve_mut(tok)?;
        u.sessions.remove(&tok);
        Ok(())
    }

    fn resolve(&self, tok: AuthToken) -> Result<&DbUser, Error> {
        for u in self.users.values() {
            if u.sessions.contains_key(&tok) {
                return Ok(u);
            }
        }
        Err(Error::PermissionDenied)
    }

    fn resolve_mut(&mut self, tok: AuthToken) -> Result<&mut DbUser, Error> {
        for u in self.users.values_mut() {
            if u.sessions.contains_key(&tok) {
                return Ok(u);
            }
        }
        Err(Error::PermissionDenied)
    }

    pub fn whoami(&self, tok: AuthToken) -> Result<UserId, Error> {
        Ok(self.resolve(tok)?.profile.user_id)
    }

    pub fn author_status(&self, tok: AuthToken) -> Result<AuthorProfile, Error> {
        Ok(self.resolve(tok)?.profile.clone())
    }

    pub fn set_anonymity(&mut self, tok: AuthToken, anonymous: bool) -> Result<(), Error> {
        self.resolve_mut(tok)?.profile.is_anonymous = anonymous;
        Ok(())
    }

    /// Publishing is reserved to approved authors, mirroring the backend's
    /// row policy on the posts table.
    pub fn create_post(&mut self, tok: AuthToken, p: NewPost) -> Result<PostId, Error> {
        p.validate()?;
        let date = self.tick();
        let u = self.resolve(tok)?;
        if !u.profile.approved {
            return Err(Error::PermissionDenied);
        }
        let author_display = match p.is_anonymous {
            true => None,
            false => u.profile.display_name.clone(),
        };
        let id = PostId(Uuid::new_v4());
        let post = Post {
            id,
            forum_slug: p.forum_slug,
            title: p.title,
            body: p.body,
            status: p.status,
            author_id: u.profile.user_id,
            author_display,
            is_anonymous: p.is_anonymous,
            created_at: date,
        };
        self.posts.insert(id, post);
        Ok(id)
    }

    pub fn get_post(&self, id: PostId) -> Result<Post, Error> {
        self.posts.get(&id).cloned().ok_or(Error::NotFound)
    }

    /// Newest first, like the hosted listing endpoint.
    pub fn list_posts(&self, tok: Option<AuthToken>, q: &PostQuery) -> Result<Vec<Post>, Error> {
        let viewer = match tok {
            Some(tok) => Some(self.whoami(tok)?),
            None => None,
        };
        let mut posts: Vec<Post> = self
            .posts
            .values()
            .filter(|p| match q.published_only {
                true => p.status == PostStatus::Published,
                false => p.visible_to(viewer),
            })
            .filter(|p| q.forum.as_ref().map_or(true, |f| p.forum_slug == *f))
            .filter(|p| q.author.as_ref().map_or(true, |a| p.author_id == *a))
            .filter(|p| {
                q.search.as_ref().map_or(true, |s| {
                    let s = s.to_lowercase();
                    p.title.to_lowercase().contains(&s) || p.body.to_lowercase().contains(&s)
                })
            })
            .filter(|p| {
                !q.unanswered_only || !self.comments.iter().any(|c| c.post_id == p.id)
            })
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts.truncate(q.limit);
        Ok(posts)
    }

    pub fn forum_counts(&self, slug: &ForumSlug) -> ForumCounts {
        let threads: Vec<PostId> = self
            .posts
            .values()
            .filter(|p| p.forum_slug == *slug && p.status == PostStatus::Published)
            .map(|p| p.id)
            .collect();
        let comments = self
            .comments
            .iter()
            .filter(|c| threads.contains(&c.post_id))
            .count();
        ForumCounts {
            threads: threads.len(),
            posts: threads.len() + comments,
        }
    }

    pub fn list_comments(&self, post: PostId) -> Result<Vec<Comment>, Error> {
        if !self.posts.contains_key(&post) {
            return Err(Error::NotFound);
        }
        Ok(self
            .comments
            .iter()
            .filter(|c| c.post_id == post)
            .cloned()
            .collect())
    }

    /// Any authenticated user may comment; the session identity overrides
    /// whatever `author_id` the client sent.
    pub fn add_comment(&mut self, tok: AuthToken, c: NewComment) -> Result<CommentId, Error> {
        c.validate()?;
        let date = self.tick();
        let author = self.resolve(tok)?.profile.user_id;
        if !self.posts.contains_key(&c.post_id) {
            return Err(Error::NotFound);
        }
        let id = CommentId(Uuid::new_v4());
        self.comments.push(Comment {
            id,
            post_id: c.post_id,
            parent_id: c.parent_id,
            body: c.body,
            display_name: c.display_name,
            is_anonymous: c.is_anonymous,
            author_id: Some(author),
            created_at: date,
        });
        Ok(id)
    }

    fn check_can_manage(&self, tok: AuthToken, comment: CommentId) -> Result<usize, Error> {
        let viewer = self.resolve(tok)?.profile.user_id;
        let idx = self
            .comments
            .iter()
            .position(|c| c.id == comment)
            .ok_or(Error::NotFound)?;
        let c = &self.comments[idx];
        let post_owner = self.posts.get(&c.post_id).map(|p| p.author_id);
        if c.author_id == Some(viewer) || post_owner == Some(viewer) {
            Ok(idx)
        } else {
            Err(Error::PermissionDenied)
        }
    }

    pub fn update_comment(
        &mut self,
        tok: AuthToken,
        id: CommentId,
        body: String,
    ) -> Result<(), Error> {
        if body.trim().is_empty() {
            return Err(Error::EmptyCommentBody);
        }
        api::validate_string(&body)?;
        let idx = self.check_can_manage(tok, id)?;
        self.comments[idx].body = body;
        Ok(())
    }

    pub fn delete_comment(&mut self, tok: AuthToken, id: CommentId) -> Result<(), Error> {
        let idx = self.check_can_manage(tok, id)?;
        self.comments.remove(idx);
        Ok(())
    }

    pub fn list_attachments(&self, post: PostId) -> Result<Vec<api::Attachment>, Error> {
        if !self.posts.contains_key(&post) {
            return Err(Error::NotFound);
        }
        Ok(self
            .attachments
            .iter()
            .filter(|a| a.post_id == post)
            .cloned()
            .collect())
    }

    /// Upload mechanics live outside this crate; tests seed records
    /// directly.
    pub fn admin_add_attachment(&mut self, post: PostId, original_name: &str, mime: Option<&str>) {
        let date = self.tick();
        self.attachments.push(api::Attachment {
            id: api::AttachmentId(Uuid::new_v4()),
            post_id: post,
            bucket: String::from("uploads"),
            object_path: format!("{}/{}", post.0, original_name),
            original_name: String::from(original_name),
            mime_type: mime.map(String::from),
            created_at: date,
        });
    }
}

impl Default for MockServer {
    fn default() -> MockServer {
        MockServer::new()
    }
}

/// A client-side handle onto the mock: one (optional) session over the
/// shared server, usable wherever a [`ThreadStore`] is expected.
#[derive(Clone)]
pub struct MockSession {
    server: Rc<RefCell<MockServer>>,
    token: Option<AuthToken>,
}

impl MockSession {
    pub fn shared(server: MockServer) -> Rc<RefCell<MockServer>> {
        Rc::new(RefCell::new(server))
    }

    pub fn logged_out(server: &Rc<RefCell<MockServer>>) -> MockSession {
        MockSession {
            server: server.clone(),
            token: None,
        }
    }

    pub fn login(
        server: &Rc<RefCell<MockServer>>,
        email: &str,
        password: &str,
    ) -> Result<MockSession, Error> {
        let token = server.borrow_mut().auth(NewSession {
            email: String::from(email),
            password: String::from(password),
        })?;
        Ok(MockSession {
            server: server.clone(),
            token: Some(token),
        })
    }

    fn token(&self) -> Result<AuthToken, Error> {
        self.token.ok_or(Error::PermissionDenied)
    }
}

#[async_trait(?Send)]
impl ThreadStore for MockSession {
    async fn whoami(&self) -> Result<Option<UserId>, Error> {
        match self.token {
            Some(tok) => Ok(Some(self.server.borrow().whoami(tok)?)),
            None => Ok(None),
        }
    }

    async fn get_post(&self, id: PostId) -> Result<Post, Error> {
        self.server.borrow().get_post(id)
    }

    async fn list_posts(&self, query: &PostQuery) -> Result<Vec<Post>, Error> {
        self.server.borrow().list_posts(self.token, query)
    }

    async fn create_post(&self, post: NewPost) -> Result<PostId, Error> {
        self.server.borrow_mut().create_post(self.token()?, post)
    }

    async fn forum_counts(&self, slug: &ForumSlug) -> Result<ForumCounts, Error> {
        Ok(self.server.borrow().forum_counts(slug))
    }

    async fn list_comments(&self, post: PostId) -> Result<Vec<Comment>, Error> {
        self.server.borrow().list_comments(post)
    }

    async fn add_comment(&self, comment: NewComment) -> Result<CommentId, Error> {
        self.server.borrow_mut().add_comment(self.token()?, comment)
    }

    async fn update_comment(&self, id: CommentId, body: String) -> Result<(), Error> {
        self.server.borrow_mut().update_comment(self.token()?, id, body)
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), Error> {
        self.server.borrow_mut().delete_comment(self.token()?, id)
    }

    async fn list_attachments(&self, post: PostId) -> Result<Vec<api::Attachment>, Error> {
        self.server.borrow().list_attachments(post)
    }

    async fn author_status(&self) -> Result<Option<AuthorProfile>, Error> {
        match self.token {
            Some(tok) => Ok(Some(self.server.borrow().author_status(tok)?)),
            None => Ok(None),
        }
    }

    async fn set_anonymity(&self, anonymous: bool) -> Result<(), Error> {
        self.server.borrow_mut().set_anonymity(self.token()?, anonymous)
    }
}
