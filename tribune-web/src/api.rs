use std::collections::HashSet;

use async_trait::async_trait;
use futures::{pin_mut, select, FutureExt};
use serde::de::DeserializeOwned;
use tribune_client::{
    api::{self, AuthToken, CommentId, Error, ForumCounts, ForumSlug, PostId, Session, UserId},
    PostQuery, ThreadStore,
};

use crate::config;

const POST_COLS: &str =
    "id,forum_slug,title,body,status,author_id,author_display,is_anonymous,created_at";
const COMMENT_COLS: &str =
    "id,post_id,parent_id,body,display_name,is_anonymous,author_id,created_at";
const ATTACHMENT_COLS: &str =
    "id,post_id,bucket,object_path,original_name,mime_type,created_at";

fn connection(e: reqwest::Error) -> Error {
    Error::Connection(e.to_string())
}

fn bad_payload(e: impl std::fmt::Display) -> Error {
    Error::Unknown(format!("unparseable backend response: {}", e))
}

pub async fn auth(session: api::NewSession) -> Result<Session, Error> {
    session.validate()?;
    let resp = crate::CLIENT
        .post(format!(
            "{}/auth/v1/token?grant_type=password",
            config::BACKEND_URL
        ))
        .header("apikey", config::BACKEND_ANON_KEY)
        .json(&session)
        .send()
        .await
        .map_err(connection)?;
    let status = resp.status().as_u16();
    let body = resp.bytes().await.map_err(connection)?;
    if !(200..300).contains(&status) {
        return Err(Error::from_backend(status, &body));
    }
    let data: serde_json::Value = serde_json::from_slice(&body).map_err(bad_payload)?;
    let token = data
        .get("access_token")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| bad_payload("token grant without an access_token"))?;
    let user = data
        .pointer("/user/id")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| bad_payload("token grant without a user id"))?;
    Ok(Session {
        token: AuthToken(token),
        user_id: UserId(user),
        email: session.email,
    })
}

/// Best-effort: the local session is dropped regardless of what the backend
/// answers.
pub async fn unauth(token: AuthToken) {
    let resp = crate::CLIENT
        .post(format!("{}/auth/v1/logout", config::BACKEND_URL))
        .header("apikey", config::BACKEND_ANON_KEY)
        .bearer_auth(token.0)
        .send()
        .await;
    match resp {
        Err(e) => tracing::error!("failed to unauth: {:?}", e),
        Ok(resp) if !resp.status().is_success() => {
            tracing::error!("failed to unauth: response is not success {:?}", resp)
        }
        Ok(_) => (),
    }
}

/// [`ThreadStore`] over the hosted backend's REST surface. Reads go straight
/// through; writes run under [`config::MUTATION_TIMEOUT_SECS`], and it is the
/// backend's row-level policies that have the final say on permissions.
pub struct RemoteStore {
    login: Option<Session>,
}

impl RemoteStore {
    pub fn new(login: Option<Session>) -> RemoteStore {
        RemoteStore { login }
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let req = req.header("apikey", config::BACKEND_ANON_KEY);
        match &self.login {
            Some(l) => req.bearer_auth(l.token.0),
            None => req,
        }
    }

    async fn fetch_rows<R: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<Vec<R>, Error> {
        let resp = self.authed(req).send().await.map_err(connection)?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(connection)?;
        if !(200..300).contains(&status) {
            return Err(Error::from_backend(status, &body));
        }
        serde_json::from_slice(&body).map_err(bad_payload)
    }

    async fn rows<R: DeserializeOwned>(&self, query: String) -> Result<Vec<R>, Error> {
        self.fetch_rows(
            crate::CLIENT.get(format!("{}/rest/v1/{}", config::BACKEND_URL, query)),
        )
        .await
    }

    /// Listing request for [`ThreadStore::list_posts`]. Fixed filters are part
    /// of the path; the free-text search goes through `query()` so the user's
    /// input cannot break out of the `or=` filter.
    fn posts_request(&self, query: &PostQuery) -> reqwest::RequestBuilder {
        let mut q = format!(
            "posts?select={}&order=created_at.desc&limit={}",
            POST_COLS, query.limit
        );
        if let Some(forum) = &query.forum {
            q.push_str(&format!("&forum_slug=eq.{}", forum));
        }
        if let Some(author) = &query.author {
            q.push_str(&format!("&author_id=eq.{}", author.0));
        }
        if query.published_only {
            q.push_str("&status=eq.published");
        }
        let req = crate::CLIENT.get(format!("{}/rest/v1/{}", config::BACKEND_URL, q));
        match &query.search {
            Some(s) => req.query(&[("or", format!("(title.ilike.*{0}*,body.ilike.*{0}*)", s))]),
            None => req,
        }
    }

    async fn mutate(&self, req: reqwest::RequestBuilder) -> Result<Vec<u8>, Error> {
        let run = async {
            let resp = self.authed(req).send().await.map_err(connection)?;
            let status = resp.status().as_u16();
            let body = resp.bytes().await.map_err(connection)?;
            if !(200..300).contains(&status) {
                return Err(Error::from_backend(status, &body));
            }
            Ok(body.to_vec())
        }
        .fuse();
        let timeout = wasm_timer::Delay::new(std::time::Duration::from_secs(
            config::MUTATION_TIMEOUT_SECS,
        ))
        .fuse();
        pin_mut!(run, timeout);
        select! {
            r = run => r,
            _ = timeout => Err(Error::TimedOut),
        }
    }
}

#[derive(serde::Deserialize)]
struct PostIdRow {
    post_id: PostId,
}

#[async_trait(?Send)]
impl ThreadStore for RemoteStore {
    async fn whoami(&self) -> Result<Option<UserId>, Error> {
        Ok(self.login.as_ref().map(|l| l.user_id))
    }

    async fn get_post(&self, id: PostId) -> Result<api::Post, Error> {
        let rows: Vec<api::Post> = self
            .rows(format!("posts?select={}&id=eq.{}", POST_COLS, id.0))
            .await?;
        rows.into_iter().next().ok_or(Error::NotFound)
    }

    async fn list_posts(&self, query: &PostQuery) -> Result<Vec<api::Post>, Error> {
        let posts: Vec<api::Post> = self.fetch_rows(self.posts_request(query)).await?;
        if !query.unanswered_only || posts.is_empty() {
            return Ok(posts);
        }
        // The backend has no "has no comments" filter, so fetch which of
        // these posts were commented on and subtract.
        let ids = posts
            .iter()
            .map(|p| p.id.0.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let commented: Vec<PostIdRow> = self
            .rows(format!("comments?select=post_id&post_id=in.({})", ids))
            .await?;
        let commented: HashSet<PostId> = commented.into_iter().map(|r| r.post_id).collect();
        Ok(posts
            .into_iter()
            .filter(|p| !commented.contains(&p.id))
            .collect())
    }

    async fn forum_counts(&self, slug: &ForumSlug) -> Result<ForumCounts, Error> {
        #[derive(serde::Deserialize)]
        struct IdRow {
            id: PostId,
        }
        let threads: Vec<IdRow> = self
            .rows(format!(
                "posts?select=id&forum_slug=eq.{}&status=eq.published",
                slug
            ))
            .await?;
        if threads.is_empty() {
            return Ok(ForumCounts::default());
        }
        let ids = threads
            .iter()
            .map(|r| r.id.0.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let comments: Vec<PostIdRow> = self
            .rows(format!("comments?select=post_id&post_id=in.({})", ids))
            .await?;
        Ok(ForumCounts {
            threads: threads.len(),
            posts: threads.len() + comments.len(),
        })
    }

    async fn list_comments(&self, post: PostId) -> Result<Vec<api::Comment>, Error> {
        self.rows(format!(
            "comments?select={}&post_id=eq.{}&order=created_at.asc",
            COMMENT_COLS, post.0
        ))
        .await
    }

    async fn create_post(&self, post: api::NewPost) -> Result<PostId, Error> {
        post.validate()?;
        let body = self
            .mutate(
                crate::CLIENT
                    .post(format!("{}/rest/v1/posts?select=id", config::BACKEND_URL))
                    .header("Prefer", "return=representation")
                    .json(&post),
            )
            .await?;
        #[derive(serde::Deserialize)]
        struct Created {
            id: PostId,
        }
        let mut created: Vec<Created> = serde_json::from_slice(&body).map_err(bad_payload)?;
        created
            .pop()
            .map(|c| c.id)
            .ok_or_else(|| bad_payload("insert returned no row"))
    }

    async fn add_comment(&self, comment: api::NewComment) -> Result<CommentId, Error> {
        comment.validate()?;
        let body = self
            .mutate(
                crate::CLIENT
                    .post(format!("{}/rest/v1/comments?select=id", config::BACKEND_URL))
                    .header("Prefer", "return=representation")
                    .json(&comment),
            )
            .await?;
        #[derive(serde::Deserialize)]
        struct Created {
            id: CommentId,
        }
        let mut created: Vec<Created> = serde_json::from_slice(&body).map_err(bad_payload)?;
        created
            .pop()
            .map(|c| c.id)
            .ok_or_else(|| bad_payload("insert returned no row"))
    }

    async fn update_comment(&self, id: CommentId, body: String) -> Result<(), Error> {
        if body.trim().is_empty() {
            return Err(Error::EmptyCommentBody);
        }
        api::validate_string(&body)?;
        self.mutate(
            crate::CLIENT
                .patch(format!(
                    "{}/rest/v1/comments?id=eq.{}",
                    config::BACKEND_URL,
                    id.0
                ))
                .json(&serde_json::json!({ "body": body })),
        )
        .await
        .map(|_| ())
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), Error> {
        self.mutate(crate::CLIENT.delete(format!(
            "{}/rest/v1/comments?id=eq.{}",
            config::BACKEND_URL,
            id.0
        )))
        .await
        .map(|_| ())
    }

    async fn list_attachments(&self, post: PostId) -> Result<Vec<api::Attachment>, Error> {
        self.rows(format!(
            "post_files?select={}&post_id=eq.{}&order=created_at.asc",
            ATTACHMENT_COLS, post.0
        ))
        .await
    }

    async fn author_status(&self) -> Result<Option<api::AuthorProfile>, Error> {
        let Some(login) = &self.login else {
            return Ok(None);
        };
        // select=* on purpose: legacy author rows carry historical column
        // names, and from_row is the one place that resolves them.
        let rows: Vec<serde_json::Value> = self
            .rows(format!("authors?select=*&user_id=eq.{}", login.user_id.0))
            .await?;
        match rows.first() {
            Some(row) => Ok(Some(
                api::AuthorProfile::from_row(row).map_err(|e| bad_payload(format!("{:#}", e)))?,
            )),
            None => Ok(None),
        }
    }

    async fn set_anonymity(&self, anonymous: bool) -> Result<(), Error> {
        let Some(login) = &self.login else {
            return Err(Error::PermissionDenied);
        };
        self.mutate(
            crate::CLIENT
                .patch(format!(
                    "{}/rest/v1/authors?user_id=eq.{}",
                    config::BACKEND_URL,
                    login.user_id.0
                ))
                .json(&serde_json::json!({ "is_anonymous": anonymous })),
        )
        .await
        .map(|_| ())
    }
}
