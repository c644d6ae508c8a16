use tribune_client::{
    api::{self, ForumSlug, NewPost, PostId, PostStatus, Session},
    ThreadStore,
};
use yew::prelude::*;

use crate::{api::RemoteStore, ui};

#[derive(Clone, PartialEq, Properties)]
pub struct ComposePageProps {
    pub login: Option<Session>,
}

pub enum ComposePageMsg {
    Profile(Option<api::AuthorProfile>),
    ForumChanged(String),
    TitleChanged(String),
    BodyChanged(String),
    ToggleAnonymous,
    Submit(PostStatus),
    Saved(PostId, PostStatus),
    SaveFailed(api::Error),
}

/// Thread composer. Only approved authors get the form; everyone else is
/// told why not instead of hitting the backend's row policy blind.
pub struct ComposePage {
    profile: Option<api::AuthorProfile>,
    profile_loaded: bool,
    forum: ForumSlug,
    title: String,
    body: String,
    anonymous: bool,
    busy: bool,
    saved: Option<(PostId, PostStatus)>,
    error: Option<String>,
}

impl ComposePage {
    fn store(ctx: &Context<Self>) -> RemoteStore {
        RemoteStore::new(ctx.props().login.clone())
    }

    fn approved(&self) -> bool {
        self.profile.as_ref().map(|p| p.approved).unwrap_or(false)
    }
}

impl Component for ComposePage {
    type Message = ComposePageMsg;
    type Properties = ComposePageProps;

    fn create(ctx: &Context<Self>) -> Self {
        let this = ComposePage {
            profile: None,
            profile_loaded: false,
            forum: ForumSlug::from("general-topics"),
            title: String::new(),
            body: String::new(),
            anonymous: false,
            busy: false,
            saved: None,
            error: None,
        };
        if ctx.props().login.is_some() {
            let store = Self::store(ctx);
            ctx.link().send_future(async move {
                match store.author_status().await {
                    Ok(profile) => ComposePageMsg::Profile(profile),
                    Err(e) => {
                        tracing::error!("failed to fetch author profile: {:?}", e);
                        ComposePageMsg::Profile(None)
                    }
                }
            });
        }
        this
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            ComposePageMsg::Profile(profile) => {
                self.anonymous = profile.as_ref().map(|p| p.is_anonymous).unwrap_or(false);
                self.profile = profile;
                self.profile_loaded = true;
            }
            ComposePageMsg::ForumChanged(slug) => self.forum = ForumSlug(slug),
            ComposePageMsg::TitleChanged(title) => self.title = title,
            ComposePageMsg::BodyChanged(body) => self.body = body,
            ComposePageMsg::ToggleAnonymous => self.anonymous = !self.anonymous,
            ComposePageMsg::Submit(status) => {
                if self.busy {
                    return false;
                }
                self.busy = true;
                self.error = None;
                let store = Self::store(ctx);
                let post = NewPost {
                    forum_slug: self.forum.clone(),
                    title: self.title.clone(),
                    body: self.body.clone(),
                    status,
                    is_anonymous: self.anonymous,
                };
                ctx.link().send_future(async move {
                    match store.create_post(post).await {
                        Ok(id) => ComposePageMsg::Saved(id, status),
                        Err(e) => ComposePageMsg::SaveFailed(e),
                    }
                });
            }
            ComposePageMsg::Saved(id, status) => {
                self.busy = false;
                self.saved = Some((id, status));
            }
            ComposePageMsg::SaveFailed(e) => {
                self.busy = false;
                self.error = Some(e.to_string());
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if ctx.props().login.is_none() {
            return html! { <p class="text-muted">{ "To start a thread, please log in." }</p> };
        }
        if !self.profile_loaded {
            return html! { <p>{ "Loading..." }</p> };
        }
        if !self.approved() {
            return html! {
                <p class="text-muted">
                    { "Your account is not yet approved for publishing. \
                       An administrator has to enable it first." }
                </p>
            };
        }
        if let Some((id, status)) = &self.saved {
            let link = match status {
                PostStatus::Published => html! {
                    <a href={format!("?post={}", id.0)}>{ "View your thread" }</a>
                },
                PostStatus::Draft => html! {
                    <a href="?yours">{ "Find it under your threads" }</a>
                },
            };
            return html! {
                <div class="alert alert-success">
                    { match status {
                        PostStatus::Published => "Thread published. ",
                        PostStatus::Draft => "Draft saved. ",
                    }}
                    { link }
                </div>
            };
        }

        html! {<>
            <h1>{ "Start a thread" }</h1>
            <ui::StatusBanner message={self.error.clone()} />
            <form>
                <div class="input-group mb-3">
                    <label class="input-group-text" for="forum">{ "Forum" }</label>
                    <select
                        class="form-select"
                        id="forum"
                        onchange={ctx.link().callback(|e: web_sys::Event| {
                            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
                            ComposePageMsg::ForumChanged(select.value())
                        })}
                    >
                        { for api::Forum::known().into_iter().map(|f| html! {
                            <option
                                value={f.slug.0.clone()}
                                selected={f.slug == self.forum}
                            >
                                { f.title }
                            </option>
                        })}
                    </select>
                </div>
                <div class="mb-3">
                    <input
                        type="text"
                        class="form-control"
                        placeholder="Title"
                        value={self.title.clone()}
                        onchange={ctx.link().callback(|e: web_sys::Event| {
                            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                            ComposePageMsg::TitleChanged(input.value())
                        })}
                    />
                </div>
                <div class="mb-3">
                    <textarea
                        class="form-control"
                        rows="8"
                        placeholder="Write your post"
                        value={self.body.clone()}
                        onchange={ctx.link().callback(|e: web_sys::Event| {
                            let input: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
                            ComposePageMsg::BodyChanged(input.value())
                        })}
                    />
                </div>
                <label class="form-check-label mb-3">
                    <input
                        type="checkbox"
                        class="form-check-input me-1"
                        checked={self.anonymous}
                        onchange={ctx.link().callback(|_| ComposePageMsg::ToggleAnonymous)}
                    />
                    { "Post anonymously" }
                </label>
                <div>
                    <button
                        type="button"
                        class="btn btn-primary me-2"
                        disabled={self.busy}
                        onclick={ctx.link().callback(|_| {
                            ComposePageMsg::Submit(PostStatus::Published)
                        })}
                    >
                        { "Publish" }
                    </button>
                    <button
                        type="button"
                        class="btn btn-outline-secondary"
                        disabled={self.busy}
                        onclick={ctx.link().callback(|_| {
                            ComposePageMsg::Submit(PostStatus::Draft)
                        })}
                    >
                        { "Save draft" }
                    </button>
                </div>
            </form>
        </>}
    }
}
