use std::rc::Rc;

use tribune_client::{
    api::{self, CommentId, PostId, PostStatus, Session},
    compose_comment, fetch_thread, ThreadDump, ThreadStore, ThreadView,
};
use yew::prelude::*;

use crate::{api::RemoteStore, ui, util};

#[derive(Clone, PartialEq, Properties)]
pub struct ThreadPageProps {
    pub post_id: PostId,
    pub login: Option<Session>,
}

/// Which in-flight mutation a [`ThreadPageMsg::MutationDone`] closes out.
pub enum Mutation {
    Edit(CommentId),
    Reply(Option<CommentId>),
    Delete,
    Anonymity,
}

pub enum ThreadPageMsg {
    Loaded(Box<ThreadDump>),
    LoadFailed(api::Error),
    Profile(Option<api::AuthorProfile>),

    ToggleExpanded(CommentId),

    StartEdit(CommentId),
    EditInput(CommentId, String),
    CancelEdit(CommentId),
    SaveEdit(CommentId),

    OpenReply(CommentId),
    CloseReply(CommentId),
    SubmitReply(Option<CommentId>, String),

    Delete(CommentId),
    SetAnonymity(bool),

    MutationDone(Mutation, Result<(), api::Error>),
}

pub struct ThreadPage {
    thread: Option<Rc<ThreadDump>>,
    view: ThreadView,
    profile: Option<api::AuthorProfile>,
    /// Load failure; the page shows a banner instead of the thread.
    error: Option<String>,
    /// Last mutation failure; the thread stays usable underneath.
    status: Option<String>,
}

impl ThreadPage {
    fn store(ctx: &Context<Self>) -> RemoteStore {
        RemoteStore::new(ctx.props().login.clone())
    }

    fn refresh(&self, ctx: &Context<Self>) {
        let store = Self::store(ctx);
        let id = ctx.props().post_id;
        ctx.link().send_future(async move {
            match fetch_thread(&store, id).await {
                Ok(thread) => ThreadPageMsg::Loaded(Box::new(thread)),
                Err(e) => ThreadPageMsg::LoadFailed(e),
            }
        });
    }

    fn refresh_profile(&self, ctx: &Context<Self>) {
        if ctx.props().login.is_none() {
            return;
        }
        let store = Self::store(ctx);
        ctx.link().send_future(async move {
            match store.author_status().await {
                Ok(profile) => ThreadPageMsg::Profile(profile),
                Err(e) => {
                    tracing::error!("failed to fetch author profile: {:?}", e);
                    ThreadPageMsg::Profile(None)
                }
            }
        });
    }

    fn spawn_mutation<F>(&mut self, ctx: &Context<Self>, mutation: Mutation, run: F) -> bool
    where
        F: std::future::Future<Output = Result<(), api::Error>> + 'static,
    {
        if self.view.is_busy() {
            return false;
        }
        self.view.begin_mutation();
        ctx.link()
            .send_future(async move { ThreadPageMsg::MutationDone(mutation, run.await) });
        true
    }
}

impl Component for ThreadPage {
    type Message = ThreadPageMsg;
    type Properties = ThreadPageProps;

    fn create(ctx: &Context<Self>) -> Self {
        let this = ThreadPage {
            thread: None,
            view: ThreadView::new(),
            profile: None,
            error: None,
            status: None,
        };
        this.refresh(ctx);
        this.refresh_profile(ctx);
        this
    }

    fn changed(&mut self, ctx: &Context<Self>, _old: &Self::Properties) -> bool {
        self.thread = None;
        self.view = ThreadView::new();
        self.refresh(ctx);
        self.refresh_profile(ctx);
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            ThreadPageMsg::Loaded(thread) => {
                self.thread = Some(Rc::new(*thread));
                self.error = None;
            }
            ThreadPageMsg::LoadFailed(e) => {
                self.thread = None;
                self.error = Some(e.to_string());
            }
            ThreadPageMsg::Profile(profile) => self.profile = profile,

            ThreadPageMsg::ToggleExpanded(id) => self.view.toggle_expanded(id),

            ThreadPageMsg::StartEdit(id) => {
                let Some(thread) = &self.thread else {
                    return false;
                };
                let Some(node) = thread.comments.find(id) else {
                    return false;
                };
                self.view.start_edit(id, &node.comment.body);
            }
            ThreadPageMsg::EditInput(id, text) => self.view.set_edit_buffer(id, text),
            ThreadPageMsg::CancelEdit(id) => self.view.cancel_edit(id),
            ThreadPageMsg::SaveEdit(id) => {
                let Some(body) = self.view.edit_buffer(id).map(String::from) else {
                    return false;
                };
                let store = Self::store(ctx);
                return self.spawn_mutation(ctx, Mutation::Edit(id), async move {
                    store.update_comment(id, body).await
                });
            }

            ThreadPageMsg::OpenReply(id) => self.view.open_reply(id),
            ThreadPageMsg::CloseReply(id) => self.view.close_reply(id),
            ThreadPageMsg::SubmitReply(parent, body) => {
                let store = Self::store(ctx);
                let post_id = ctx.props().post_id;
                // the profile is looked up inside the future, at submit time
                return self.spawn_mutation(ctx, Mutation::Reply(parent), async move {
                    let comment = compose_comment(&store, post_id, parent, body).await?;
                    store.add_comment(comment).await.map(|_| ())
                });
            }

            ThreadPageMsg::Delete(id) => {
                if !util::confirm("Delete this comment?") {
                    return false;
                }
                let store = Self::store(ctx);
                return self.spawn_mutation(ctx, Mutation::Delete, async move {
                    store.delete_comment(id).await
                });
            }
            ThreadPageMsg::SetAnonymity(anonymous) => {
                let store = Self::store(ctx);
                return self.spawn_mutation(ctx, Mutation::Anonymity, async move {
                    store.set_anonymity(anonymous).await
                });
            }

            ThreadPageMsg::MutationDone(mutation, result) => {
                self.view.end_mutation();
                match result {
                    Ok(()) => {
                        self.status = None;
                        match mutation {
                            Mutation::Edit(id) => self.view.finish_edit(id),
                            Mutation::Reply(Some(parent)) => {
                                self.view.close_reply(parent);
                                // make the fresh reply visible
                                if !self.view.is_expanded(parent) {
                                    self.view.toggle_expanded(parent);
                                }
                            }
                            Mutation::Reply(None) | Mutation::Delete => (),
                            Mutation::Anonymity => {
                                self.refresh_profile(ctx);
                                return true;
                            }
                        }
                        self.refresh(ctx);
                    }
                    Err(e) => self.status = Some(e.to_string()),
                }
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if let Some(error) = &self.error {
            return html! {<>
                <ui::StatusBanner message={Some(error.clone())} />
                <p>{ "No comments to show." }</p>
            </>};
        }
        let Some(thread) = &self.thread else {
            return html! { <p>{ "Loading..." }</p> };
        };

        let draft = (thread.post.status == PostStatus::Draft)
            .then(|| html! { <span class="badge bg-secondary ms-2">{ "Draft" }</span> });
        let session_panel = match &ctx.props().login {
            None => html! { <p class="text-muted">{ "To comment, please log in." }</p> },
            Some(login) => {
                let anonymity = self.profile.as_ref().map(|profile| {
                    let anonymous = profile.is_anonymous;
                    html! {
                        <label class="form-check-label ms-3">
                            <input
                                type="checkbox"
                                class="form-check-input me-1"
                                checked={anonymous}
                                disabled={self.view.is_busy()}
                                onchange={ctx.link().callback(move |_| {
                                    ThreadPageMsg::SetAnonymity(!anonymous)
                                })}
                            />
                            { "Comment anonymously" }
                        </label>
                    }
                });
                let name = self
                    .profile
                    .as_ref()
                    .and_then(|p| p.display_name.clone())
                    .unwrap_or_else(|| login.email.clone());
                html! {
                    <p class="text-muted">
                        { format!("Commenting as {}", name) }
                        { for anonymity }
                    </p>
                }
            }
        };
        let composer = thread.can_reply().then(|| {
            html! {
                <ui::ReplyComposer
                    busy={self.view.is_busy()}
                    submit_label="Post comment"
                    on_submit={ctx.link().callback(|body| {
                        ThreadPageMsg::SubmitReply(None, body)
                    })}
                />
            }
        });
        let comments = if thread.comment_count() == 0 {
            html! { <p>{ "No comments yet." }</p> }
        } else {
            html! {
                <ui::CommentTree
                    thread={thread.clone()}
                    view={self.view.clone()}
                    on_toggle={ctx.link().callback(ThreadPageMsg::ToggleExpanded)}
                    on_start_edit={ctx.link().callback(ThreadPageMsg::StartEdit)}
                    on_edit_input={ctx.link().callback(|(id, text)| {
                        ThreadPageMsg::EditInput(id, text)
                    })}
                    on_cancel_edit={ctx.link().callback(ThreadPageMsg::CancelEdit)}
                    on_save_edit={ctx.link().callback(ThreadPageMsg::SaveEdit)}
                    on_delete={ctx.link().callback(ThreadPageMsg::Delete)}
                    on_open_reply={ctx.link().callback(ThreadPageMsg::OpenReply)}
                    on_close_reply={ctx.link().callback(ThreadPageMsg::CloseReply)}
                    on_reply={ctx.link().callback(|(parent, body)| {
                        ThreadPageMsg::SubmitReply(Some(parent), body)
                    })}
                />
            }
        };

        html! {<>
            <div class="mb-3">
                <h1>{ &thread.post.title }{ for draft }</h1>
                <div class="text-muted">
                    { util::post_author_label(&thread.post) }
                    { " · " }
                    { util::fmt_date(&thread.post.created_at) }
                </div>
            </div>
            <p>{ &thread.post.body }</p>
            <ui::AttachmentList attachments={thread.attachments.clone()} />
            <hr />
            <h4>{ format!("Comments ({})", thread.comment_count()) }</h4>
            <ui::StatusBanner message={self.status.clone()} />
            { session_panel }
            { for composer }
            { comments }
        </>}
    }
}
