use tribune_client::{
    api::{self, PostStatus, Session},
    PostQuery, ThreadStore,
};
use yew::prelude::*;

use crate::{api::RemoteStore, ui, util};

#[derive(Clone, PartialEq, Properties)]
pub struct YourThreadsPageProps {
    pub login: Option<Session>,
}

pub enum YourThreadsPageMsg {
    Loaded(Vec<api::Post>),
    LoadFailed(api::Error),
}

/// Everything the logged-in member wrote, drafts included.
pub struct YourThreadsPage {
    posts: Option<Vec<api::Post>>,
    error: Option<String>,
}

impl YourThreadsPage {
    fn reload(&self, ctx: &Context<Self>) {
        let Some(login) = &ctx.props().login else {
            return;
        };
        let store = RemoteStore::new(ctx.props().login.clone());
        let query = PostQuery::authored_by(login.user_id);
        ctx.link().send_future(async move {
            match store.list_posts(&query).await {
                Ok(posts) => YourThreadsPageMsg::Loaded(posts),
                Err(e) => YourThreadsPageMsg::LoadFailed(e),
            }
        });
    }
}

impl Component for YourThreadsPage {
    type Message = YourThreadsPageMsg;
    type Properties = YourThreadsPageProps;

    fn create(ctx: &Context<Self>) -> Self {
        let this = YourThreadsPage {
            posts: None,
            error: None,
        };
        this.reload(ctx);
        this
    }

    fn changed(&mut self, ctx: &Context<Self>, _old: &Self::Properties) -> bool {
        self.posts = None;
        self.reload(ctx);
        true
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            YourThreadsPageMsg::Loaded(posts) => {
                self.posts = Some(posts);
                self.error = None;
            }
            YourThreadsPageMsg::LoadFailed(e) => {
                self.error = Some(e.to_string());
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if ctx.props().login.is_none() {
            return html! { <p class="text-muted">{ "To see your threads, please log in." }</p> };
        }
        let listing = match &self.posts {
            None if self.error.is_none() => html! { <p>{ "Loading..." }</p> },
            None => Html::default(),
            Some(posts) if posts.is_empty() => html! {
                <p>{ "You have not started any threads yet." }</p>
            },
            Some(posts) => posts
                .iter()
                .map(|p| {
                    let draft = (p.status == PostStatus::Draft)
                        .then(|| html! { <span class="badge bg-secondary ms-2">{ "Draft" }</span> });
                    html! {
                        <li class="list-group-item">
                            <a href={format!("?post={}", p.id.0)}>{ &p.title }</a>
                            { for draft }
                            <div class="text-muted">
                                { api::Forum::for_slug(&p.forum_slug).title }
                                { " · " }
                                { util::fmt_date(&p.created_at) }
                            </div>
                        </li>
                    }
                })
                .collect::<Html>(),
        };
        html! {<>
            <div class="mb-3">
                <h1>{ "Your threads" }</h1>
                <a href="?write">{ "Start a new thread" }</a>
            </div>
            <ui::StatusBanner message={self.error.clone()} />
            <ul class="list-group">{ listing }</ul>
        </>}
    }
}
