use tribune_client::{
    api::{self, ForumCounts, ForumSlug, PostStatus, Session},
    PostQuery, ThreadStore,
};
use yew::prelude::*;

use crate::{api::RemoteStore, ui, util};

#[derive(Clone, PartialEq, Properties)]
pub struct ForumPageProps {
    pub slug: ForumSlug,
    pub login: Option<Session>,
}

pub enum ForumPageMsg {
    Loaded(Vec<api::Post>, ForumCounts),
    LoadFailed(api::Error),
    SearchChanged(String),
    ToggleUnanswered,
}

pub struct ForumPage {
    posts: Option<Vec<api::Post>>,
    counts: ForumCounts,
    search: String,
    unanswered_only: bool,
    error: Option<String>,
}

impl ForumPage {
    fn reload(&self, ctx: &Context<Self>) {
        let store = RemoteStore::new(ctx.props().login.clone());
        let mut query = PostQuery::for_forum(ctx.props().slug.clone());
        query.unanswered_only = self.unanswered_only;
        query.search = Some(self.search.clone()).filter(|s| !s.trim().is_empty());
        let slug = ctx.props().slug.clone();
        ctx.link().send_future(async move {
            let listing = async {
                let posts = store.list_posts(&query).await?;
                let counts = store.forum_counts(&slug).await?;
                Ok::<_, api::Error>((posts, counts))
            };
            match listing.await {
                Ok((posts, counts)) => ForumPageMsg::Loaded(posts, counts),
                Err(e) => ForumPageMsg::LoadFailed(e),
            }
        });
    }
}

impl Component for ForumPage {
    type Message = ForumPageMsg;
    type Properties = ForumPageProps;

    fn create(ctx: &Context<Self>) -> Self {
        let this = ForumPage {
            posts: None,
            counts: ForumCounts::default(),
            search: String::new(),
            unanswered_only: false,
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

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            ForumPageMsg::Loaded(posts, counts) => {
                self.posts = Some(posts);
                self.counts = counts;
                self.error = None;
            }
            ForumPageMsg::LoadFailed(e) => {
                self.error = Some(e.to_string());
            }
            ForumPageMsg::SearchChanged(s) => {
                self.search = s;
                self.reload(ctx);
            }
            ForumPageMsg::ToggleUnanswered => {
                self.unanswered_only = !self.unanswered_only;
                self.reload(ctx);
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let forum = api::Forum::for_slug(&ctx.props().slug);
        let listing = match &self.posts {
            None if self.error.is_none() => html! { <p>{ "Loading..." }</p> },
            None => Html::default(),
            Some(posts) if posts.is_empty() => html! { <p>{ "No threads yet." }</p> },
            Some(posts) => posts
                .iter()
                .map(|p| {
                    let draft =
                        (p.status == PostStatus::Draft).then(|| html! { <em>{ " (draft)" }</em> });
                    html! {
                        <li class="list-group-item">
                            <a href={format!("?post={}", p.id.0)}>{ &p.title }</a>
                            { for draft }
                            <div class="text-muted">
                                { util::post_author_label(p) }
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
                <h1>{ &forum.title }</h1>
                <p class="text-muted">{ &forum.description }</p>
                <p>{ format!("{} threads · {} posts", self.counts.threads, self.counts.posts) }</p>
            </div>
            <ui::StatusBanner message={self.error.clone()} />
            <div class="input-group mb-3">
                <input
                    type="search"
                    class="form-control"
                    placeholder="Search threads"
                    value={self.search.clone()}
                    onchange={ctx.link().callback(|e: web_sys::Event| {
                        let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                        ForumPageMsg::SearchChanged(input.value())
                    })}
                />
                <div class="input-group-text">
                    <input
                        type="checkbox"
                        class="form-check-input me-1"
                        checked={self.unanswered_only}
                        onchange={ctx.link().callback(|_| ForumPageMsg::ToggleUnanswered)}
                    />
                    { "Unanswered only" }
                </div>
            </div>
            <ul class="list-group">{ listing }</ul>
        </>}
    }
}
