use gloo_storage::{LocalStorage, Storage};
use tribune_client::api::{self, ForumSlug, PostId, Session};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::{api as backend, ui, KEY_LOGIN};

/// Which page the URL points at. No router crate: the whole app is a handful
/// of query parameters, exactly like the static site it replaces.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Page {
    Forum(ForumSlug),
    Thread(PostId),
    Compose,
    Yours,
}

fn current_page() -> Page {
    let search = web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();
    for pair in search.trim_start_matches('?').split('&') {
        match pair.split_once('=') {
            Some(("post", id)) => {
                if let Ok(id) = id.parse() {
                    return Page::Thread(PostId(id));
                }
            }
            Some(("forum", slug)) if !slug.is_empty() => {
                return Page::Forum(ForumSlug::from(slug));
            }
            _ if pair == "write" => return Page::Compose,
            _ if pair == "yours" => return Page::Yours,
            _ => (),
        }
    }
    Page::Forum(ForumSlug::from("general-topics"))
}

pub enum AppMsg {
    ShowLogin,
    UserLogin(api::NewSession),
    LoggedIn(Session),
    LoginFailed(api::Error),
    UserLogout,
}

pub struct App {
    page: Page,
    login: Option<Session>,
    /// Email remembered across a logout so the next login is prefilled.
    logout: Option<String>,
    login_error: Option<String>,
    show_login: bool,
}

impl Component for App {
    type Message = AppMsg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        App {
            page: current_page(),
            login: LocalStorage::get(KEY_LOGIN).ok(),
            logout: None,
            login_error: None,
            show_login: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::ShowLogin => {
                self.show_login = true;
                self.login_error = None;
            }
            AppMsg::UserLogin(session) => {
                ctx.link().send_future(async move {
                    match backend::auth(session).await {
                        Ok(info) => AppMsg::LoggedIn(info),
                        Err(e) => AppMsg::LoginFailed(e),
                    }
                });
                return false;
            }
            AppMsg::LoggedIn(session) => {
                LocalStorage::set(KEY_LOGIN, &session)
                    .expect("failed saving session to LocalStorage");
                self.login = Some(session);
                self.login_error = None;
                self.show_login = false;
            }
            AppMsg::LoginFailed(e) => {
                self.login_error = Some(e.to_string());
            }
            AppMsg::UserLogout => {
                LocalStorage::delete(KEY_LOGIN);
                if let Some(session) = self.login.take() {
                    spawn_local(backend::unauth(session.token));
                    self.logout = Some(session.email);
                }
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let session_button = match &self.login {
            Some(session) => html! {<>
                <span class="navbar-text me-2">{ &session.email }</span>
                <button
                    class="btn btn-outline-secondary"
                    onclick={ctx.link().callback(|_| AppMsg::UserLogout)}
                >
                    { "Logout" }
                </button>
            </>},
            None => html! {
                <button
                    class="btn btn-outline-primary"
                    onclick={ctx.link().callback(|_| AppMsg::ShowLogin)}
                >
                    { "Login" }
                </button>
            },
        };
        let body = match (self.show_login, &self.page) {
            (true, _) => html! {
                <ui::Login
                    email={self.logout.clone()}
                    error={self.login_error.clone()}
                    on_submit={ctx.link().callback(AppMsg::UserLogin)}
                />
            },
            (false, Page::Forum(slug)) => html! {
                <ui::ForumPage slug={slug.clone()} login={self.login.clone()} />
            },
            (false, Page::Thread(id)) => html! {
                <ui::ThreadPage post_id={*id} login={self.login.clone()} />
            },
            (false, Page::Compose) => html! {
                <ui::ComposePage login={self.login.clone()} />
            },
            (false, Page::Yours) => html! {
                <ui::YourThreadsPage login={self.login.clone()} />
            },
        };
        html! {
            <div class="container">
                <nav class="navbar navbar-expand mb-4">
                    <a class="navbar-brand" href="?">{ "Tribune" }</a>
                    <div class="navbar-nav me-auto">
                        { for api::Forum::known().into_iter().map(|f| html! {
                            <a class="nav-link" href={format!("?forum={}", f.slug)}>
                                { f.title }
                            </a>
                        })}
                        { for self.login.is_some().then(|| html! {<>
                            <a class="nav-link" href="?write">{ "Write" }</a>
                            <a class="nav-link" href="?yours">{ "Your threads" }</a>
                        </>})}
                    </div>
                    { session_button }
                </nav>
                { body }
            </div>
        }
    }
}
