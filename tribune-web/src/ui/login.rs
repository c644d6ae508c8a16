use tribune_client::api::NewSession;
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct LoginProps {
    /// Email remembered from the previous session, if any.
    pub email: Option<String>,
    pub error: Option<String>,
    pub on_submit: Callback<NewSession>,
}

pub struct Login {
    email: String,
    pass: String,
}

pub enum LoginMsg {
    EmailChanged(String),
    PassChanged(String),
    SubmitClicked,
}

impl Component for Login {
    type Message = LoginMsg;
    type Properties = LoginProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            email: ctx.props().email.clone().unwrap_or_default(),
            pass: String::new(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            LoginMsg::EmailChanged(e) => self.email = e,
            LoginMsg::PassChanged(p) => self.pass = p,
            LoginMsg::SubmitClicked => {
                ctx.props().on_submit.emit(NewSession {
                    email: self.email.clone(),
                    password: self.pass.clone(),
                });
                return false;
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        macro_rules! callback_for {
            ($msg:ident) => {
                ctx.link().callback(|e: web_sys::Event| {
                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                    LoginMsg::$msg(input.value())
                })
            };
        }
        let error = ctx
            .props()
            .error
            .as_ref()
            .map(|e| html! { <div class="alert alert-danger">{ e }</div> });
        html! {<>
            <div class="text-center my-4">
                <h1>{ "Login" }</h1>
            </div>
            { for error }
            <form class="login-form">
                <div class="input-group mb-3">
                    <label class="input-group-text col-xl-1" for="email">{ "Email" }</label>
                    <input
                        type="email"
                        class="form-control form-control-lg"
                        id="email"
                        placeholder="you@example.org"
                        value={self.email.clone()}
                        onchange={callback_for!(EmailChanged)}
                    />
                </div>
                <div class="input-group mb-3">
                    <label class="input-group-text col-xl-1" for="pass">{ "Password" }</label>
                    <input
                        type="password"
                        class="form-control form-control-lg"
                        id="pass"
                        placeholder="pass"
                        value={self.pass.clone()}
                        onchange={callback_for!(PassChanged)}
                    />
                </div>
                <button
                    type="submit"
                    class="btn btn-primary"
                    onclick={ctx.link().callback(|_| LoginMsg::SubmitClicked)}
                >
                    { "Connect" }
                </button>
            </form>
        </>}
    }
}
