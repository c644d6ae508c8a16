use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct StatusBannerProps {
    pub message: Option<String>,
}

#[function_component(StatusBanner)]
pub fn status_banner(p: &StatusBannerProps) -> Html {
    match &p.message {
        Some(message) => html! {
            <div class="alert alert-danger" role="alert">{ message }</div>
        },
        None => Html::default(),
    }
}
