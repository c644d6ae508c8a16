use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct ReplyComposerProps {
    pub busy: bool,
    pub submit_label: String,
    pub on_submit: Callback<String>,
    #[prop_or_default]
    pub on_cancel: Option<Callback<()>>,
}

/// Textarea plus submit button. Blank bodies never make it to the store.
#[function_component(ReplyComposer)]
pub fn reply_composer(p: &ReplyComposerProps) -> Html {
    let text = use_state(String::new);
    let onchange = {
        let text = text.clone();
        Callback::from(move |e: web_sys::Event| {
            let area: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
            text.set(area.value());
        })
    };
    let submit = {
        let text = text.clone();
        let on_submit = p.on_submit.clone();
        Callback::from(move |_: MouseEvent| {
            let body = text.trim().to_string();
            if body.is_empty() {
                return;
            }
            on_submit.emit(body);
            text.set(String::new());
        })
    };
    let cancel = p.on_cancel.clone().map(|cb| {
        html! {
            <button class="btn btn-link" onclick={cb.reform(|_: MouseEvent| ())}>
                { "Cancel" }
            </button>
        }
    });
    html! {
        <div class="mb-3">
            <textarea
                class="form-control mb-2"
                placeholder="Write a comment"
                value={(*text).clone()}
                {onchange}
            />
            <button class="btn btn-primary" disabled={p.busy} onclick={submit}>
                { &p.submit_label }
            </button>
            { for cancel }
        </div>
    }
}
