use tribune_client::api::Attachment;
use yew::prelude::*;

use crate::config;

#[derive(Clone, PartialEq, Properties)]
pub struct AttachmentListProps {
    pub attachments: Vec<Attachment>,
}

#[function_component(AttachmentList)]
pub fn attachment_list(p: &AttachmentListProps) -> Html {
    if p.attachments.is_empty() {
        return Html::default();
    }
    html! {
        <div class="mb-3">
            <h5>{ "Attachments" }</h5>
            <ul class="list-unstyled">
                { for p.attachments.iter().map(|a| html! {
                    <li>
                        <a href={a.public_url(config::BACKEND_URL)} target="_blank">
                            { &a.original_name }
                        </a>
                        <span class="text-muted">{ format!(" ({})", a.mime_label()) }</span>
                    </li>
                })}
            </ul>
        </div>
    }
}
