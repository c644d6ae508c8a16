use std::rc::Rc;

use tribune_client::{api::CommentId, reply_label, CommentNode, NodeState, ThreadDump, ThreadView};
use yew::prelude::*;

use crate::{ui, util};

#[derive(Clone, PartialEq, Properties)]
pub struct CommentTreeProps {
    pub thread: Rc<ThreadDump>,
    pub view: ThreadView,
    pub on_toggle: Callback<CommentId>,
    pub on_start_edit: Callback<CommentId>,
    pub on_edit_input: Callback<(CommentId, String)>,
    pub on_cancel_edit: Callback<CommentId>,
    pub on_save_edit: Callback<CommentId>,
    pub on_delete: Callback<CommentId>,
    pub on_open_reply: Callback<CommentId>,
    pub on_close_reply: Callback<CommentId>,
    pub on_reply: Callback<(CommentId, String)>,
}

#[function_component(CommentTree)]
pub fn comment_tree(p: &CommentTreeProps) -> Html {
    html! {
        <div class="comments">
            { for p.thread.comments.roots.iter().map(|n| subtree(p, n)) }
        </div>
    }
}

/// One comment with its controls. Children are only put in the DOM once
/// their toggle has been clicked; after that, collapsing is visibility only.
fn subtree(p: &CommentTreeProps, node: &CommentNode) -> Html {
    let id = node.id();
    let busy = p.view.is_busy();

    let body = match p.view.node_state(id) {
        NodeState::Viewing => {
            let controls = p.thread.can_manage(&node.comment).then(|| {
                html! {
                    <span>
                        <button
                            class="btn btn-sm btn-link"
                            disabled={busy}
                            onclick={p.on_start_edit.reform(move |_: MouseEvent| id)}
                        >
                            { "Edit" }
                        </button>
                        <button
                            class="btn btn-sm btn-link text-danger"
                            disabled={busy}
                            onclick={p.on_delete.reform(move |_: MouseEvent| id)}
                        >
                            { "Delete" }
                        </button>
                    </span>
                }
            });
            html! {<>
                <p class="mb-1">{ &node.comment.body }</p>
                { for controls }
            </>}
        }
        NodeState::Editing { buffer } => {
            let on_input = p.on_edit_input.clone();
            html! {<>
                <textarea
                    class="form-control mb-1"
                    value={buffer}
                    onchange={Callback::from(move |e: web_sys::Event| {
                        let area: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
                        on_input.emit((id, area.value()));
                    })}
                />
                <button
                    class="btn btn-sm btn-primary"
                    disabled={busy}
                    onclick={p.on_save_edit.reform(move |_: MouseEvent| id)}
                >
                    { "Save" }
                </button>
                <button
                    class="btn btn-sm btn-link"
                    onclick={p.on_cancel_edit.reform(move |_: MouseEvent| id)}
                >
                    { "Cancel" }
                </button>
            </>}
        }
    };

    let reply = if p.view.is_replying(id) {
        html! {
            <ui::ReplyComposer
                busy={busy}
                submit_label="Reply"
                on_submit={p.on_reply.reform(move |body| (id, body))}
                on_cancel={p.on_close_reply.reform(move |()| id)}
            />
        }
    } else if p.thread.can_reply() {
        html! {
            <button
                class="btn btn-sm btn-link"
                onclick={p.on_open_reply.reform(move |_: MouseEvent| id)}
            >
                { "Reply" }
            </button>
        }
    } else {
        Html::default()
    };

    let children = (!node.children.is_empty()).then(|| {
        let rendered = p.view.expansion(id).map(|visible| {
            html! {
                <div class={classes!("comment-children", "ms-4", (!visible).then_some("d-none"))}>
                    { for node.children.iter().map(|c| subtree(p, c)) }
                </div>
            }
        });
        html! {<>
            <button
                class="btn btn-sm btn-link"
                onclick={p.on_toggle.reform(move |_: MouseEvent| id)}
            >
                { reply_label(node.reply_count()) }
            </button>
            { for rendered }
        </>}
    });

    html! {
        <div class="comment mb-2">
            <div class="text-muted">
                <b>{ node.comment.author_label() }</b>
                { " · " }
                { util::fmt_date(&node.comment.created_at) }
            </div>
            { body }
            { reply }
            { for children }
        </div>
    }
}
