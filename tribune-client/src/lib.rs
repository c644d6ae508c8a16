mod comment;
pub use comment::{CommentNode, Forest, MAX_DEPTH};

mod store;
pub use store::{compose_comment, fetch_thread, PostQuery, ThreadStore};

mod thread;
pub use thread::ThreadDump;

mod view;
pub use view::{reply_label, NodeState, ThreadView};

pub mod api {
    pub use tribune_api::*;
}
