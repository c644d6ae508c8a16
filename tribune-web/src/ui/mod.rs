mod app;
pub use app::{App, AppMsg};

mod attachment_list;
pub use attachment_list::AttachmentList;

mod comment_tree;
pub use comment_tree::CommentTree;

mod compose_page;
pub use compose_page::ComposePage;

mod forum_page;
pub use forum_page::ForumPage;

mod login;
pub use login::Login;

mod reply_composer;
pub use reply_composer::ReplyComposer;

mod status_banner;
pub use status_banner::StatusBanner;

mod thread_page;
pub use thread_page::ThreadPage;

mod your_threads_page;
pub use your_threads_page::YourThreadsPage;
