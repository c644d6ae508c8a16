use chrono::Utc;

pub use uuid::{uuid, Uuid};
pub type Time = chrono::DateTime<Utc>;

pub const STUB_UUID: Uuid = uuid!("ffffffff-ffff-ffff-ffff-ffffffffffff");

mod attachment;
pub use attachment::{Attachment, AttachmentId};

mod author;
pub use author::AuthorProfile;

mod comment;
pub use comment::{Comment, CommentId, NewComment, ANONYMOUS_LABEL, FALLBACK_LABEL};

mod error;
pub use error::Error;

mod forum;
pub use forum::{Forum, ForumCounts, ForumSlug};

mod post;
pub use post::{NewPost, Post, PostId, PostStatus};

mod session;
pub use session::{AuthToken, NewSession, Session};

mod user;
pub use user::UserId;

// See comments on the `validate` functions throughout this crate: the hosted
// backend rejects null bytes at the datastore boundary, so catch them before
// the round-trip.
pub fn validate_string(s: &str) -> Result<(), Error> {
    match s.contains('\0') {
        true => Err(Error::NullByteInString(s.to_string())),
        false => Ok(()),
    }
}
