use uuid::Uuid;

use crate::{PostId, Time};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AttachmentId(pub Uuid);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Attachment {
    pub id: AttachmentId,
    pub post_id: PostId,
    pub bucket: String,
    pub object_path: String,
    pub original_name: String,
    pub mime_type: Option<String>,
    pub created_at: Time,
}

impl Attachment {
    /// Public download URL on the hosted object storage.
    pub fn public_url(&self, host: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            host.trim_end_matches('/'),
            self.bucket,
            self.object_path
        )
    }

    pub fn mime_label(&self) -> &str {
        self.mime_type.as_deref().unwrap_or("file")
    }
}
