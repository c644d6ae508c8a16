use tribune_client::api::{self, Time};

pub fn fmt_date(t: &Time) -> String {
    t.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Byline for a thread. Anonymity wins over the denormalized display name.
pub fn post_author_label(post: &api::Post) -> &str {
    if post.is_anonymous {
        return api::ANONYMOUS_LABEL;
    }
    match &post.author_display {
        Some(name) if !name.trim().is_empty() => name,
        _ => "Unknown",
    }
}

/// Native blocking confirmation dialog. Headless contexts decline.
pub fn confirm(msg: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(msg).ok())
        .unwrap_or(false)
}
