#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
pub struct ForumSlug(pub String);

impl From<&str> for ForumSlug {
    fn from(s: &str) -> ForumSlug {
        ForumSlug(String::from(s))
    }
}

impl std::fmt::Display for ForumSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Forum {
    pub slug: ForumSlug,
    pub title: String,
    pub description: String,
}

impl Forum {
    /// The forums advertised on the landing page.
    pub fn known() -> Vec<Forum> {
        [
            ("general-topics", "General Topics", "Threads in general-topics"),
            (
                "union-matters",
                "Union Matters",
                "Discuss union organizing, labor disputes, contracts, and member issues.",
            ),
            (
                "questions-and-answers",
                "Questions & Answers",
                "Ask for clarification, document analysis, and procedural guidance.",
            ),
            (
                "off-topic",
                "Off-topic",
                "Anything not directly related to cases, filings, or records.",
            ),
        ]
        .into_iter()
        .map(|(slug, title, description)| Forum {
            slug: ForumSlug::from(slug),
            title: String::from(title),
            description: String::from(description),
        })
        .collect()
    }

    /// Unknown slugs still get a usable page.
    pub fn for_slug(slug: &ForumSlug) -> Forum {
        Forum::known()
            .into_iter()
            .find(|f| f.slug == *slug)
            .unwrap_or_else(|| Forum {
                slug: slug.clone(),
                title: slug.0.clone(),
                description: format!("Threads in {}", slug),
            })
    }
}

/// Per-forum tallies shown on forum cards. `posts` counts threads plus the
/// comments below them.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ForumCounts {
    pub threads: usize,
    pub posts: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_slug_falls_back() {
        let f = Forum::for_slug(&ForumSlug::from("judicial-misconduct"));
        assert_eq!(f.title, "judicial-misconduct");
        assert_eq!(f.description, "Threads in judicial-misconduct");
    }

    #[test]
    fn known_slug_uses_table() {
        let f = Forum::for_slug(&ForumSlug::from("union-matters"));
        assert_eq!(f.title, "Union Matters");
    }
}
