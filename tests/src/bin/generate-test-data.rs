use std::collections::HashMap;

use chrono::{Duration, TimeZone, Utc};
use rand::{seq::SliceRandom, Rng};
use uuid::Uuid;

const NUM_USERS: usize = 5;
const NUM_POSTS: usize = 40;
const NUM_COMMENTS: usize = 300;
const NUM_ATTACHMENTS: usize = 10;

const POST_WORD_COUNT: usize = 120;
const COMMENT_WORD_COUNT: usize = 25;
const BIO_WORD_COUNT: usize = 12;

const FORUMS: &[&str] = &[
    "general-topics",
    "union-matters",
    "questions-and-answers",
    "off-topic",
];

fn gen_n_items(table: &str, n: usize, mut f: impl FnMut(usize) -> String) {
    println!("INSERT INTO {} VALUES", table);
    for i in 0..n {
        if i != 0 {
            println!(",");
        }
        print!("    {}", f(i));
    }
    println!();
    println!("ON CONFLICT DO NOTHING;");
}

fn fmt_date(minutes: i64) -> String {
    (Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::minutes(minutes))
        .format("%Y-%m-%d %H:%M:%S+00")
        .to_string()
}

fn main() {
    let mut rng = rand::thread_rng();

    // Generate users
    let mut users = Vec::new();
    gen_n_items("users", NUM_USERS, |i| {
        let id = Uuid::new_v4();
        users.push(id);
        format!("('{}', 'user{}@example.org')", id, i)
    });

    // Generate author profiles; user 0 stays unapproved
    gen_n_items("authors", NUM_USERS, |i| {
        format!(
            "('{}', '{}', {}, {}, '{}')",
            users[i],
            lipsum::lipsum_title(),
            i != 0,
            rng.gen_bool(0.2),
            lipsum::lipsum(BIO_WORD_COUNT),
        )
    });

    // Generate posts
    let mut posts = Vec::new();
    gen_n_items("posts", NUM_POSTS, |i| {
        let id = Uuid::new_v4();
        posts.push(id);
        let status = match rng.gen_bool(0.9) {
            true => "published",
            false => "draft",
        };
        format!(
            "('{}', '{}', '{}', '{}', '{}', '{}', {}, '{}')",
            id,
            FORUMS.choose(&mut rng).unwrap(),
            lipsum::lipsum_title(),
            lipsum::lipsum(POST_WORD_COUNT),
            status,
            users.choose(&mut rng).unwrap(),
            rng.gen_bool(0.1),
            fmt_date(i as i64),
        )
    });

    // Generate comments; parents only ever point at earlier comments on the
    // same post, like rows written through the app
    let mut per_post: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    gen_n_items("comments", NUM_COMMENTS, |i| {
        let id = Uuid::new_v4();
        let post = *posts.choose(&mut rng).unwrap();
        let siblings = per_post.entry(post).or_default();
        let parent = match siblings.choose(&mut rng) {
            Some(p) if rng.gen_bool(0.5) => format!("'{}'", p),
            _ => String::from("NULL"),
        };
        siblings.push(id);
        format!(
            "('{}', '{}', {}, '{}', {}, '{}', '{}')",
            id,
            post,
            parent,
            lipsum::lipsum(COMMENT_WORD_COUNT),
            rng.gen_bool(0.1),
            users.choose(&mut rng).unwrap(),
            fmt_date((NUM_POSTS + i) as i64),
        )
    });

    // Generate attachment records
    gen_n_items("post_files", NUM_ATTACHMENTS, |i| {
        let post = posts.choose(&mut rng).unwrap();
        format!(
            "('{}', '{}', 'uploads', '{}/exhibit-{}.pdf', 'exhibit-{}.pdf', 'application/pdf', '{}')",
            Uuid::new_v4(),
            post,
            post,
            i,
            i,
            fmt_date((NUM_POSTS + NUM_COMMENTS + i) as i64),
        )
    });
}
