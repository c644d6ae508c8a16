use std::{cell::RefCell, rc::Rc};

use futures::executor::block_on;
use tribune_api::{
    CommentId, Error, ForumSlug, NewComment, NewPost, NewSession, PostId, PostStatus,
    ANONYMOUS_LABEL,
};
use tribune_client::{compose_comment, fetch_thread, PostQuery, ThreadStore, ThreadView};
use tribune_mock_server::{MockServer, MockSession};

type Shared = Rc<RefCell<MockServer>>;

/// Alice and Bob are approved authors; Carol can comment but not publish.
fn seeded() -> Shared {
    let mut server = MockServer::new();
    let alice = server.admin_create_user("alice@example.org", "pass", "Alice");
    server.admin_approve_author(alice);
    let bob = server.admin_create_user("bob@example.org", "pass", "Bob");
    server.admin_approve_author(bob);
    server.admin_create_user("carol@example.org", "pass", "Carol");
    MockSession::shared(server)
}

fn create_post(server: &Shared, email: &str, forum: &str, status: PostStatus) -> PostId {
    let tok = server
        .borrow_mut()
        .auth(NewSession {
            email: String::from(email),
            password: String::from("pass"),
        })
        .unwrap();
    server
        .borrow_mut()
        .create_post(
            tok,
            NewPost {
                forum_slug: ForumSlug::from(forum),
                title: format!("a thread by {}", email),
                body: String::from("thread body"),
                status,
                is_anonymous: false,
            },
        )
        .unwrap()
}

fn new_comment(post: PostId, parent: Option<CommentId>, body: &str, name: &str) -> NewComment {
    NewComment {
        post_id: post,
        parent_id: parent,
        body: String::from(body),
        display_name: Some(String::from(name)),
        is_anonymous: false,
        author_id: None,
    }
}

#[test]
fn reply_flow_rebuilds_the_tree() {
    block_on(async {
        let server = seeded();
        let post = create_post(&server, "alice@example.org", "general-topics", PostStatus::Published);
        let bob = MockSession::login(&server, "bob@example.org", "pass").unwrap();

        let root = bob
            .add_comment(new_comment(post, None, "first!", "Bob"))
            .await
            .unwrap();
        let dump = fetch_thread(&bob, post).await.unwrap();
        assert_eq!(dump.comment_count(), 1);
        assert_eq!(dump.comments.roots[0].id(), root);
        assert!(dump.viewer.is_some());

        bob.add_comment(new_comment(post, Some(root), "and a reply", "Bob"))
            .await
            .unwrap();
        let dump = fetch_thread(&bob, post).await.unwrap();
        assert_eq!(dump.comment_count(), 2);
        assert_eq!(dump.comments.roots.len(), 1);
        let node = &dump.comments.roots[0];
        assert_eq!(node.reply_count(), 1);
        assert_eq!(node.children[0].comment.body, "and a reply");
        assert_eq!(node.children[0].depth, 1);
    });
}

#[test]
fn moderation_is_author_or_thread_owner() {
    block_on(async {
        let server = seeded();
        let post = create_post(&server, "alice@example.org", "general-topics", PostStatus::Published);
        let carol = MockSession::login(&server, "carol@example.org", "pass").unwrap();
        let id = carol
            .add_comment(new_comment(post, None, "carol's take", "Carol"))
            .await
            .unwrap();

        // a bystander can neither edit nor delete
        let bob = MockSession::login(&server, "bob@example.org", "pass").unwrap();
        assert_eq!(
            bob.update_comment(id, String::from("vandalism")).await,
            Err(Error::PermissionDenied)
        );
        assert_eq!(bob.delete_comment(id).await, Err(Error::PermissionDenied));

        // the thread owner moderates everything in their thread
        let alice = MockSession::login(&server, "alice@example.org", "pass").unwrap();
        alice.delete_comment(id).await.unwrap();
        let dump = fetch_thread(&alice, post).await.unwrap();
        assert_eq!(dump.comment_count(), 0);

        // and the UI-side rule agrees with the store
        let dump = fetch_thread(&carol, post).await.unwrap();
        assert!(dump.can_reply());
    });
}

#[test]
fn drafts_are_hidden_from_other_viewers() {
    block_on(async {
        let server = seeded();
        let post = create_post(&server, "alice@example.org", "general-topics", PostStatus::Draft);

        let alice = MockSession::login(&server, "alice@example.org", "pass").unwrap();
        assert!(fetch_thread(&alice, post).await.is_ok());

        let bob = MockSession::login(&server, "bob@example.org", "pass").unwrap();
        assert_eq!(
            fetch_thread(&bob, post).await,
            Err(Error::PostNotPublished)
        );
        assert_eq!(
            fetch_thread(&MockSession::logged_out(&server), post).await,
            Err(Error::PostNotPublished)
        );
    });
}

#[test]
fn logged_out_sessions_cannot_comment() {
    block_on(async {
        let server = seeded();
        let post = create_post(&server, "alice@example.org", "general-topics", PostStatus::Published);
        let anon = MockSession::logged_out(&server);
        assert_eq!(
            anon.add_comment(new_comment(post, None, "drive-by", "nobody"))
                .await,
            Err(Error::PermissionDenied)
        );
        // reading stays open to everyone
        let dump = fetch_thread(&anon, post).await.unwrap();
        assert!(!dump.can_reply());
    });
}

#[test]
fn thread_authoring_and_draft_listing() {
    block_on(async {
        let server = seeded();
        let alice = MockSession::login(&server, "alice@example.org", "pass").unwrap();
        let alice_id = alice.whoami().await.unwrap().unwrap();

        let draft = alice
            .create_post(NewPost {
                forum_slug: ForumSlug::from("union-matters"),
                title: String::from("still cooking"),
                body: String::from("notes"),
                status: PostStatus::Draft,
                is_anonymous: false,
            })
            .await
            .unwrap();
        let published = alice
            .create_post(NewPost {
                forum_slug: ForumSlug::from("union-matters"),
                title: String::from("ready to read"),
                body: String::from("the post"),
                status: PostStatus::Published,
                is_anonymous: false,
            })
            .await
            .unwrap();

        // unapproved accounts cannot publish at all
        let carol = MockSession::login(&server, "carol@example.org", "pass").unwrap();
        assert_eq!(
            carol
                .create_post(NewPost {
                    forum_slug: ForumSlug::from("union-matters"),
                    title: String::from("nope"),
                    body: String::from("nope"),
                    status: PostStatus::Published,
                    is_anonymous: false,
                })
                .await,
            Err(Error::PermissionDenied)
        );

        // the author sees both of their threads, draft included
        let query = PostQuery::authored_by(alice_id);
        let mine = alice.list_posts(&query).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().any(|p| p.id == draft));
        assert!(mine.iter().any(|p| p.id == published));

        // anyone else asking for alice's threads only gets the published one
        let bob = MockSession::login(&server, "bob@example.org", "pass").unwrap();
        let theirs = bob.list_posts(&query).await.unwrap();
        assert_eq!(theirs.len(), 1);
        assert_eq!(theirs[0].id, published);
    });
}

#[test]
fn submissions_carry_the_stored_author_preference() {
    block_on(async {
        let server = seeded();
        let post = create_post(&server, "alice@example.org", "general-topics", PostStatus::Published);
        let bob = MockSession::login(&server, "bob@example.org", "pass").unwrap();
        bob.set_anonymity(true).await.unwrap();

        // built against the stored profile, not whatever the UI had cached
        let comment = compose_comment(&bob, post, None, String::from("unsigned"))
            .await
            .unwrap();
        assert!(comment.is_anonymous);
        assert_eq!(comment.display_name.as_deref(), Some("Bob"));

        bob.add_comment(comment).await.unwrap();
        let dump = fetch_thread(&bob, post).await.unwrap();
        assert_eq!(dump.comments.roots[0].comment.author_label(), ANONYMOUS_LABEL);
    });
}

#[test]
fn anonymity_preference_round_trips() {
    block_on(async {
        let server = seeded();
        let bob = MockSession::login(&server, "bob@example.org", "pass").unwrap();
        assert!(!bob.author_status().await.unwrap().unwrap().is_anonymous);
        bob.set_anonymity(true).await.unwrap();
        assert!(bob.author_status().await.unwrap().unwrap().is_anonymous);

        let anon = MockSession::logged_out(&server);
        assert_eq!(anon.author_status().await.unwrap(), None);
        assert_eq!(anon.set_anonymity(true).await, Err(Error::PermissionDenied));
    });
}

#[test]
fn anonymous_comments_show_the_anonymity_label() {
    block_on(async {
        let server = seeded();
        let post = create_post(&server, "alice@example.org", "general-topics", PostStatus::Published);
        let bob = MockSession::login(&server, "bob@example.org", "pass").unwrap();
        let mut c = new_comment(post, None, "unsigned opinion", "Bob");
        c.is_anonymous = true;
        bob.add_comment(c).await.unwrap();

        let dump = fetch_thread(&bob, post).await.unwrap();
        let node = &dump.comments.roots[0];
        assert_eq!(node.comment.author_label(), ANONYMOUS_LABEL);
        // the stored author still counts for moderation
        assert!(dump.can_manage(&node.comment));
    });
}

#[test]
fn unanswered_filter_and_forum_counts() {
    block_on(async {
        let server = seeded();
        let slug = ForumSlug::from("union-matters");
        let answered = create_post(&server, "alice@example.org", "union-matters", PostStatus::Published);
        let quiet = create_post(&server, "bob@example.org", "union-matters", PostStatus::Published);
        let carol = MockSession::login(&server, "carol@example.org", "pass").unwrap();
        carol
            .add_comment(new_comment(answered, None, "an answer", "Carol"))
            .await
            .unwrap();

        let mut query = PostQuery::for_forum(slug.clone());
        query.unanswered_only = true;
        let posts = carol.list_posts(&query).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, quiet);

        let counts = carol.forum_counts(&slug).await.unwrap();
        assert_eq!(counts.threads, 2);
        assert_eq!(counts.posts, 3);
    });
}

#[test]
fn edit_flow_updates_after_refetch() {
    block_on(async {
        let server = seeded();
        let post = create_post(&server, "alice@example.org", "general-topics", PostStatus::Published);
        let bob = MockSession::login(&server, "bob@example.org", "pass").unwrap();
        let id = bob
            .add_comment(new_comment(post, None, "draft wording", "Bob"))
            .await
            .unwrap();

        let dump = fetch_thread(&bob, post).await.unwrap();
        let mut view = ThreadView::new();
        view.start_edit(id, &dump.comments.roots[0].comment.body);
        view.set_edit_buffer(id, String::from("final wording"));
        assert_eq!(view.visible_bodies(&dump.comments), vec!["final wording"]);

        bob.update_comment(id, String::from("final wording"))
            .await
            .unwrap();
        view.finish_edit(id);

        let dump = fetch_thread(&bob, post).await.unwrap();
        assert_eq!(view.visible_bodies(&dump.comments), vec!["final wording"]);
    });
}

#[test]
fn blank_bodies_are_rejected() {
    block_on(async {
        let server = seeded();
        let post = create_post(&server, "alice@example.org", "general-topics", PostStatus::Published);
        let bob = MockSession::login(&server, "bob@example.org", "pass").unwrap();
        assert_eq!(
            bob.add_comment(new_comment(post, None, "   \n", "Bob")).await,
            Err(Error::EmptyCommentBody)
        );
        let id = bob
            .add_comment(new_comment(post, None, "fine", "Bob"))
            .await
            .unwrap();
        assert_eq!(
            bob.update_comment(id, String::from("  ")).await,
            Err(Error::EmptyCommentBody)
        );
    });
}
