use chrono::{Duration, TimeZone, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tribune_api::{Comment, CommentId, PostId, Uuid};
use tribune_client::{CommentNode, Forest, MAX_DEPTH};

fn comment(n: u64, parent: Option<CommentId>) -> Comment {
    Comment {
        id: CommentId(Uuid::from_u128(n as u128 + 1)),
        post_id: PostId::stub(),
        parent_id: parent,
        body: format!("comment {}", n),
        display_name: None,
        is_anonymous: false,
        author_id: None,
        created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(n as i64),
    }
}

fn walk(node: &CommentNode, f: &mut impl FnMut(&CommentNode)) {
    f(node);
    for c in &node.children {
        walk(c, f);
    }
}

#[test]
fn every_comment_lands_in_the_forest_exactly_once() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..500 {
        let n = rng.gen_range(0..50u64);
        let comments: Vec<Comment> = (0..n)
            .map(|i| {
                // parents may point forwards, at the comment itself, or at
                // ids that were never fetched
                let parent = match rng.gen_range(0..4) {
                    0 => None,
                    1 => Some(CommentId(Uuid::from_u128(
                        rng.gen_range(0..n) as u128 + 1,
                    ))),
                    2 => Some(CommentId(Uuid::from_u128(i as u128 + 1))),
                    _ => Some(CommentId(Uuid::from_u128(u128::MAX - i as u128))),
                };
                comment(i, parent)
            })
            .collect();
        let mut expected: Vec<CommentId> = comments.iter().map(|c| c.id).collect();
        let forest = Forest::build(comments);
        let mut seen = Vec::new();
        for root in &forest.roots {
            walk(root, &mut |node| seen.push(node.id()));
        }
        expected.sort();
        seen.sort();
        assert_eq!(seen, expected);
    }
}

#[test]
fn fully_cyclic_inputs_stay_total() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let n = rng.gen_range(2..30u64);
        // every comment points at another one, so there is always a cycle
        let comments: Vec<Comment> = (0..n)
            .map(|i| {
                let parent = (i + 1 + rng.gen_range(0..n - 1)) % n;
                comment(i, Some(CommentId(Uuid::from_u128(parent as u128 + 1))))
            })
            .collect();
        let forest = Forest::build(comments);
        assert_eq!(forest.len(), n as usize);
        assert!(!forest.roots.is_empty());
    }
}

#[test]
fn structural_depth_is_capped() {
    // a reply chain three times deeper than the cap
    let mut comments = vec![comment(0, None)];
    for i in 1..(3 * MAX_DEPTH as u64) {
        comments.push(comment(i, Some(CommentId(Uuid::from_u128(i as u128)))));
    }
    let forest = Forest::build(comments);
    assert_eq!(forest.len(), 3 * MAX_DEPTH);
    for root in &forest.roots {
        walk(root, &mut |node| {
            assert!(node.depth <= MAX_DEPTH + 1);
            for child in &node.children {
                assert_eq!(child.depth, node.depth + 1);
            }
        });
    }
}
