//! Blog writes, editor reconciliation, deletion and latest blocks

mod common;

use crate::common::*;
use blog_core::common::{ContentError, GrantedCapabilities};
use blog_core::domains::blogs::activities::{
    create_blog, delete_blog, find_blog, latest_blogs, latest_posts, latest_posts_for_blog,
    update_blog, Caller, DEFAULT_LATEST_POSTS,
};
use blog_core::domains::blogs::models::{
    Blog, BlogChanges, BlogEditor, BlogPost, NewBlog, BLOG_SLUG_MAX_CHARS,
};
use chrono::{Duration, DurationRound, Utc};
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn editors_are_replaced_wholesale(ctx: &TestHarness) {
    let editor = editor();
    let caller = Caller::api(&editor);

    let blog = create_blog(
        NewBlog::builder().title("Team").editors(vec![1, 2, 3]).build(),
        &caller,
        &ctx.deps,
    )
    .await
    .unwrap();
    assert_eq!(
        BlogEditor::find_user_ids(blog.id, &ctx.db_pool).await.unwrap(),
        vec![1, 2, 3]
    );

    let updated = update_blog(
        blog.id,
        BlogChanges {
            editors: Some(vec![3, 4]),
            ..Default::default()
        },
        &caller,
        &ctx.deps,
    )
    .await
    .unwrap();

    assert_eq!(updated.editors, vec![3, 4]);
    assert_eq!(
        BlogEditor::find_user_ids(blog.id, &ctx.db_pool).await.unwrap(),
        vec![3, 4]
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn update_without_editor_list_keeps_editors(ctx: &TestHarness) {
    let blog = insert_blog_with_editors(&ctx.db_pool, "Stable team", vec![7, 8])
        .await
        .unwrap();

    let editor = editor();
    let updated = update_blog(
        blog.id,
        BlogChanges {
            title: Some("Renamed".to_string()),
            ..Default::default()
        },
        &Caller::api(&editor),
        &ctx.deps,
    )
    .await
    .unwrap();

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.editors, vec![7, 8]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn blog_slug_is_truncated_and_findable(ctx: &TestHarness) {
    let long_slug = format!("{}-{}", unique_token("s"), "x".repeat(80));
    let editor = editor();

    let blog = create_blog(
        NewBlog::builder()
            .title("Long slug")
            .url_unique_path(Some(long_slug.clone()))
            .build(),
        &Caller::api(&editor),
        &ctx.deps,
    )
    .await
    .unwrap();

    let stored = blog.url_unique_path.clone().unwrap();
    assert_eq!(stored.chars().count(), BLOG_SLUG_MAX_CHARS);
    assert!(long_slug.starts_with(&stored));

    let found = find_blog(&stored, &ctx.deps).await.unwrap();
    assert_eq!(found.id, blog.id);
    assert_eq!(
        found.link_permanent.as_deref(),
        Some(format!("{TEST_APP_ORIGIN}/blog/{}", blog.id).as_str())
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn empty_slugs_do_not_conflict(ctx: &TestHarness) {
    let editor = editor();
    let caller = Caller::api(&editor);
    for _ in 0..2 {
        let blog = create_blog(
            NewBlog::builder()
                .title("No slug")
                .url_unique_path(Some(String::new()))
                .build(),
            &caller,
            &ctx.deps,
        )
        .await
        .unwrap();
        assert_eq!(blog.url_unique_path, None);
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn write_gates(ctx: &TestHarness) {
    let blog = insert_blog(&ctx.db_pool, "Gated").await.unwrap();
    let nobody = GrantedCapabilities::none();
    let caller = Caller::api(&nobody);

    let err = create_blog(NewBlog::builder().title("x").build(), &caller, &ctx.deps)
        .await
        .unwrap_err();
    assert!(err.is_forbidden());
    assert!(update_blog(blog.id, BlogChanges::default(), &caller, &ctx.deps)
        .await
        .unwrap_err()
        .is_forbidden());
    assert!(delete_blog(blog.id, &caller, &ctx.deps).await.unwrap_err().is_forbidden());

    let editor = editor();
    let err = update_blog(
        blog.id,
        BlogChanges {
            title: Some(" ".to_string()),
            ..Default::default()
        },
        &Caller::api(&editor),
        &ctx.deps,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ContentError::Validation(_)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn delete_cascades_editors_and_detaches_posts(ctx: &TestHarness) {
    let blog = insert_blog_with_editors(&ctx.db_pool, "Doomed", vec![5, 6])
        .await
        .unwrap();
    let post = insert_post(&ctx.db_pool, blog.id, "Survivor", "", true).await.unwrap();

    let editor = editor();
    delete_blog(blog.id, &Caller::api(&editor), &ctx.deps).await.unwrap();

    assert!(Blog::find_by_id(blog.id, &ctx.db_pool).await.unwrap().is_none());
    assert!(BlogEditor::find_user_ids(blog.id, &ctx.db_pool).await.unwrap().is_empty());

    let survivor = BlogPost::find_by_id(post.id, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(survivor.blog_id, None);

    assert!(find_blog(&blog.id.to_string(), &ctx.deps).await.unwrap_err().is_not_found());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn latest_posts_for_blog_are_published_newest_first(ctx: &TestHarness) {
    let blog = insert_blog(&ctx.db_pool, "Teasers").await.unwrap();
    let mut published = Vec::new();
    for i in 0..5 {
        let post = insert_post(&ctx.db_pool, blog.id, &format!("Live {i}"), "", true)
            .await
            .unwrap();
        published.push(post.id);
    }
    insert_post(&ctx.db_pool, blog.id, "Draft", "", false).await.unwrap();

    let latest = latest_posts_for_blog(blog.id, None, &ctx.deps).await;

    published.reverse();
    published.truncate(4);
    assert_eq!(latest.iter().map(|p| p.id).collect::<Vec<_>>(), published);
    assert!(latest.iter().all(|p| p.link_permanent.is_some()));
}

// The shared database holds rows from other tests, so these rows are pushed
// into the far future to own the top of the global ordering.

#[test_context(TestHarness)]
#[tokio::test]
async fn latest_posts_are_published_only_newest_first(ctx: &TestHarness) {
    let blog = insert_blog(&ctx.db_pool, "Home block").await.unwrap();
    let base = (Utc::now() + Duration::days(365 * 200))
        .duration_trunc(Duration::seconds(1))
        .unwrap();

    // (offset in hours, published)
    let rows = [(0, true), (3, true), (3, true), (1, true), (2, true), (5, false)];
    let mut published = Vec::new();
    for (hours, live) in rows {
        let post = insert_post(&ctx.db_pool, blog.id, "Home", "", live)
            .await
            .unwrap();
        if live {
            let at = base + Duration::hours(hours);
            set_published_at(&ctx.db_pool, post.id, at).await.unwrap();
            published.push((at, post.id));
        }
    }

    let latest = latest_posts(None, &ctx.deps).await;
    assert_eq!(latest.len() as i64, DEFAULT_LATEST_POSTS);

    published.sort_by(|a, b| b.cmp(a));
    let expected: Vec<i64> = published.iter().take(4).map(|(_, id)| *id).collect();
    assert_eq!(latest.iter().map(|p| p.id).collect::<Vec<_>>(), expected);
    assert!(latest.iter().all(|p| p.published));
    assert!(latest.iter().all(|p| p.link_permanent.is_some()));

    let two = latest_posts(Some(2), &ctx.deps).await;
    assert_eq!(two.iter().map(|p| p.id).collect::<Vec<_>>(), expected[..2].to_vec());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn latest_blogs_are_newest_first(ctx: &TestHarness) {
    let base = (Utc::now() + Duration::days(365 * 300))
        .duration_trunc(Duration::seconds(1))
        .unwrap();

    let mut created = Vec::new();
    for hours in [1, 0, 2, 2] {
        let blog = insert_blog(&ctx.db_pool, "Latest").await.unwrap();
        let at = base + Duration::hours(hours);
        set_blog_created_at(&ctx.db_pool, blog.id, at).await.unwrap();
        created.push((at, blog.id));
    }

    let latest = latest_blogs(3, &ctx.deps).await;

    created.sort_by(|a, b| b.cmp(a));
    let expected: Vec<i64> = created.iter().take(3).map(|(_, id)| *id).collect();
    assert_eq!(latest.iter().map(|b| b.id).collect::<Vec<_>>(), expected);
    assert!(latest.iter().all(|b| b.link_permanent.is_some()));
}
