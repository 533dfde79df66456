//! Submitted comments, written and read back by the next build.

mod common;

use chrono::NaiveDate;
use std::fs;
use test_log::test;

use static_comments::{
    config::CommentsConfig,
    error::CommentError,
    render::SiteContext,
    submission::{CommentSubmission, DEFAULT_NAME},
};

use common::{generate_test_root, HELLO};

fn submitted_at() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2011, 5, 4)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

#[test]
fn test_submission_appears_in_next_build() {
    let root = generate_test_root("site_1").unwrap();
    let before = SiteContext::from_config(root.path(), &CommentsConfig::default()).unwrap();
    assert_eq!(before.count_for(HELLO), 3);

    let submission = CommentSubmission::from_form(vec![
        ("post_id", HELLO),
        ("name", "Frank \"the tank\""),
        ("email", "frank@example.com"),
        ("comment", "Late to the party <b>again</b>."),
    ])
    .unwrap();
    let path = submission
        .write_to(root.path().join("_comments"), submitted_at())
        .unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "2011-05-01-hello-comment-2011-05-04-08-00-00.yaml"
    );

    // The running build keeps its snapshot.
    assert_eq!(before.count_for(HELLO), 3);

    let after = SiteContext::from_config(root.path(), &CommentsConfig::default()).unwrap();
    let comments = after.comments_for(HELLO);
    assert_eq!(comments.len(), 4);

    // Path order puts the new file after "-a.txt" and "-b.html", before blog/.
    let frank = &comments[2];
    assert_eq!(frank.get("name"), Some("Frank 'the tank'"));
    assert_eq!(frank.get("email"), Some("frank@example.com"));
    assert_eq!(frank.get("date"), Some("2011-05-04 08:00"));
    assert_eq!(frank.content(), "Late to the party <b>again</b>.");
    assert!(frank.get("comment").is_none());
    assert!(frank.get("post_id").is_none());
}

#[test]
fn test_text_submission_is_escaped_on_read() {
    let root = generate_test_root("site_1").unwrap();
    CommentSubmission::new("/about")
        .field("comment", "a < b\nb > c")
        .extension("txt")
        .write_to(root.path().join("_comments"), submitted_at())
        .unwrap();

    let site = SiteContext::from_config(root.path(), &CommentsConfig::default()).unwrap();
    let about = site.comments_for("/about");
    let written = about
        .iter()
        .find(|c| c.get("date") == Some("2011-05-04 08:00"))
        .unwrap();
    assert_eq!(written.get("name"), Some(DEFAULT_NAME));
    assert_eq!(written.content(), "a &lt; b<br />\nb &gt; c");
}

#[test]
fn test_submission_without_post_id_writes_nothing() {
    let root = generate_test_root("site_1").unwrap();
    let err = CommentSubmission::from_form(vec![("post_id", "   "), ("comment", "hi")]).unwrap_err();
    assert_eq!(err, CommentError::MissingIdentifier);

    let files = fs::read_dir(root.path().join("_comments")).unwrap().count();
    assert_eq!(files, 5);
}
