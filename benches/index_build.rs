//! Performance benchmarks for building the comment index
//!
//! Measures:
//! - Full discovery, parsing and conversion over a generated site
//! - Lookups against an already built store
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, Criterion};
use static_comments::{codec::ConverterRegistry, config::CommentsConfig, store::CommentStore};
use std::path::Path;
use tempfile::TempDir;

const POSTS: usize = 50;
const COMMENTS_PER_POST: usize = 20;

fn write_comment(root: &Path, rel: &str, text: &str) -> std::io::Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)
}

// Spreads comments over three formats and two comment directories.
fn setup_site() -> Result<TempDir, Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    for post in 0..POSTS {
        for n in 0..COMMENTS_PER_POST {
            let post_id = format!("/posts/{post:03}");
            let (rel, text) = match n % 3 {
                0 => (
                    format!("_comments/{post:03}-{n:03}.txt"),
                    format!("---\npost_id: {post_id}\nname: Reader {n}\n---\nFirst <line>\nSecond & last\n"),
                ),
                1 => (
                    format!("blog/_comments/{post:03}-{n:03}.md"),
                    format!("---\npost_id: {post_id}\nname: Reader {n}\n---\nSome *emphasis* and a [link](https://example.com).\n"),
                ),
                _ => (
                    format!("_comments/{post:03}-{n:03}.yaml"),
                    format!("post_id: {post_id}\nname: Reader {n}\ncomment: |\n  Older style\n  comment {n}\n"),
                ),
            };
            write_comment(tmp.path(), &rel, &text)?;
        }
    }
    Ok(tmp)
}

fn bench_build_index(c: &mut Criterion) {
    let site = setup_site().unwrap();
    let config = CommentsConfig::default();

    c.bench_function("build_index", |b| {
        b.iter(|| {
            let store = CommentStore::with_options(
                site.path(),
                config.discovery_options(),
                config.converter_registry(),
            );
            store.index().total_comments()
        });
    });
}

fn bench_lookups(c: &mut Criterion) {
    let site = setup_site().unwrap();
    let store = CommentStore::new(site.path(), ConverterRegistry::new());
    store.index();

    c.bench_function("comments_for", |b| {
        b.iter(|| {
            (0..POSTS)
                .map(|post| store.count_for(&format!("/posts/{post:03}")))
                .sum::<usize>()
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(20)  // Each iteration reads a thousand files
        .measurement_time(std::time::Duration::from_secs(10));
    targets =
        bench_build_index,
        bench_lookups
}

criterion_main!(benches);
