use std::fs;
use std::path::PathBuf;

use spidey::handler::path::{ResolveError, resolve_path};
use tempfile::TempDir;

fn site() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("www");
    fs::create_dir_all(root.join("a")).unwrap();
    fs::write(root.join("b"), "b").unwrap();
    fs::write(root.join("index.html"), "<h1>hi</h1>").unwrap();
    let root = fs::canonicalize(root).unwrap();
    (dir, root)
}

#[tokio::test]
async fn test_resolve_root() {
    let (_dir, root) = site();

    assert_eq!(resolve_path(&root, "/").await.unwrap(), root);
    assert_eq!(resolve_path(&root, "").await.unwrap(), root);
}

#[tokio::test]
async fn test_resolve_existing_file() {
    let (_dir, root) = site();

    let path = resolve_path(&root, "/index.html").await.unwrap();

    assert_eq!(path, root.join("index.html"));
}

#[tokio::test]
async fn test_resolve_folds_parent_segments() {
    let (_dir, root) = site();

    let path = resolve_path(&root, "/a/../b").await.unwrap();

    assert_eq!(path, root.join("b"));
}

#[tokio::test]
async fn test_resolve_missing_path_lexically() {
    let (_dir, root) = site();

    let path = resolve_path(&root, "/missing/../gone.html").await.unwrap();

    assert_eq!(path, root.join("gone.html"));
}

#[tokio::test]
async fn test_resolve_rejects_escape() {
    let (_dir, root) = site();

    let result = resolve_path(&root, "/../../etc/passwd").await;

    assert!(matches!(result, Err(ResolveError::OutsideRoot(_))));
}

#[tokio::test]
async fn test_resolve_rejects_missing_escape() {
    let (_dir, root) = site();

    let result = resolve_path(&root, "/../../../no/such/file").await;

    assert!(matches!(result, Err(ResolveError::OutsideRoot(_))));
}

#[tokio::test]
async fn test_resolve_rejects_sibling_sharing_prefix() {
    // `www2` starts with the string `www` but is not below it; containment
    // is decided per path segment, not by string prefix.
    let (dir, root) = site();
    let sibling = dir.path().join("www2");
    fs::create_dir_all(&sibling).unwrap();
    fs::write(sibling.join("x"), "secret").unwrap();

    let result = resolve_path(&root, "/../www2/x").await;

    assert!(matches!(result, Err(ResolveError::OutsideRoot(_))));
}

#[tokio::test]
async fn test_resolve_rejects_symlink_out_of_root() {
    let (dir, root) = site();
    let outside = dir.path().join("outside");
    fs::create_dir_all(&outside).unwrap();
    fs::write(outside.join("secret.txt"), "secret").unwrap();
    std::os::unix::fs::symlink(&outside, root.join("escape")).unwrap();

    let result = resolve_path(&root, "/escape/secret.txt").await;

    assert!(matches!(result, Err(ResolveError::OutsideRoot(_))));
}

fn site_with_link_out() -> (TempDir, PathBuf) {
    let (dir, root) = site();
    let outside = dir.path().join("outside");
    fs::create_dir_all(&outside).unwrap();
    fs::write(outside.join("secret.txt"), "TOP SECRET").unwrap();
    std::os::unix::fs::symlink(&outside, root.join("link")).unwrap();
    (dir, root)
}

#[tokio::test]
async fn test_resolve_rejects_symlink_behind_missing_segment() {
    // `nope` does not exist, so the path cannot be canonicalized in one go;
    // folding `nope/..` must not hide that `link` points out of the root.
    let (_dir, root) = site_with_link_out();

    let result = resolve_path(&root, "/link/nope/../secret.txt").await;

    assert!(matches!(result, Err(ResolveError::OutsideRoot(_))));
}

#[tokio::test]
async fn test_resolve_rejects_missing_file_behind_symlink() {
    let (_dir, root) = site_with_link_out();

    let result = resolve_path(&root, "/link/missing.txt").await;

    assert!(matches!(result, Err(ResolveError::OutsideRoot(_))));
}

#[tokio::test]
async fn test_resolve_missing_tail_keeps_canonical_prefix() {
    let (_dir, root) = site_with_link_out();
    std::os::unix::fs::symlink(root.join("a"), root.join("alias")).unwrap();

    let path = resolve_path(&root, "/alias/new/../later.html").await.unwrap();

    assert_eq!(path, root.join("a").join("later.html"));
}

#[tokio::test]
async fn test_resolve_follows_symlink_inside_root() {
    let (_dir, root) = site();
    std::os::unix::fs::symlink(root.join("index.html"), root.join("home.html")).unwrap();

    let path = resolve_path(&root, "/home.html").await.unwrap();

    assert_eq!(path, root.join("index.html"));
}

#[tokio::test]
async fn test_resolve_is_idempotent() {
    let (_dir, root) = site();

    let first = resolve_path(&root, "/a/../index.html").await.unwrap();
    let second = resolve_path(&root, "/a/../index.html").await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_resolve_missing_root() {
    let result = resolve_path(std::path::Path::new("/nonexistent/www"), "/").await;

    assert!(matches!(result, Err(ResolveError::Io(_))));
}
