use crate::path_tree::{PathEntry, PathTree};

fn tree(paths: &[(&str, bool)]) -> PathTree {
    let mut tree = PathTree::new();
    for (path, is_dir) in paths {
        tree.insert(path, *is_dir);
    }
    tree
}

#[test]
fn top_level_skips_paths_under_other_paths() {
    let tree = tree(&[("/tmp/b", true), ("/tmp/b/a", false), ("/tmp/d", false)]);
    assert_eq!(vec!["/tmp/b", "/tmp/d"], tree.top_level().paths());
}

#[test]
fn leaves_skips_paths_with_paths_under_them() {
    let tree = tree(&[("/tmp/b", true), ("/tmp/b/a", false), ("/tmp/d", false)]);
    assert_eq!(vec!["/tmp/b/a", "/tmp/d"], tree.leaves().paths());
}

#[test]
fn similar_names_are_not_nested() {
    let tree = tree(&[("/tmp/foo", true), ("/tmp/foobar", false)]);
    assert_eq!(vec!["/tmp/foo", "/tmp/foobar"], tree.top_level().paths());
    assert_eq!(vec!["/tmp/foo", "/tmp/foobar"], tree.leaves().paths());
}

#[test]
fn inferred_ancestors_are_not_reported() {
    let tree = tree(&[("/a/b/c", false)]);
    assert_eq!(vec!["/a/b/c"], tree.paths());
    assert_eq!(1, tree.len());
    assert!(!tree.contains("/a/b"));
    assert!(tree.contains("/a/b/c"));
}

#[test]
fn leaves_looks_past_inferred_ancestors() {
    let tree = tree(&[("/a", true), ("/a/b/c", false)]);
    assert_eq!(vec!["/a/b/c"], tree.leaves().paths());
    assert_eq!(vec!["/a"], tree.top_level().paths());
}

#[test]
fn files_and_directories_filter_on_insert_flag() {
    let tree = tree(&[("/tmp/b", true), ("/tmp/b/a", false), ("/tmp/d", false)]);
    assert_eq!(vec!["/tmp/b/a", "/tmp/d"], tree.files().paths());
    assert_eq!(vec!["/tmp/b"], tree.directories().paths());
}

#[test]
fn roots_covers_every_path() {
    let tree = tree(&[
        ("/home/user/docs", true),
        ("/home/user/docs/report.pdf", false),
        ("/home/user/music/song.ogg", false),
        ("/srv/data", true),
    ]);
    assert_eq!(
        vec!["/home/user/docs", "/home/user/music/song.ogg", "/srv/data"],
        tree.roots()
    );
}

#[test]
fn trailing_and_repeated_separators_are_ignored() {
    let tree = tree(&[("/tmp//b/", true)]);
    assert!(tree.contains("/tmp/b"));
    assert_eq!(
        vec![PathEntry {
            path: "/tmp/b".to_string(),
            is_dir: true
        }],
        tree.entries()
    );
}

#[test]
fn reinserting_replaces_directory_flag() {
    let mut tree = tree(&[("/tmp/b", false)]);
    tree.insert("/tmp/b", true);
    assert_eq!(1, tree.len());
    assert_eq!(vec!["/tmp/b"], tree.directories().paths());
}

#[test]
fn empty_tree() {
    let tree = PathTree::new();
    assert!(tree.is_empty());
    assert!(tree.top_level().is_empty());
    assert!(tree.leaves().is_empty());
    assert!(tree.roots().is_empty());
}
