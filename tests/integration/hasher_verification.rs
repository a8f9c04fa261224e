//! Hash verification across tree sources

use super::test_utils::{memory_tree, write, TestWorkspace};
use trimerge::tree::hasher::{compute_content_hash, hash_tree};
use trimerge::tree::walker::WalkerConfig;
use trimerge::DirTree;

#[test]
fn test_known_sha256_vectors() {
    assert_eq!(
        compute_content_hash(b"").to_hex(),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
    assert_eq!(
        compute_content_hash(b"abc").to_hex(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn test_directory_and_memory_trees_hash_equally() {
    let ws = TestWorkspace::new();
    let files = [
        ("settings.json", "{\"a\":1}"),
        ("commands/deploy.md", "deploy"),
        ("commands/nested/deep.md", ""),
    ];
    for (rel, content) in files {
        write(&ws.upstream, rel, content);
    }

    let from_disk = hash_tree(&ws.upstream_tree()).unwrap();
    let from_memory = hash_tree(&memory_tree(&files)).unwrap();

    assert_eq!(from_disk, from_memory);
    assert_eq!(
        from_disk.keys().cloned().collect::<Vec<_>>(),
        vec!["commands/deploy.md", "commands/nested/deep.md", "settings.json"]
    );
}

#[test]
fn test_same_content_same_hash_regardless_of_path() {
    let ws = TestWorkspace::new();
    write(&ws.local, "one.txt", "shared");
    write(&ws.local, "dir/two.txt", "shared");

    let hashes = hash_tree(&ws.local_tree()).unwrap();

    assert_eq!(hashes["one.txt"], hashes["dir/two.txt"]);
    assert_eq!(hashes["one.txt"], compute_content_hash(b"shared"));
}

#[test]
fn test_ignore_patterns_exclude_entries() {
    let ws = TestWorkspace::new();
    write(&ws.local, "keep.md", "k");
    write(&ws.local, ".git/HEAD", "ref");
    write(&ws.local, "notes.swp", "s");

    let tree = DirTree::new(&ws.local).with_walker_config(WalkerConfig {
        follow_symlinks: false,
        ignore_patterns: vec![".git".to_string(), "*.swp".to_string()],
    });
    let hashes = hash_tree(&tree).unwrap();

    assert_eq!(hashes.keys().cloned().collect::<Vec<_>>(), vec!["keep.md"]);
}

#[test]
fn test_empty_tree_hashes_to_empty_map() {
    let ws = TestWorkspace::new();
    assert!(hash_tree(&ws.baseline_tree()).unwrap().is_empty());
}
