//! In-memory filesystem backend for tests.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::sync::Mutex;

use jiff::Timestamp;
use sha2::{Digest, Sha256};

use super::{paths, FileMeta, FileSystem, DIRECTORY_MIME_TYPE};
use crate::error::{CuratorError, Result};

#[derive(Debug, Clone)]
struct Node {
    is_dir: bool,
    modified: Timestamp,
    content: Vec<u8>,
    mime_type: String,
}

/// Filesystem backend backed by a flat map from normalized path to node.
///
/// The seeding helpers [`add_file`](Self::add_file) and
/// [`add_dir`](Self::add_dir) auto-create parent directories;
/// `move_entry` does not. Moving a directory rewrites all descendant keys.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    nodes: Mutex<BTreeMap<String, Node>>,
}

impl MemoryFileSystem {
    /// Creates an empty in-memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content, creating parent directories.
    pub fn add_file(&self, path: &str, content: &[u8], mime_type: &str) {
        let path = paths::normalize(path);
        let mut nodes = self.nodes.lock().expect("filesystem lock poisoned");
        Self::insert_parents(&mut nodes, &path);
        nodes.insert(
            path,
            Node {
                is_dir: false,
                modified: Timestamp::now(),
                content: content.to_vec(),
                mime_type: mime_type.to_string(),
            },
        );
    }

    /// Adds a directory, creating parent directories.
    pub fn add_dir(&self, path: &str) {
        let path = paths::normalize(path);
        let mut nodes = self.nodes.lock().expect("filesystem lock poisoned");
        Self::insert_parents(&mut nodes, &path);
        Self::insert_dir(&mut nodes, &path);
    }

    fn insert_parents(nodes: &mut BTreeMap<String, Node>, path: &str) {
        let parent = paths::parent(path);
        if parent != "/" {
            Self::insert_parents(nodes, &parent);
            Self::insert_dir(nodes, &parent);
        }
    }

    fn insert_dir(nodes: &mut BTreeMap<String, Node>, path: &str) {
        nodes.entry(path.to_string()).or_insert_with(|| Node {
            is_dir: true,
            modified: Timestamp::now(),
            content: Vec::new(),
            mime_type: DIRECTORY_MIME_TYPE.to_string(),
        });
    }

    fn meta_for(path: &str, node: &Node) -> FileMeta {
        let hash = if node.is_dir {
            String::new()
        } else {
            format!("{:x}", Sha256::digest(&node.content))
        };

        FileMeta {
            name: paths::base_name(path),
            path: path.to_string(),
            is_dir: node.is_dir,
            size: node.content.len() as u64,
            modified: node.modified,
            hash,
            mime_type: node.mime_type.clone(),
        }
    }
}

impl FileSystem for MemoryFileSystem {
    fn list(&self, path: &str) -> Result<Vec<FileMeta>> {
        let path = paths::normalize(path);
        let nodes = self.nodes.lock().expect("filesystem lock poisoned");

        if path != "/" {
            match nodes.get(&path) {
                None => return Err(CuratorError::PathNotFound { path }),
                Some(node) if !node.is_dir => {
                    return Err(CuratorError::invalid_path(path, "not a directory"));
                }
                Some(_) => {}
            }
        }

        // BTreeMap keys are ordered, so children come out name-sorted.
        Ok(nodes
            .iter()
            .filter(|(key, _)| paths::parent(key) == path && **key != path)
            .map(|(key, node)| Self::meta_for(key, node))
            .collect())
    }

    fn read(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        let path = paths::normalize(path);
        let nodes = self.nodes.lock().expect("filesystem lock poisoned");

        match nodes.get(&path) {
            None => Err(CuratorError::PathNotFound { path }),
            Some(node) if node.is_dir => {
                Err(CuratorError::invalid_path(path, "is a directory"))
            }
            Some(node) => Ok(Box::new(Cursor::new(node.content.clone()))),
        }
    }

    fn move_entry(&self, source: &str, destination: &str) -> Result<()> {
        let source = paths::normalize(source);
        let destination = paths::normalize(destination);
        let mut nodes = self.nodes.lock().expect("filesystem lock poisoned");

        if !nodes.contains_key(&source) {
            return Err(CuratorError::conflict(format!(
                "source no longer exists: {source}"
            )));
        }
        if nodes.contains_key(&destination) {
            return Err(CuratorError::conflict(format!(
                "destination already exists: {destination}"
            )));
        }

        let dest_parent = paths::parent(&destination);
        if dest_parent != "/" && !nodes.contains_key(&dest_parent) {
            return Err(CuratorError::PathNotFound { path: dest_parent });
        }

        let mut node = nodes.remove(&source).expect("source checked above");
        node.modified = Timestamp::now();
        let is_dir = node.is_dir;
        nodes.insert(destination.clone(), node);

        if is_dir {
            let prefix = format!("{source}/");
            let descendants: Vec<String> = nodes
                .keys()
                .filter(|key| key.starts_with(&prefix))
                .cloned()
                .collect();
            for old_key in descendants {
                let new_key = format!("{destination}/{}", &old_key[prefix.len()..]);
                let child = nodes.remove(&old_key).expect("descendant key collected");
                nodes.insert(new_key, child);
            }
        }

        Ok(())
    }

    fn create_dir(&self, path: &str) -> Result<()> {
        let path = paths::normalize(path);
        if path == "/" {
            return Ok(());
        }

        let mut nodes = self.nodes.lock().expect("filesystem lock poisoned");
        if let Some(node) = nodes.get(&path) {
            if node.is_dir {
                return Ok(());
            }
            return Err(CuratorError::invalid_path(path, "exists as a file"));
        }

        Self::insert_parents(&mut nodes, &path);
        Self::insert_dir(&mut nodes, &path);
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<()> {
        let path = paths::normalize(path);
        let mut nodes = self.nodes.lock().expect("filesystem lock poisoned");

        let node = nodes
            .remove(&path)
            .ok_or_else(|| CuratorError::PathNotFound { path: path.clone() })?;

        if node.is_dir {
            let prefix = format!("{path}/");
            nodes.retain(|key, _| !key.starts_with(&prefix));
        }

        Ok(())
    }

    fn exists(&self, path: &str) -> Result<bool> {
        let path = paths::normalize(path);
        if path == "/" {
            return Ok(true);
        }
        let nodes = self.nodes.lock().expect("filesystem lock poisoned");
        Ok(nodes.contains_key(&path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_to_string(fs: &MemoryFileSystem, path: &str) -> String {
        let mut reader = fs.read(path).expect("read should succeed");
        let mut buffer = String::new();
        reader
            .read_to_string(&mut buffer)
            .expect("read_to_string should succeed");
        buffer
    }

    #[test]
    fn test_add_file_creates_parents() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/a/b/c.txt", b"hello", "text/plain");

        assert!(fs.exists("/a").unwrap());
        assert!(fs.exists("/a/b").unwrap());
        assert_eq!(read_to_string(&fs, "/a/b/c.txt"), "hello");
    }

    #[test]
    fn test_list_is_name_ordered_and_direct_children_only() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/dir/zebra.txt", b"z", "text/plain");
        fs.add_file("/dir/apple.txt", b"a", "text/plain");
        fs.add_file("/dir/nested/deep.txt", b"d", "text/plain");

        let entries = fs.list("/dir").unwrap();
        let names: Vec<&str> = entries.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["apple.txt", "nested", "zebra.txt"]);
    }

    #[test]
    fn test_list_errors() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/a.txt", b"x", "text/plain");

        assert!(matches!(
            fs.list("/missing"),
            Err(CuratorError::PathNotFound { .. })
        ));
        assert!(matches!(
            fs.list("/a.txt"),
            Err(CuratorError::InvalidPath { .. })
        ));
        assert!(fs.list("/").is_ok());
    }

    #[test]
    fn test_identical_content_has_identical_hash() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/one.txt", b"same bytes", "text/plain");
        fs.add_file("/two.txt", b"same bytes", "text/plain");
        fs.add_file("/other.txt", b"different", "text/plain");

        let entries = fs.list("/").unwrap();
        let hash_of = |name: &str| {
            entries
                .iter()
                .find(|m| m.name == name)
                .map(|m| m.hash.clone())
                .unwrap()
        };

        assert_eq!(hash_of("one.txt"), hash_of("two.txt"));
        assert_ne!(hash_of("one.txt"), hash_of("other.txt"));
    }

    #[test]
    fn test_move_file() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/a.txt", b"x", "text/plain");
        fs.add_dir("/dest");

        fs.move_entry("/a.txt", "/dest/a.txt").unwrap();
        assert!(!fs.exists("/a.txt").unwrap());
        assert_eq!(read_to_string(&fs, "/dest/a.txt"), "x");
    }

    #[test]
    fn test_move_conflicts() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/a.txt", b"x", "text/plain");
        fs.add_file("/b.txt", b"y", "text/plain");

        let missing = fs.move_entry("/nope.txt", "/c.txt").unwrap_err();
        assert!(missing.is_conflict());

        let occupied = fs.move_entry("/a.txt", "/b.txt").unwrap_err();
        assert!(occupied.is_conflict());
        assert!(occupied.to_string().contains("destination already exists"));
    }

    #[test]
    fn test_move_does_not_create_parents() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/a.txt", b"x", "text/plain");

        let err = fs.move_entry("/a.txt", "/missing/a.txt").unwrap_err();
        assert!(matches!(err, CuratorError::PathNotFound { .. }));
        assert!(fs.exists("/a.txt").unwrap());
    }

    #[test]
    fn test_move_directory_rewrites_descendants() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/old/a.txt", b"a", "text/plain");
        fs.add_file("/old/sub/b.txt", b"b", "text/plain");

        fs.move_entry("/old", "/new").unwrap();

        assert!(!fs.exists("/old").unwrap());
        assert!(!fs.exists("/old/sub/b.txt").unwrap());
        assert_eq!(read_to_string(&fs, "/new/a.txt"), "a");
        assert_eq!(read_to_string(&fs, "/new/sub/b.txt"), "b");
    }

    #[test]
    fn test_create_dir_idempotent_but_not_over_files() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/a.txt", b"x", "text/plain");

        fs.create_dir("/d").unwrap();
        fs.create_dir("/d").unwrap();
        assert!(fs.exists("/d").unwrap());

        let err = fs.create_dir("/a.txt").unwrap_err();
        assert!(matches!(err, CuratorError::InvalidPath { .. }));
    }

    #[test]
    fn test_delete_directory_removes_descendants() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/d/a.txt", b"a", "text/plain");
        fs.add_file("/d/sub/b.txt", b"b", "text/plain");

        fs.delete("/d").unwrap();
        assert!(!fs.exists("/d").unwrap());
        assert!(!fs.exists("/d/sub/b.txt").unwrap());

        assert!(matches!(
            fs.delete("/d"),
            Err(CuratorError::PathNotFound { .. })
        ));
    }

    #[test]
    fn test_paths_are_normalized() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/dir//file.txt", b"x", "text/plain");
        assert!(fs.exists("/dir/./file.txt").unwrap());
        assert!(fs.exists("/dir/sub/../file.txt").unwrap());
    }
}
