//! Local-disk filesystem backend, sandboxed to a configured root.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use jiff::Timestamp;
use sha2::{Digest, Sha256};

use super::{paths, FileMeta, FileSystem, DIRECTORY_MIME_TYPE};
use crate::error::{CuratorError, Result, ResultExt};

/// Filesystem backend rooted at a local directory.
///
/// Virtual paths are resolved inside the root; any path whose normalized or
/// symlink-resolved form lands outside the root is rejected before the
/// backend touches the disk.
pub struct LocalFileSystem {
    root: PathBuf,
}

impl LocalFileSystem {
    /// Creates a backend rooted at an existing directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let metadata = fs::metadata(root).map_err(|e| CuratorError::Configuration {
            message: format!("root path does not exist: {}: {e}", root.display()),
        })?;
        if !metadata.is_dir() {
            return Err(CuratorError::Configuration {
                message: format!("root path is not a directory: {}", root.display()),
            });
        }

        let root = fs::canonicalize(root).map_err(|e| CuratorError::Configuration {
            message: format!("cannot canonicalize root path: {e}"),
        })?;

        Ok(Self { root })
    }

    /// Root directory this backend is confined to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a virtual path to an absolute path inside the root.
    ///
    /// Normalization clamps `..` at the virtual root, so the joined path can
    /// never escape lexically. Symlink escapes are caught by canonicalizing
    /// the deepest existing ancestor and checking it stays under the root.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let normalized = paths::normalize(path);
        let absolute = self.root.join(normalized.trim_start_matches('/'));

        let mut probe = absolute.as_path();
        loop {
            if probe.exists() {
                let canonical = fs::canonicalize(probe).fs_err(&normalized)?;
                if !canonical.starts_with(&self.root) {
                    return Err(CuratorError::invalid_path(
                        normalized,
                        "resolves outside the filesystem root",
                    ));
                }
                break;
            }
            probe = match probe.parent() {
                Some(parent) => parent,
                None => break,
            };
        }

        Ok(absolute)
    }

    fn virtual_path(&self, absolute: &Path) -> String {
        let relative = absolute
            .strip_prefix(&self.root)
            .unwrap_or(absolute)
            .to_string_lossy()
            .replace('\\', "/");
        paths::normalize(&relative)
    }

    fn hash_file(path: &Path) -> String {
        let Ok(mut file) = fs::File::open(path) else {
            return String::new();
        };
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; 8192];
        loop {
            match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => hasher.update(&buffer[..n]),
                Err(_) => return String::new(),
            }
        }
        format!("{:x}", hasher.finalize())
    }

    fn meta_for(&self, absolute: &Path, metadata: &fs::Metadata) -> FileMeta {
        let virtual_path = self.virtual_path(absolute);
        let is_dir = metadata.is_dir();

        let modified = metadata
            .modified()
            .ok()
            .and_then(|t| Timestamp::try_from(t).ok())
            .unwrap_or_default();

        let (hash, mime_type) = if is_dir {
            (String::new(), DIRECTORY_MIME_TYPE.to_string())
        } else {
            (
                Self::hash_file(absolute),
                mime_guess::from_path(absolute)
                    .first_or_octet_stream()
                    .to_string(),
            )
        };

        FileMeta {
            name: paths::base_name(&virtual_path),
            path: virtual_path,
            is_dir,
            size: if is_dir { 0 } else { metadata.len() },
            modified,
            hash,
            mime_type,
        }
    }
}

impl FileSystem for LocalFileSystem {
    fn list(&self, path: &str) -> Result<Vec<FileMeta>> {
        let absolute = self.resolve(path)?;
        let entries = fs::read_dir(&absolute).fs_err(path)?;

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.fs_err(path)?;
            // Entries that disappear or deny metadata mid-listing are skipped.
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            result.push(self.meta_for(&entry.path(), &metadata));
        }

        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    fn read(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        let absolute = self.resolve(path)?;

        match fs::metadata(&absolute) {
            Ok(metadata) if metadata.is_dir() => {
                Err(CuratorError::invalid_path(path, "is a directory"))
            }
            Ok(_) => {
                let file = fs::File::open(&absolute).fs_err(path)?;
                Ok(Box::new(file))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CuratorError::PathNotFound {
                    path: path.to_string(),
                })
            }
            Err(e) => Err(e).fs_err(path),
        }
    }

    fn move_entry(&self, source: &str, destination: &str) -> Result<()> {
        let src = self.resolve(source)?;
        let dst = self.resolve(destination)?;

        if !src.exists() {
            return Err(CuratorError::conflict(format!(
                "source no longer exists: {source}"
            )));
        }
        if dst.exists() {
            return Err(CuratorError::conflict(format!(
                "destination already exists: {destination}"
            )));
        }

        // The engine creates destination parents explicitly; a missing
        // parent here is a real fault, not something to paper over.
        if let Some(parent) = dst.parent() {
            if !parent.exists() {
                return Err(CuratorError::PathNotFound {
                    path: paths::parent(destination),
                });
            }
        }

        fs::rename(&src, &dst).fs_err(source)
    }

    fn create_dir(&self, path: &str) -> Result<()> {
        let absolute = self.resolve(path)?;

        if absolute.is_file() {
            return Err(CuratorError::invalid_path(path, "exists as a file"));
        }

        fs::create_dir_all(&absolute).fs_err(path)
    }

    fn delete(&self, path: &str) -> Result<()> {
        let absolute = self.resolve(path)?;

        match fs::metadata(&absolute) {
            Ok(metadata) if metadata.is_dir() => fs::remove_dir_all(&absolute).fs_err(path),
            Ok(_) => fs::remove_file(&absolute).fs_err(path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CuratorError::PathNotFound {
                    path: path.to_string(),
                })
            }
            Err(e) => Err(e).fs_err(path),
        }
    }

    fn exists(&self, path: &str) -> Result<bool> {
        let absolute = self.resolve(path)?;

        match fs::metadata(&absolute) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).fs_err(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, LocalFileSystem) {
        let dir = TempDir::new().expect("failed to create temp dir");
        let fs_backend = LocalFileSystem::new(dir.path()).expect("failed to create backend");
        (dir, fs_backend)
    }

    #[test]
    fn test_new_rejects_missing_or_file_roots() {
        assert!(LocalFileSystem::new("/definitely/not/a/real/root").is_err());

        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        assert!(LocalFileSystem::new(&file).is_err());
    }

    #[test]
    fn test_list_and_read() {
        let (dir, backend) = setup();
        fs::write(dir.path().join("b.txt"), "bee").unwrap();
        fs::write(dir.path().join("a.txt"), "ay").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let entries = backend.list("/").unwrap();
        let names: Vec<&str> = entries.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "b.txt", "sub"]);

        let meta = &entries[0];
        assert_eq!(meta.path, "/a.txt");
        assert!(!meta.is_dir);
        assert_eq!(meta.size, 2);
        assert!(!meta.hash.is_empty());
        assert_eq!(meta.mime_type, "text/plain");

        let sub = entries.iter().find(|m| m.name == "sub").unwrap();
        assert!(sub.is_dir);
        assert_eq!(sub.mime_type, DIRECTORY_MIME_TYPE);
        assert!(sub.hash.is_empty());

        let mut content = String::new();
        backend
            .read("/a.txt")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "ay");
    }

    #[test]
    fn test_move_and_conflicts() {
        let (dir, backend) = setup();
        fs::write(dir.path().join("a.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("dest")).unwrap();

        backend.move_entry("/a.txt", "/dest/a.txt").unwrap();
        assert!(!backend.exists("/a.txt").unwrap());
        assert!(backend.exists("/dest/a.txt").unwrap());

        let missing = backend.move_entry("/gone.txt", "/x.txt").unwrap_err();
        assert!(missing.is_conflict());

        fs::write(dir.path().join("b.txt"), "y").unwrap();
        let occupied = backend.move_entry("/b.txt", "/dest/a.txt").unwrap_err();
        assert!(occupied.is_conflict());
    }

    #[test]
    fn test_move_requires_existing_parent() {
        let (dir, backend) = setup();
        fs::write(dir.path().join("a.txt"), "x").unwrap();

        let err = backend.move_entry("/a.txt", "/nowhere/a.txt").unwrap_err();
        assert!(matches!(err, CuratorError::PathNotFound { .. }));
        assert!(backend.exists("/a.txt").unwrap());
    }

    #[test]
    fn test_move_directory() {
        let (dir, backend) = setup();
        fs::create_dir_all(dir.path().join("old/sub")).unwrap();
        fs::write(dir.path().join("old/sub/f.txt"), "deep").unwrap();

        backend.move_entry("/old", "/new").unwrap();
        assert!(!backend.exists("/old").unwrap());
        assert!(backend.exists("/new/sub/f.txt").unwrap());
    }

    #[test]
    fn test_create_dir_semantics() {
        let (dir, backend) = setup();

        backend.create_dir("/a/b/c").unwrap();
        backend.create_dir("/a/b/c").unwrap();
        assert!(dir.path().join("a/b/c").is_dir());

        fs::write(dir.path().join("file.txt"), "x").unwrap();
        let err = backend.create_dir("/file.txt").unwrap_err();
        assert!(matches!(err, CuratorError::InvalidPath { .. }));
    }

    #[test]
    fn test_delete() {
        let (dir, backend) = setup();
        fs::create_dir_all(dir.path().join("d/sub")).unwrap();
        fs::write(dir.path().join("d/sub/f.txt"), "x").unwrap();

        backend.delete("/d").unwrap();
        assert!(!dir.path().join("d").exists());

        assert!(matches!(
            backend.delete("/d"),
            Err(CuratorError::PathNotFound { .. })
        ));
    }

    #[test]
    fn test_traversal_stays_inside_root() {
        let (dir, backend) = setup();
        fs::write(dir.path().join("inside.txt"), "x").unwrap();

        // Lexical escapes are clamped at the virtual root, so these resolve
        // to paths inside the sandbox rather than outside it.
        assert!(backend.exists("/../inside.txt").unwrap());
        assert!(!backend.exists("/../../etc/passwd").unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_is_rejected() {
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("secret.txt"), "secret").unwrap();

        let (dir, backend) = setup();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("escape")).unwrap();

        let err = match backend.read("/escape/secret.txt") {
            Ok(_) => panic!("expected an error"),
            Err(e) => e,
        };
        assert!(matches!(err, CuratorError::InvalidPath { .. }));

        let err = backend.list("/escape").unwrap_err();
        assert!(matches!(err, CuratorError::InvalidPath { .. }));
    }
}
