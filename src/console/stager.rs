//! Staged image uploads for the open modal.
//!
//! Files picked or dropped into a form are held here until save; nothing is
//! uploaded early. Each staged file gets a previewable temporary URL that
//! must be revoked exactly once, either when the file is removed or when the
//! owning modal closes, so preview handles never outlive their element.

use std::collections::HashSet;

use uuid::Uuid;

/// A candidate file handed to the stager (from a file picker or a drop).
#[derive(Debug, Clone)]
pub struct FileInput {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// An image held in memory awaiting submission with its record.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub name: String,
    pub size: u64,
    pub content_type: String,
    pub bytes: Vec<u8>,
    /// Temporary preview URL owned by this entry.
    pub preview: String,
}

/// Registry of minted preview URLs, the object-URL analogue.
///
/// `create` mints, `revoke` releases; the outstanding set lets the screen
/// assert that nothing leaks once the modal is closed.
#[derive(Debug, Default)]
pub struct PreviewUrls {
    outstanding: HashSet<String>,
    minted: usize,
    revoked: usize,
}

impl PreviewUrls {
    pub fn create(&mut self) -> String {
        let url = format!("blob:gem-console/{}", Uuid::new_v4());
        self.outstanding.insert(url.clone());
        self.minted += 1;
        url
    }

    /// Release a preview URL. Revoking an unknown or already-revoked URL is
    /// a no-op and returns false.
    pub fn revoke(&mut self, url: &str) -> bool {
        let removed = self.outstanding.remove(url);
        if removed {
            self.revoked += 1;
        }
        removed
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    pub fn minted(&self) -> usize {
        self.minted
    }

    pub fn revoked(&self) -> usize {
        self.revoked
    }
}

/// Queue of pending images for one form, deduplicated by `(name, size)`.
#[derive(Debug, Default)]
pub struct UploadStager {
    files: Vec<StagedFile>,
    previews: PreviewUrls,
}

impl UploadStager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a batch of files. Non-image files are silently dropped, and a
    /// file whose `(name, size)` matches an already-staged entry is skipped
    /// (a deliberately cheap heuristic, not a content hash). Returns the
    /// number of files actually staged; the host resets its file input
    /// afterwards so the same file can be re-picked after removal.
    pub fn add(&mut self, files: impl IntoIterator<Item = FileInput>) -> usize {
        let mut accepted = 0;
        for file in files {
            if !file.content_type.starts_with("image/") {
                continue;
            }
            let size = file.bytes.len() as u64;
            if self
                .files
                .iter()
                .any(|staged| staged.name == file.name && staged.size == size)
            {
                continue;
            }
            let preview = self.previews.create();
            self.files.push(StagedFile {
                name: file.name,
                size,
                content_type: file.content_type,
                bytes: file.bytes,
                preview,
            });
            accepted += 1;
        }
        accepted
    }

    /// Remove one staged file, revoking its preview URL. Out-of-range
    /// indices are ignored.
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.files.len() {
            return false;
        }
        let file = self.files.remove(index);
        self.previews.revoke(&file.preview);
        true
    }

    /// Drop the whole queue, revoking every outstanding preview URL first.
    /// Called on modal close and after a successful save.
    pub fn clear(&mut self) {
        for file in self.files.drain(..) {
            self.previews.revoke(&file.preview);
        }
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn previews(&self) -> &PreviewUrls {
        &self.previews
    }
}
