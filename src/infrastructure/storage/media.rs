use std::{
    io,
    path::{Component, Path, PathBuf},
};

use async_trait::async_trait;
use derive_more::Display;
use tokio::fs;
use uuid::Uuid;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

const RESUME_TYPES: &[&str] = &[
    "application/pdf",
    "application/rtf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/x-ole-storage",
    "application/zip",
];

/// What an upload is for. Decides the allowed content and the folder under the media root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Resume,
    ProfileImage,
    CompanyLogo,
}

impl MediaKind {
    pub fn directory(&self) -> &'static str {
        match self {
            MediaKind::Resume => "resumes",
            MediaKind::ProfileImage => "user_profile_img",
            MediaKind::CompanyLogo => "company_logos",
        }
    }

    pub fn allowed_types(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Resume => RESUME_TYPES,
            MediaKind::ProfileImage | MediaKind::CompanyLogo => IMAGE_TYPES,
        }
    }
}

/// A stored file read back for download.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Display)]
pub enum UploadError {
    #[display("File is empty.")]
    Empty,

    #[display("File exceeds the maximum allowed size of {_0} bytes.")]
    TooLarge(usize),

    #[display("File type not allowed: {_0}")]
    UnsupportedType(String),

    #[display("Invalid file path.")]
    InvalidPath,

    #[display("File not found.")]
    NotFound,

    #[display("File storage failed: {_0}")]
    Io(io::Error),
}

impl From<io::Error> for UploadError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => UploadError::NotFound,
            _ => UploadError::Io(err),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Checks the uploaded temp file and copies it into the media root.
    /// Returns the path relative to the media root.
    async fn store(&self, kind: MediaKind, source: &Path) -> Result<String, UploadError>;

    async fn read(&self, relative_path: &str) -> Result<MediaFile, UploadError>;

    async fn remove(&self, relative_path: &str) -> Result<(), UploadError>;
}

/// Media kept on the local disk under `media_root`.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    max_bytes: usize,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        LocalMediaStore {
            root: root.into(),
            max_bytes,
        }
    }

    /// Joins a stored relative path onto the root, refusing anything that could escape it.
    fn resolve(&self, relative_path: &str) -> Result<PathBuf, UploadError> {
        let relative = Path::new(relative_path);
        if relative_path.is_empty()
            || !relative.components().all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(UploadError::InvalidPath);
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStore {
    async fn store(&self, kind: MediaKind, source: &Path) -> Result<String, UploadError> {
        let size = fs::metadata(source).await?.len();
        if size == 0 {
            return Err(UploadError::Empty);
        }
        if size > self.max_bytes as u64 {
            return Err(UploadError::TooLarge(self.max_bytes));
        }

        let detected = infer::get_from_path(source)?
            .ok_or_else(|| UploadError::UnsupportedType("unknown".to_string()))?;
        if !kind.allowed_types().contains(&detected.mime_type()) {
            return Err(UploadError::UnsupportedType(detected.mime_type().to_string()));
        }

        let relative_path = format!(
            "{}/{}.{}",
            kind.directory(),
            Uuid::new_v4(),
            detected.extension()
        );
        let target = self.resolve(&relative_path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::copy(source, &target).await?;

        tracing::debug!(path = %relative_path, size, "Stored upload");
        Ok(relative_path)
    }

    async fn read(&self, relative_path: &str) -> Result<MediaFile, UploadError> {
        let path = self.resolve(relative_path)?;
        let bytes = fs::read(&path).await?;

        let content_type = infer::get(&bytes)
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("download")
            .to_string();

        Ok(MediaFile { file_name, content_type, bytes })
    }

    async fn remove(&self, relative_path: &str) -> Result<(), UploadError> {
        let path = self.resolve(relative_path)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(UploadError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
    const PDF_HEADER: &[u8] = b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n1 0 obj\n";

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("jobboard-media-{}", Uuid::new_v4()))
    }

    async fn write_source(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        fs::create_dir_all(dir).await.unwrap();
        let path = dir.join(name);
        fs::write(&path, bytes).await.unwrap();
        path
    }

    #[tokio::test]
    async fn stores_a_resume_under_its_folder_and_reads_it_back() {
        let dir = scratch_dir();
        let store = LocalMediaStore::new(dir.join("media"), 1024);
        let source = write_source(&dir, "upload.tmp", PDF_HEADER).await;

        let stored = store.store(MediaKind::Resume, &source).await.unwrap();
        assert!(stored.starts_with("resumes/"));
        assert!(stored.ends_with(".pdf"));

        let file = store.read(&stored).await.unwrap();
        assert_eq!(file.content_type, "application/pdf");
        assert_eq!(file.bytes, PDF_HEADER);

        store.remove(&stored).await.unwrap();
        assert!(matches!(store.read(&stored).await, Err(UploadError::NotFound)));
        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn rejects_wrong_content_for_the_kind() {
        let dir = scratch_dir();
        let store = LocalMediaStore::new(dir.join("media"), 1024);
        let source = write_source(&dir, "resume.pdf", PNG_HEADER).await;

        let err = store.store(MediaKind::Resume, &source).await.unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType(ref t) if t == "image/png"));
        assert!(store.store(MediaKind::CompanyLogo, &source).await.is_ok());
        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn enforces_size_limit_and_empty_files() {
        let dir = scratch_dir();
        let store = LocalMediaStore::new(dir.join("media"), 4);
        let big = write_source(&dir, "big", PDF_HEADER).await;
        let empty = write_source(&dir, "empty", b"").await;

        assert!(matches!(store.store(MediaKind::Resume, &big).await, Err(UploadError::TooLarge(4))));
        assert!(matches!(store.store(MediaKind::Resume, &empty).await, Err(UploadError::Empty)));
        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn paths_outside_the_root_are_refused() {
        let store = LocalMediaStore::new(scratch_dir(), 1024);
        for path in ["../etc/passwd", "/etc/passwd", "resumes/../../x", ""] {
            assert!(matches!(store.read(path).await, Err(UploadError::InvalidPath)), "{path}");
        }
    }
}
