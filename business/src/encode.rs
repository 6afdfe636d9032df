//! Payload encoding: user-picked files into daemon-transportable records.

use std::path::PathBuf;

use crate::daemon::UploadRecord;

/// One element of a drop or picker selection, not yet read from disk.
#[derive(Debug, Clone)]
pub struct PickedFile {
    pub name: String,
    pub source: FileSource,
}

/// Where the bytes come from: a filesystem path (native drops and the file
/// picker) or bytes handed over directly by the windowing layer.
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl PickedFile {
    /// Build from a filesystem path; `None` when the path has no file name.
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().into_owned();
        Some(Self {
            name,
            source: FileSource::Path(path),
        })
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            source: FileSource::Bytes(bytes),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("file read task failed: {0}")]
    Task(String),
}

/// The daemon stores files under the uploaded name with every space turned
/// into an underscore. The front-end must apply the identical rule or
/// delete calls would miss the stored path.
pub fn normalize_file_name(name: &str) -> String {
    name.replace(' ', "_")
}

/// Read the file's full content and package it as an [`UploadRecord`].
///
/// A failed read fails the record, and the caller treats that as fatal for
/// the containing batch; there is no partial-record skipping.
pub async fn encode_file(file: PickedFile) -> Result<UploadRecord, EncodeError> {
    let name = normalize_file_name(&file.name);
    let data = match file.source {
        FileSource::Bytes(bytes) => bytes,
        FileSource::Path(path) => {
            tokio::fs::read(&path)
                .await
                .map_err(|source| EncodeError::Read {
                    name: name.clone(),
                    source,
                })?
        }
    };
    Ok(UploadRecord { name, data })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn spaces_become_underscores() {
        assert_eq!(normalize_file_name("a b.png"), "a_b.png");
        assert_eq!(normalize_file_name("a  b c.png"), "a__b_c.png");
        assert_eq!(normalize_file_name("plain.png"), "plain.png");
    }

    #[tokio::test]
    async fn encodes_bytes_sources_as_is() {
        let record = encode_file(PickedFile::from_bytes("a b.png", vec![9, 9]))
            .await
            .unwrap();
        assert_eq!(record.name, "a_b.png");
        assert_eq!(record.data, vec![9, 9]);
    }

    #[tokio::test]
    async fn reads_path_sources_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"pixels").unwrap();

        let picked = PickedFile {
            name: "wall paper.png".to_owned(),
            source: FileSource::Path(file.path().to_path_buf()),
        };
        let record = encode_file(picked).await.unwrap();
        assert_eq!(record.name, "wall_paper.png");
        assert_eq!(record.data, b"pixels");
    }

    #[tokio::test]
    async fn zero_byte_files_pass_through() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let picked = PickedFile::from_path(file.path().to_path_buf()).unwrap();

        let record = encode_file(picked).await.unwrap();
        assert!(record.data.is_empty());
    }

    #[tokio::test]
    async fn missing_file_fails_the_record() {
        let picked = PickedFile {
            name: "gone.png".to_owned(),
            source: FileSource::Path(PathBuf::from("/definitely/not/here.png")),
        };
        let err = encode_file(picked).await.unwrap_err();
        assert!(matches!(err, EncodeError::Read { ref name, .. } if name == "gone.png"));
    }

    #[test]
    fn from_path_requires_a_file_name() {
        assert!(PickedFile::from_path(PathBuf::from("/")).is_none());
        let picked = PickedFile::from_path(PathBuf::from("/tmp/shot.png")).unwrap();
        assert_eq!(picked.name, "shot.png");
    }
}
