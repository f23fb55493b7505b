use crate::error::BoardError;
use crate::model::now_millis;
use ::anyhow::Context;
use ::std::path::PathBuf;
use ::tokio::io::AsyncWriteExt;

const DEFAULT_EXTENSION: &str = ".jpg";

lazy_static::lazy_static! {
    static ref UNSAFE_CHARACTERS: ::regex::Regex =
        ::regex::Regex::new(r"[^A-Za-z0-9._-]+").unwrap();
    static ref WHITESPACE: ::regex::Regex =
        ::regex::Regex::new(r"\s+").unwrap();
}

/// Reduce a client supplied filename to a safe basename.
///
/// Directory components are dropped, whitespace becomes `_`, anything
/// outside `[A-Za-z0-9._-]` is removed and leading dots and underscores are
/// stripped. `None` when nothing usable is left.
pub fn sanitize_filename(filename: &str) -> Option<String> {
    let basename = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();

    let spaced = WHITESPACE.replace_all(basename.trim(), "_");
    let cleaned = UNSAFE_CHARACTERS.replace_all(&spaced, "");
    let cleaned = cleaned.trim_start_matches(|c: char| c == '.' || c == '_');

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// `<stem>_<millis><ext>`, falling back to `.jpg` when there is no extension.
pub fn stored_filename(sanitized: &str, millis: u64) -> String {
    let (stem, extension) = match sanitized.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < sanitized.len() => (
            &sanitized[..dot],
            sanitized[dot..].to_ascii_lowercase(),
        ),
        Some(dot) if dot > 0 => {
            (&sanitized[..dot], DEFAULT_EXTENSION.to_string())
        }
        _ => (sanitized, DEFAULT_EXTENSION.to_string()),
    };

    format!("{}_{}{}", stem, millis, extension)
}

/// Writes uploaded images below `<static_root>/<subdir>`.
pub struct UploadStore {
    static_root: PathBuf,
    subdir: String,
}

impl UploadStore {
    pub fn new(
        static_root: impl Into<PathBuf>,
        subdir: impl Into<String>,
    ) -> Self {
        Self {
            static_root: static_root.into(),
            subdir: subdir.into(),
        }
    }

    pub fn directory(&self) -> PathBuf {
        self.static_root.join(&self.subdir)
    }

    /// Public path under which a stored file is served.
    pub fn public_path(&self, stored_name: &str) -> String {
        format!("/static/{}/{}", self.subdir, stored_name)
    }

    /// Delete a file previously returned by [`UploadStore::save`].
    ///
    /// Paths outside the uploads directory are refused.
    pub async fn remove(&self, public_path: &str) -> ::anyhow::Result<()> {
        let prefix = self.public_path("");

        let stored_name = public_path
            .strip_prefix(prefix.as_str())
            .filter(|name| {
                !name.is_empty()
                    && sanitize_filename(name).as_deref() == Some(*name)
            })
            .ok_or_else(|| {
                ::anyhow::anyhow!("not an uploaded file: {}", public_path)
            })?;

        let path = self.directory().join(stored_name);

        ::tokio::fs::remove_file(&path)
            .await
            .with_context(|| format!("removing {}", path.display()))?;

        ::log::info!("Removed upload {}", path.display());

        Ok(())
    }

    /// Persist `payload` and return the path clients use to fetch it.
    ///
    /// Never overwrites an earlier upload: if the timestamped name is taken
    /// the timestamp is bumped until a free name is found.
    pub async fn save(
        &self,
        filename: &str,
        payload: &[u8],
    ) -> Result<String, BoardError> {
        let sanitized = sanitize_filename(filename).ok_or_else(|| {
            BoardError::Validation("Invalid filename".to_string())
        })?;

        let directory = self.directory();

        ::tokio::fs::create_dir_all(&directory)
            .await
            .with_context(|| format!("creating {}", directory.display()))
            .map_err(|err| BoardError::storage("Failed to save image", err))?;

        let mut millis = now_millis();

        loop {
            let stored_name = stored_filename(&sanitized, millis);
            let path = directory.join(&stored_name);

            let file = ::tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;

            match file {
                Ok(mut file) => {
                    let written = async {
                        file.write_all(payload).await?;
                        file.flush().await
                    }
                    .await
                    .with_context(|| format!("writing {}", path.display()));

                    if let Err(err) = written {
                        let _ = ::tokio::fs::remove_file(&path).await;
                        return Err(BoardError::storage(
                            "Failed to save image",
                            err,
                        ));
                    }

                    ::log::info!("Stored upload {}", path.display());

                    return Ok(self.public_path(&stored_name));
                }
                Err(err)
                    if err.kind() == ::std::io::ErrorKind::AlreadyExists =>
                {
                    millis += 1;
                }
                Err(err) => {
                    return Err(BoardError::storage(
                        "Failed to save image",
                        ::anyhow::Error::from(err)
                            .context(format!("creating {}", path.display())),
                    ));
                }
            }
        }
    }
}
