use crate::model::Item;
use crate::store::interface;
use ::anyhow::{Context, Result};
use ::std::path::{Path, PathBuf};

/// Stores the item list as one pretty-printed JSON array.
///
/// Saves go to a sibling temporary file which is then renamed over the
/// target, so a reader never sees a half-written list.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temporary_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "items.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait::async_trait]
impl interface::ItemStore for JsonFileStore {
    async fn list(&self) -> Result<Option<Vec<Item>>> {
        let contents = match ::tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ::std::io::ErrorKind::NotFound => {
                return Ok(None);
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("reading {}", self.path.display())
                });
            }
        };

        let items = ::serde_json::from_slice(&contents)
            .with_context(|| format!("parsing {}", self.path.display()))?;

        Ok(Some(items))
    }

    async fn save(&self, items: &[Item]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                ::tokio::fs::create_dir_all(parent).await.with_context(
                    || format!("creating {}", parent.display()),
                )?;
            }
        }

        let serialized = ::serde_json::to_vec_pretty(items)?;
        let temporary = self.temporary_path();

        ::tokio::fs::write(&temporary, serialized)
            .await
            .with_context(|| format!("writing {}", temporary.display()))?;

        ::tokio::fs::rename(&temporary, &self.path)
            .await
            .with_context(|| {
                format!(
                    "renaming {} to {}",
                    temporary.display(),
                    self.path.display()
                )
            })?;

        Ok(())
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
