use crate::model::Item;
use ::anyhow::Result;

/// Durable home of the item list. The list is always read and written whole.
#[async_trait::async_trait]
pub trait ItemStore: Send + Sync {
    /// `None` when nothing has been stored yet.
    async fn list(&self) -> Result<Option<Vec<Item>>>;

    async fn save(&self, items: &[Item]) -> Result<()>;

    fn describe(&self) -> String;
}
