use crate::model::Item;
use crate::store::interface;
use ::anyhow::Result;
use ::tokio::sync::RwLock;

pub struct MemoryStore {
    items: RwLock<Option<Vec<Item>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(None),
        }
    }

    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: RwLock::new(Some(items)),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl interface::ItemStore for MemoryStore {
    async fn list(&self) -> Result<Option<Vec<Item>>> {
        Ok(self.items.read().await.clone())
    }

    async fn save(&self, items: &[Item]) -> Result<()> {
        *self.items.write().await = Some(items.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::interface::ItemStore;

    #[tokio::test]
    async fn empty_until_saved() {
        let store = MemoryStore::new();
        assert_eq!(store.list().await.unwrap(), None);

        store.save(&[]).await.unwrap();
        assert_eq!(store.list().await.unwrap(), Some(vec![]));
    }

    #[tokio::test]
    async fn with_items_is_listed() {
        let item = Item::new(
            "Scarf".to_string(),
            "Red wool".to_string(),
            "scarf.jpg".to_string(),
        );
        let store = MemoryStore::with_items(vec![item.clone()]);

        assert_eq!(store.list().await.unwrap(), Some(vec![item]));
    }
}
