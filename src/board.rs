use crate::error::BoardError;
use crate::model::{generate_claim_code, generate_item_id, now_seconds, Item};
use crate::notify::interface::{Notification, Notifier};
use crate::store::interface::ItemStore;
use ::log::*;
use ::std::collections::HashSet;

pub const MISSING_FIELDS: &str =
    "Missing required fields: name, description, image";

/// Result of a successful claim.
#[derive(PartialEq, Clone, Debug)]
pub struct ClaimReceipt {
    pub item: Item,
    pub claim_code: String,
}

/// The item list and the operations on it.
///
/// Every read-modify-write cycle runs under `writer`, so two requests in
/// this process can never overwrite each other's changes. Plain reads do not
/// take the lock. Several processes sharing one file are still
/// last-writer-wins.
pub struct Board {
    store: Box<dyn ItemStore>,
    notifier: Box<dyn Notifier>,
    writer: ::tokio::sync::Mutex<()>,
}

impl Board {
    pub fn new(store: Box<dyn ItemStore>, notifier: Box<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            writer: ::tokio::sync::Mutex::new(()),
        }
    }

    /// The full list, newest first. Unreadable storage reads as empty.
    ///
    /// Records without an ID get one, and the backfilled list is saved
    /// before it is returned.
    pub async fn list_items(&self) -> Vec<Item> {
        let items = self.load().await;

        if items.iter().all(|item| item.id.is_some()) {
            return items;
        }

        let _guard = self.writer.lock().await;
        self.load_backfilled().await
    }

    /// Overwrite storage with `items`. Failures are logged, not raised.
    pub async fn save_items(&self, items: &[Item]) -> bool {
        match self.store.save(items).await {
            Ok(()) => true,
            Err(err) => {
                error!(
                    "Error writing items to {}: {:?}",
                    self.store.describe(),
                    err
                );
                false
            }
        }
    }

    /// Put `item` at the front of the list and save.
    pub async fn append_item(
        &self,
        mut item: Item,
    ) -> Result<Item, BoardError> {
        if [&item.name, &item.description, &item.image]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(BoardError::Validation(MISSING_FIELDS.to_string()));
        }

        if item.id.is_none() {
            item.id = Some(generate_item_id(None));
        }

        let _guard = self.writer.lock().await;

        let mut items = self.load_for_write().await?;
        items.insert(0, item.clone());

        self.store
            .save(&items)
            .await
            .map_err(|err| BoardError::storage("Failed to save item", err))?;

        info!("Added item {}", item.id.as_deref().unwrap_or_default());

        Ok(item)
    }

    /// Claim `item_id` for `email`.
    ///
    /// The claim is durable when this returns. Telling the administrator is
    /// left to [`Board::notify_claim`].
    pub async fn claim(
        &self,
        item_id: &str,
        email: &str,
    ) -> Result<ClaimReceipt, BoardError> {
        let email = email.trim();

        if !is_valid_email(email) {
            return Err(BoardError::Validation(
                "Invalid email address".to_string(),
            ));
        }

        let claimed = {
            let _guard = self.writer.lock().await;

            let mut items = self.load_for_write().await?;

            let item = items
                .iter_mut()
                .find(|item| item.id.as_deref() == Some(item_id))
                .ok_or_else(|| {
                    BoardError::NotFound(format!(
                        "Item not found: {}",
                        item_id
                    ))
                })?;

            if item.is_claimed() {
                return Err(BoardError::Conflict(
                    "Item has already been claimed".to_string(),
                ));
            }

            item.mark_claimed(
                generate_claim_code(),
                email.to_string(),
                now_seconds(),
            );
            let claimed = item.clone();

            self.store.save(&items).await.map_err(|err| {
                BoardError::storage("Failed to save claim", err)
            })?;

            claimed
        };

        info!("Item {} claimed", item_id);

        let claim_code = claimed.claim_code.clone().unwrap_or_default();

        Ok(ClaimReceipt {
            item: claimed,
            claim_code,
        })
    }

    /// Tell the administrator about a claimed item. Failures are logged and
    /// reported as `false`; the claim itself is never undone.
    pub async fn notify_claim(&self, item: &Item) -> bool {
        match self.notifier.notify(&Notification::claim(item)).await {
            Ok(()) => true,
            Err(err) => {
                error!(
                    "Failed to notify administrator of claim on {}: {:?}",
                    item.id.as_deref().unwrap_or_default(),
                    err
                );
                false
            }
        }
    }

    /// Whether the store can currently be read.
    pub async fn store_healthy(&self) -> bool {
        self.store.list().await.is_ok()
    }

    async fn load(&self) -> Vec<Item> {
        match self.store.list().await {
            Ok(Some(items)) => items,
            Ok(None) => Vec::new(),
            Err(err) => {
                error!(
                    "Error reading items from {}: {:?}",
                    self.store.describe(),
                    err
                );
                Vec::new()
            }
        }
    }

    // Caller must hold `writer`.
    async fn load_backfilled(&self) -> Vec<Item> {
        let mut items = self.load().await;
        self.persist_backfill(&mut items).await;
        items
    }

    /// Like `load_backfilled`, but an unreadable store is an error so a
    /// writer never replaces a list it could not read. Caller must hold
    /// `writer`.
    async fn load_for_write(&self) -> Result<Vec<Item>, BoardError> {
        let mut items = match self.store.list().await {
            Ok(Some(items)) => items,
            Ok(None) => Vec::new(),
            Err(err) => {
                return Err(BoardError::storage("Failed to read items", err));
            }
        };

        self.persist_backfill(&mut items).await;

        Ok(items)
    }

    async fn persist_backfill(&self, items: &mut [Item]) {
        let assigned = backfill_ids(items);

        if assigned > 0 {
            info!("Assigned IDs to {} legacy items", assigned);

            if !self.save_items(items).await {
                warn!("Backfilled IDs were not persisted");
            }
        }
    }
}

/// Give every item without an ID a fresh one. Returns how many were assigned.
pub fn backfill_ids(items: &mut [Item]) -> usize {
    let mut taken: HashSet<String> =
        items.iter().filter_map(|item| item.id.clone()).collect();

    let mut assigned = 0;

    for (index, item) in items.iter_mut().enumerate() {
        if item.id.is_some() {
            continue;
        }

        let mut id = generate_item_id(Some(index));
        while taken.contains(&id) {
            id = generate_item_id(Some(index));
        }

        taken.insert(id.clone());
        item.id = Some(id);
        assigned += 1;
    }

    assigned
}

pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && email.contains('@')
}
