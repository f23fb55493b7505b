use crate::model::Item;
use ::anyhow::Result;

/// A message for the board administrator.
#[derive(::serde::Serialize, PartialEq, Clone, Debug)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// Tell the administrator that `item` has just been claimed.
    pub fn claim(item: &Item) -> Notification {
        let subject = format!("Claim request for \"{}\"", item.name);

        let body = format!(
            "A found item has been claimed.\n\
             \n\
             Claim code: {}\n\
             Claimant email: {}\n\
             Claimed at: {}\n\
             \n\
             Item ID: {}\n\
             Name: {}\n\
             Description: {}\n\
             Image: {}\n",
            item.claim_code.as_deref().unwrap_or("-"),
            item.claimed_email.as_deref().unwrap_or("-"),
            item.claimed_at
                .map(|at| at.to_string())
                .unwrap_or_else(|| "-".to_string()),
            item.id.as_deref().unwrap_or("-"),
            item.name,
            item.description,
            item.image,
        );

        Notification { subject, body }
    }
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<()>;
}
