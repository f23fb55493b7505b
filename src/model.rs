use ::rand::Rng;
use ::std::time::{SystemTime, UNIX_EPOCH};

const ITEM_ID_PREFIX: &str = "item";
const ITEM_ID_SEPARATOR: &str = "_";
const ITEM_ID_TOKEN_BYTES: usize = 4;
const CLAIM_CODE_BYTES: usize = 3;

/// One reported found object.
///
/// `id` is optional only because records written before IDs existed are
/// still readable; the board assigns one on first read.
#[derive(
    ::serde::Serialize, ::serde::Deserialize, PartialEq, Eq, Clone, Debug,
)]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_at: Option<u64>,
}

impl Item {
    pub fn new(name: String, description: String, image: String) -> Item {
        Item {
            id: None,
            name,
            description,
            image,
            claim_code: None,
            claimed_email: None,
            claimed_at: None,
        }
    }

    pub fn with_id(mut self, id: String) -> Item {
        self.id = Some(id);
        self
    }

    pub fn is_claimed(&self) -> bool {
        self.claim_code.is_some()
    }

    /// Record a claim. The three claim fields are only ever set together.
    pub fn mark_claimed(
        &mut self,
        claim_code: String,
        email: String,
        claimed_at: u64,
    ) {
        self.claim_code = Some(claim_code);
        self.claimed_email = Some(email);
        self.claimed_at = Some(claimed_at);
    }
}

fn random_hex(bytes: usize) -> String {
    let mut rng = ::rand::thread_rng();
    (0..bytes)
        .map(|_| format!("{:02x}", rng.gen::<u8>()))
        .collect()
}

/// `item_<millis>[_<index>]_<hex8>`
pub fn generate_item_id(index: Option<usize>) -> String {
    let mut parts = vec![ITEM_ID_PREFIX.to_string(), now_millis().to_string()];

    if let Some(index) = index {
        parts.push(index.to_string());
    }

    parts.push(random_hex(ITEM_ID_TOKEN_BYTES));
    parts.join(ITEM_ID_SEPARATOR)
}

/// Six uppercase hex characters. Not checked for uniqueness.
pub fn generate_claim_code() -> String {
    random_hex(CLAIM_CODE_BYTES).to_uppercase()
}

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or(0)
}

pub fn now_seconds() -> u64 {
    now_millis() / 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_hex(s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_hexdigit())
    }

    #[test]
    fn item_id_without_index_has_three_parts() {
        let id = generate_item_id(None);
        let parts: Vec<&str> = id.split('_').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "item");
        assert!(parts[1].parse::<u64>().is_ok());
        assert_eq!(parts[2].len(), 8);
        assert!(is_hex(parts[2]));
    }

    #[test]
    fn item_id_with_index_carries_it() {
        let id = generate_item_id(Some(7));
        let parts: Vec<&str> = id.split('_').collect();

        assert_eq!(parts.len(), 4);
        assert_eq!(parts[2], "7");
    }

    #[test]
    fn item_ids_differ_within_one_millisecond() {
        let ids: ::std::collections::HashSet<String> =
            (0..100).map(|_| generate_item_id(None)).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn claim_code_is_six_uppercase_hex() {
        for _ in 0..50 {
            let code = generate_claim_code();
            assert_eq!(code.len(), 6);
            assert!(is_hex(&code));
            assert_eq!(code, code.to_uppercase());
        }
    }

    #[test]
    fn legacy_record_without_id_deserializes() {
        let item: Item = ::serde_json::from_str(
            r#"{
                "name": "Umbrella",
                "description": "Black",
                "image": "data:image/png;base64,AAAA"
            }"#,
        )
        .unwrap();

        assert_eq!(item.id, None);
        assert!(!item.is_claimed());
    }

    #[test]
    fn unclaimed_item_omits_claim_fields() {
        let item = Item::new(
            "Keys".to_string(),
            "Three keys on a ring".to_string(),
            "/static/uploads/keys_1.jpg".to_string(),
        )
        .with_id("item_1".to_string());

        let value = ::serde_json::to_value(&item).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 4);
        assert!(!object.contains_key("claim_code"));
    }

    #[test]
    fn mark_claimed_sets_all_fields() {
        let mut item = Item::new(
            "Keys".to_string(),
            "Ring".to_string(),
            "img".to_string(),
        );
        item.mark_claimed("ABC123".to_string(), "a@b.com".to_string(), 42);

        assert!(item.is_claimed());
        assert_eq!(item.claimed_email.as_deref(), Some("a@b.com"));
        assert_eq!(item.claimed_at, Some(42));
    }
}
