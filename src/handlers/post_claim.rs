pub(crate) const MAX_BODY_BYTES: u64 = 16 * 1024;

#[derive(::serde::Deserialize)]
struct ClaimRequest {
    #[serde(default)]
    email: String,
}

pub(crate) async fn handler(
    item_id: String,
    state: ::std::sync::Arc<crate::State>,
    bytes: ::bytes::Bytes,
) -> Result<Box<dyn ::warp::Reply>, ::std::convert::Infallible> {
    let request: ClaimRequest = crate::warp_try_err_400!(
        ::serde_json::from_slice(&bytes)
            .map_err(|_| ::anyhow::anyhow!("Invalid JSON body"))
    );

    let receipt = match state.board.claim(&item_id, &request.email).await {
        Ok(receipt) => receipt,
        Err(err) => return Ok(crate::handlers::util::board_error_reply(&err)),
    };

    crate::handlers::util::count_metric(&state, "items.claimed");

    // The claim is saved; the reply does not wait on notifier retries.
    let notify_state = state.clone();
    let claimed = receipt.item.clone();
    ::tokio::spawn(async move {
        if !notify_state.board.notify_claim(&claimed).await {
            crate::handlers::util::count_metric(
                &notify_state,
                "notifications.failed",
            );
        }
    });

    Ok(Box::new(::warp::reply::json(&::serde_json::json!({
        "success": true,
        "claim_code": receipt.claim_code,
        "item": receipt.item,
    }))))
}
