use ::warp::reply::Response;
use ::warp::{http::StatusCode, Reply};

/// 200 when the item store can be read, otherwise 503.
pub(crate) async fn handler(state: ::std::sync::Arc<crate::State>) -> Response {
    use ::serde_json::json;
    use ::tokio::time::{timeout, Duration};

    let store_ok = timeout(Duration::from_secs(2), state.board.store_healthy())
        .await
        .unwrap_or(false);

    let body = json!({
        "store": store_ok,
        "status": if store_ok { "ok" } else { "degraded" }
    });

    let status = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    ::warp::reply::with_status(::warp::reply::json(&body), status)
        .into_response()
}
