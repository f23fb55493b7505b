use ::warp::http::StatusCode;
use ::warp::Reply;

/// `{"error": message}` with `status`.
pub fn error_reply(status: StatusCode, message: &str) -> Box<dyn Reply> {
    Box::new(::warp::reply::with_status(
        ::warp::reply::json(&::serde_json::json!({ "error": message })),
        status,
    ))
}

pub fn board_error_reply(err: &crate::error::BoardError) -> Box<dyn Reply> {
    match err {
        crate::error::BoardError::Storage { message, cause } => {
            ::log::error!("{}: {:?}", message, cause);
        }
        _ => {
            ::log::info!("rejected request: {}", err);
        }
    }

    error_reply(err.status_code(), &err.to_string())
}

pub fn count_metric(state: &crate::State, metric: &str) {
    use ::cadence::Counted;

    if let Err(err) = state.statsd_client.count(metric, 1) {
        ::log::warn!("Unable to log {} metric due to: {}", metric, err);
    }
}

pub async fn handle_rejection(
    err: ::warp::Rejection,
) -> Result<Box<dyn Reply>, ::std::convert::Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found")
    } else if err.find::<::warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else if err.find::<::warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Upload too large")
    } else if err.find::<::warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Content-Length required")
    } else if err.find::<::warp::reject::UnsupportedMediaType>().is_some() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported content type")
    } else if err.find::<::warp::reject::MissingHeader>().is_some()
        || err.find::<::warp::reject::InvalidHeader>().is_some()
    {
        (StatusCode::BAD_REQUEST, "Bad request")
    } else {
        ::log::warn!("rejection {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    };

    Ok(error_reply(status, message))
}
