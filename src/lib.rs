use ::cadence::{NopMetricSink, StatsdClient, UdpMetricSink};
use ::warp::Filter;

pub mod board;
pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod notify;
pub mod store;
pub mod uploads;
pub mod version;

/// Turn an `Err` into a 400 JSON reply carrying the error's message.
#[macro_export]
macro_rules! warp_try_err_400 {
    ($expr:expr) => {
        match $expr {
            Ok(x) => x,
            Err(err) => {
                ::log::info!("bad request: {:?}", err);
                return Ok($crate::handlers::util::error_reply(
                    ::warp::http::StatusCode::BAD_REQUEST,
                    &err.to_string(),
                ));
            }
        }
    };
}

const STATSD_PREFIX: &str = "lost_found";

pub struct State {
    pub board: board::Board,
    pub uploads: uploads::UploadStore,
    pub statsd_client: StatsdClient,
    pub max_upload_bytes: u64,
}

impl State {
    pub async fn from_config(
        config: &config::Config,
    ) -> ::anyhow::Result<State> {
        let store = store::make_provider(config)?;
        let notifier = notify::make_provider(config)?;

        Ok(State {
            board: board::Board::new(store, notifier),
            uploads: uploads::UploadStore::new(
                config.static_root.clone(),
                config.uploads_subdir.clone(),
            ),
            statsd_client: make_statsd_client(config)?,
            max_upload_bytes: config.max_upload_bytes,
        })
    }
}

fn make_statsd_client(
    config: &config::Config,
) -> ::anyhow::Result<StatsdClient> {
    match &config.statsd_address {
        Some(address) => {
            let socket = ::std::net::UdpSocket::bind("0.0.0.0:0")?;
            socket.set_nonblocking(true)?;
            let sink = UdpMetricSink::from(
                (address.as_str(), config.statsd_port),
                socket,
            )?;
            ::log::info!(
                "Sending metrics to {}:{}",
                address,
                config.statsd_port
            );
            Ok(StatsdClient::from_sink(STATSD_PREFIX, sink))
        }
        None => Ok(StatsdClient::from_sink(STATSD_PREFIX, NopMetricSink)),
    }
}

/// Every route the server exposes, with rejection recovery and CORS applied.
pub fn routes(
    state: ::std::sync::Arc<State>,
) -> impl Filter<
    Extract = (impl ::warp::Reply,),
    Error = ::std::convert::Infallible,
> + Clone {
    let cors = ::warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(&[
            ::warp::http::Method::POST,
            ::warp::http::Method::GET,
        ]);

    let max_upload_bytes = state.max_upload_bytes;
    let state_filter = ::warp::any().map(move || state.clone());

    let get_items_route = ::warp::path!("api" / "items")
        .and(::warp::get())
        .and(state_filter.clone())
        .then(handlers::get_items::handler);

    let post_items_multipart_route = ::warp::path!("api" / "items")
        .and(::warp::post())
        .and(state_filter.clone())
        .and(::warp::multipart::form().max_length(max_upload_bytes))
        .and_then(handlers::post_items::multipart_handler);

    let post_items_json_route = ::warp::path!("api" / "items")
        .and(::warp::post())
        .and(state_filter.clone())
        .and(::warp::body::content_length_limit(max_upload_bytes))
        .and(::warp::body::bytes())
        .and_then(handlers::post_items::json_handler);

    let post_claim_route = ::warp::path!("api" / "items" / String / "claim")
        .and(::warp::post())
        .and(state_filter.clone())
        .and(::warp::body::content_length_limit(
            handlers::post_claim::MAX_BODY_BYTES,
        ))
        .and(::warp::body::bytes())
        .and_then(handlers::post_claim::handler);

    let get_health_route = ::warp::path!("health")
        .and(::warp::get())
        .and(state_filter.clone())
        .then(handlers::get_health::handler);

    let get_version_route = ::warp::path!("version")
        .and(::warp::get())
        .then(handlers::get_version::handler);

    get_items_route
        .or(post_items_multipart_route)
        .or(post_items_json_route)
        .or(post_claim_route)
        .or(get_health_route)
        .or(get_version_route)
        .with(cors)
        .recover(handlers::util::handle_rejection)
}
