use ::warp::Reply;

pub(crate) async fn handler(
    state: ::std::sync::Arc<crate::State>,
) -> ::warp::reply::Response {
    let items = state.board.list_items().await;

    ::warp::reply::json(&items).into_response()
}
