use ::bytes::Buf;
use ::futures::TryStreamExt;

/// Fields collected from a `multipart/form-data` submission.
#[derive(Default)]
struct ItemForm {
    name: Option<String>,
    description: Option<String>,
    image: Option<(String, Vec<u8>)>,
}

/// The original JSON schema, where `image` is an inline reference.
#[derive(::serde::Deserialize)]
struct CreateItemRequest {
    name: Option<String>,
    description: Option<String>,
    image: Option<String>,
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

async fn read_part(part: ::warp::multipart::Part) -> ::anyhow::Result<Vec<u8>> {
    let data = part
        .stream()
        .try_fold(Vec::new(), |mut data, buf| async move {
            data.extend_from_slice(buf.chunk());
            Ok(data)
        })
        .await?;

    Ok(data)
}

async fn read_form(
    mut form: ::warp::multipart::FormData,
) -> ::anyhow::Result<ItemForm> {
    let mut result = ItemForm::default();

    while let Some(part) = form.try_next().await? {
        let field = part.name().to_string();
        let filename = part.filename().map(str::to_string);
        let data = read_part(part).await?;

        match field.as_str() {
            "name" => result.name = Some(String::from_utf8(data)?),
            "description" => {
                result.description = Some(String::from_utf8(data)?)
            }
            "image" => {
                result.image = filename
                    .filter(|filename| !filename.is_empty())
                    .map(|filename| (filename, data));
            }
            _ => {
                ::log::debug!("ignoring form field {}", field);
            }
        }
    }

    Ok(result)
}

fn created(
    state: &crate::State,
    item: crate::model::Item,
) -> Box<dyn ::warp::Reply> {
    crate::handlers::util::count_metric(state, "items.created");

    Box::new(::warp::reply::with_status(
        ::warp::reply::json(&::serde_json::json!({
            "success": true,
            "item": item,
        })),
        ::warp::http::StatusCode::CREATED,
    ))
}

pub(crate) async fn multipart_handler(
    state: ::std::sync::Arc<crate::State>,
    form: ::warp::multipart::FormData,
) -> Result<Box<dyn ::warp::Reply>, ::std::convert::Infallible> {
    let form = crate::warp_try_err_400!(read_form(form)
        .await
        .map_err(|_| ::anyhow::anyhow!("Invalid multipart form")));

    let (name, description, (filename, payload)) = match (
        non_empty(form.name),
        non_empty(form.description),
        form.image,
    ) {
        (Some(name), Some(description), Some(image)) => {
            (name, description, image)
        }
        _ => {
            return Ok(crate::handlers::util::error_reply(
                ::warp::http::StatusCode::BAD_REQUEST,
                crate::board::MISSING_FIELDS,
            ));
        }
    };

    let image = match state.uploads.save(&filename, &payload).await {
        Ok(image) => image,
        Err(err) => return Ok(crate::handlers::util::board_error_reply(&err)),
    };

    let item = crate::model::Item::new(name, description, image.clone());

    match state.board.append_item(item).await {
        Ok(item) => Ok(created(&state, item)),
        Err(err) => {
            if let Err(remove_err) = state.uploads.remove(&image).await {
                ::log::warn!(
                    "Unable to remove orphaned upload {}: {:?}",
                    image,
                    remove_err
                );
            }

            Ok(crate::handlers::util::board_error_reply(&err))
        }
    }
}

pub(crate) async fn json_handler(
    state: ::std::sync::Arc<crate::State>,
    bytes: ::bytes::Bytes,
) -> Result<Box<dyn ::warp::Reply>, ::std::convert::Infallible> {
    let request: CreateItemRequest = crate::warp_try_err_400!(
        ::serde_json::from_slice(&bytes)
            .map_err(|_| ::anyhow::anyhow!("Invalid JSON body"))
    );

    let (name, description, image) = match (
        non_empty(request.name),
        non_empty(request.description),
        non_empty(request.image),
    ) {
        (Some(name), Some(description), Some(image)) => {
            (name, description, image)
        }
        _ => {
            return Ok(crate::handlers::util::error_reply(
                ::warp::http::StatusCode::BAD_REQUEST,
                crate::board::MISSING_FIELDS,
            ));
        }
    };

    let item = crate::model::Item::new(name, description, image);

    match state.board.append_item(item).await {
        Ok(item) => Ok(created(&state, item)),
        Err(err) => Ok(crate::handlers::util::board_error_reply(&err)),
    }
}
