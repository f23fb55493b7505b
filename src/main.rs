use ::envconfig::Envconfig;
use ::log::*;

use lost_found::config::{Config, Mode};

#[tokio::main]
async fn main() -> Result<(), Box<dyn ::std::error::Error>> {
    ::env_logger::init();

    let config = Config::init_from_env()?;

    let state = ::std::sync::Arc::new(
        lost_found::State::from_config(&config).await?,
    );

    match config.mode {
        Mode::BackfillIds => {
            let items = state.board.list_items().await;
            info!("Backfill complete, {} items on the board", items.len());
        }
        Mode::ServeAPI => {
            let routes = lost_found::routes(state);

            let address = ::std::net::SocketAddr::new(
                config.http_bind_address,
                config.http_port_api,
            );

            info!("Listening on {}", address);
            ::warp::serve(routes).run(address).await;
        }
    }

    Ok(())
}
