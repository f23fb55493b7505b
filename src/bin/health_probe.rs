//! Container health check for the board.
//!
//! Queries `/health` once and exits 0 only when the server answers 200 with
//! a readable item store. The store state is printed for `docker inspect`.
//!
//! Environment variables (optional):
//!   HTTP_PORT_API   Port to query (default: 8081)
//!   HOST            Hostname (default: localhost)
//!   HEALTH_PATH     Path to query (default: /health)

use std::{env, process::exit, time::Duration};

async fn probe(url: &str) -> anyhow::Result<(u16, serde_json::Value)> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()?;

    let response = client.get(url).send().await?;
    let status = response.status().as_u16();
    let body = response.json::<serde_json::Value>().await?;

    Ok((status, body))
}

#[tokio::main]
async fn main() {
    let port = env::var("HTTP_PORT_API").unwrap_or_else(|_| "8081".into());
    let host = env::var("HOST").unwrap_or_else(|_| "localhost".into());
    let path = env::var("HEALTH_PATH").unwrap_or_else(|_| "/health".into());

    let url = format!("http://{host}:{port}{path}");

    match probe(&url).await {
        Ok((200, body)) => {
            println!("Health OK: store={}", body["store"]);
            exit(0);
        }
        Ok((status, body)) => {
            eprintln!("Unhealthy ({status}): {body}");
            exit(1);
        }
        Err(err) => {
            eprintln!("Request error: {err:#}");
            exit(1);
        }
    }
}
