//! Dynamic DNS example
//!
//! Logs in, looks up a single A record and points it at a new address.
//!
//! Run with:
//!
//! ```text
//! INWX_USER=... INWX_PASS=... INWX_DOMAIN=example.com INWX_RECORD=home \
//!     INWX_CONTENT=192.0.2.10 cargo run --example dyndns
//! ```

use inwx::{DomRobot, Endpoint};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct InfoParams<'a> {
    domain: &'a str,
    name: &'a str,
    #[serde(rename = "type")]
    record_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct NameserverInfo {
    domain: String,
    #[serde(default)]
    count: u64,
    #[serde(default)]
    record: Vec<Record>,
}

#[derive(Debug, Deserialize)]
struct Record {
    id: i64,
    name: String,
    #[serde(default)]
    content: String,
}

#[derive(Serialize)]
struct UpdateParams<'a> {
    id: i64,
    content: &'a str,
}

fn env(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    std::env::var(name).map_err(|_| format!("{} is not set", name).into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let user = env("INWX_USER")?;
    let pass = env("INWX_PASS")?;
    let domain = env("INWX_DOMAIN")?;
    let record = env("INWX_RECORD")?;
    let content = env("INWX_CONTENT")?;

    let client = DomRobot::connect(Endpoint::Production)?;

    client.login(&user, &pass).await?;
    println!("Logged in as {}", user);

    let info: NameserverInfo = client
        .call_typed(
            "nameserver.info",
            InfoParams {
                domain: &domain,
                name: &record,
                record_type: "A",
            },
        )
        .await?;

    if info.count != 1 || info.record.len() != 1 {
        client.logout().await?;
        return Err(format!(
            "expected exactly one A record for {}.{}, found {}",
            record, info.domain, info.count
        )
        .into());
    }

    let current = &info.record[0];
    println!("{} currently points to {}", current.name, current.content);

    if current.content == content {
        println!("Nothing to update");
    } else {
        client
            .call(
                "nameserver.updateRecord",
                UpdateParams {
                    id: current.id,
                    content: &content,
                },
            )
            .await?;
        println!("{} now points to {}", current.name, content);
    }

    client.logout().await?;
    Ok(())
}
