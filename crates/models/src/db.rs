use std::time::Duration;

use anyhow::Context;
use bson::{doc, Document};
use configs::DatabaseConfig;
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection};
use tracing::{debug, info};

/// Build a client from `cfg` and verify the deployment answers a `ping`
/// before anything is served.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<Client> {
    debug!(database = %cfg.name, "setting up mongo client");

    let mut options = ClientOptions::parse(&cfg.uri).await.context("parse mongodb uri")?;
    let timeout = Duration::from_secs(cfg.connect_timeout_secs);
    options.app_name = Some(cfg.app_name.clone());
    options.connect_timeout = Some(timeout);
    options.server_selection_timeout = Some(timeout);
    options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());

    let client = Client::with_options(options).context("mongodb client")?;
    client
        .database(&cfg.name)
        .run_command(doc! { "ping": 1 }, None)
        .await
        .context("ping mongodb")?;

    info!(database = %cfg.name, collection = %cfg.collection, "connected to mongodb");
    Ok(client)
}

/// Untyped handle on the configured item collection.
pub fn collection(client: &Client, cfg: &DatabaseConfig) -> Collection<Document> {
    client.database(&cfg.name).collection::<Document>(&cfg.collection)
}
