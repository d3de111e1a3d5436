use std::net::SocketAddr;

use axum::Router;
use configs::DatabaseConfig;
use tokio::net::TcpListener;

use crate::items::MongoItemRepository;

/// Repository on a throwaway collection when `MONGODB_URI` is set.
pub async fn mongo_repository() -> Option<MongoItemRepository> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let uri = std::env::var("MONGODB_URI").ok()?;
    let cfg = DatabaseConfig {
        uri,
        name: std::env::var("DATABASENAME").unwrap_or_else(|_| "prompt_relay_test".into()),
        collection: format!("items_test_{}", bson::oid::ObjectId::new().to_hex()),
        ..DatabaseConfig::default()
    };
    let client = match models::db::connect(&cfg).await {
        Ok(c) => c,
        Err(e) => {
            eprintln!("skip: cannot connect to mongodb: {e}");
            return None;
        }
    };
    Some(MongoItemRepository::new(models::db::collection(&client, &cfg)))
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind mock upstream");
    let addr: SocketAddr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            eprintln!("mock upstream error: {e}");
        }
    });
    format!("http://{}:{}", addr.ip(), addr.port())
}
