use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Row;
use std::error::Error;
use std::str::FromStr;
use tracing::{info, warn};

use crate::domain::types::Coordinate;

pub async fn db_connection() -> Result<SqlitePool, Box<dyn Error>> {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        warn!("DATABASE_URL not set, using default SQLite file");
        "sqlite:cvrp_geocode.sqlite".to_string()
    });

    let options = SqliteConnectOptions::from_str(&database_url)?.create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;
    info!("Connected to SQLite database at {database_url}");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS geocode_cache (
            address TEXT PRIMARY KEY,
            lat REAL NOT NULL,
            lon REAL NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await?;

    Ok(pool)
}

/// Previously resolved coordinate for an address, if any.
pub async fn cached_coordinate(pool: &SqlitePool, address: &str) -> Option<Coordinate> {
    let row = sqlx::query("SELECT lat, lon FROM geocode_cache WHERE address = ?")
        .bind(address)
        .fetch_optional(pool)
        .await
        .ok()??;

    Some(Coordinate::new(row.get("lat"), row.get("lon")))
}

pub async fn store_coordinate(pool: &SqlitePool, address: &str, coordinate: &Coordinate) {
    let result =
        sqlx::query("INSERT OR REPLACE INTO geocode_cache (address, lat, lon) VALUES (?, ?, ?)")
            .bind(address)
            .bind(coordinate.lat)
            .bind(coordinate.lon)
            .execute(pool)
            .await;

    if let Err(e) = result {
        warn!("Failed to cache geocode for {address}: {e}");
    }
}
