use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::domain::types::Coordinate;

const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Well-known Visakhapatnam landmarks, so the demo works offline.
const LANDMARKS: [(&str, f64, f64); 8] = [
    ("RK Beach, Visakhapatnam", 17.7140, 83.3236),
    ("Kailasagiri, Visakhapatnam", 17.7492, 83.3426),
    ("Simhachalam Temple, Visakhapatnam", 17.7666, 83.2503),
    ("Rushikonda Beach, Visakhapatnam", 17.7823, 83.3852),
    ("Araku Coffee House, Visakhapatnam", 17.7275, 83.3095),
    ("Visakhapatnam Railway Station", 17.7225, 83.2890),
    ("Dwaraka Bus Station, Visakhapatnam", 17.7286, 83.3000),
    ("NAD Junction, Visakhapatnam", 17.7420, 83.2320),
];

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    lat: String,
    lon: String,
}

/// Resolves one address to a coordinate.
///
/// Lookup order: static landmark table, then the SQLite cache, then the
/// remote geocoder. Remote hits are written back to the cache. Returns
/// `None` when every source comes up empty.
pub async fn resolve_address(
    client: &Client,
    pool: &SqlitePool,
    address: &str,
) -> Option<Coordinate> {
    if let Some(coordinate) = landmark_lookup(address) {
        return Some(coordinate);
    }

    if let Some(coordinate) = crate::database::sqlx::cached_coordinate(pool, address).await {
        debug!("geocode cache hit for {address}");
        return Some(coordinate);
    }

    let coordinate = remote_lookup(client, address).await?;
    crate::database::sqlx::store_coordinate(pool, address, &coordinate).await;
    Some(coordinate)
}

/// Resolves a batch of addresses concurrently, keeping request order.
/// Unresolvable addresses come back as `None` rather than failing the batch.
pub async fn resolve_addresses(
    client: &Client,
    pool: &SqlitePool,
    addresses: &[String],
) -> Vec<Option<Coordinate>> {
    let lookups = addresses
        .iter()
        .map(|address| resolve_address(client, pool, address));
    join_all(lookups).await
}

pub fn landmark_lookup(address: &str) -> Option<Coordinate> {
    LANDMARKS
        .iter()
        .find(|(name, _, _)| name.eq_ignore_ascii_case(address))
        .map(|&(_, lat, lon)| Coordinate::new(lat, lon))
}

async fn remote_lookup(client: &Client, address: &str) -> Option<Coordinate> {
    let base_url =
        std::env::var("GEOCODER_URL").unwrap_or_else(|_| DEFAULT_GEOCODER_URL.to_string());

    let response = client
        .get(&base_url)
        .query(&[("q", address), ("format", "json"), ("limit", "1")])
        .header("User-Agent", "cvrp-demo")
        .send()
        .await;

    let hits: Vec<GeocodeHit> = match response {
        Ok(r) => match r.json().await {
            Ok(hits) => hits,
            Err(e) => {
                warn!("geocoder returned unparseable body for {address}: {e}");
                return None;
            }
        },
        Err(e) => {
            warn!("geocoder request failed for {address}: {e}");
            return None;
        }
    };

    let hit = hits.into_iter().next()?;
    match (hit.lat.parse::<f64>(), hit.lon.parse::<f64>()) {
        (Ok(lat), Ok(lon)) => Some(Coordinate::new(lat, lon)),
        _ => {
            warn!("geocoder returned non-numeric coordinates for {address}");
            None
        }
    }
}
