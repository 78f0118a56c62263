use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::config::constant::{DEFAULT_VEHICLE_CAPACITY, DEMO_DEPOT};
use crate::domain::types::Coordinate;
use crate::service::api_types::{Algorithm, Delivery, SolveRequest};

/// Landmark addresses used by the demo runner. Each one resolves through
/// the static geocode table, so the demo works without network access.
pub fn demo_addresses() -> Vec<String> {
    [
        "RK Beach, Visakhapatnam",
        "Kailasagiri, Visakhapatnam",
        "Simhachalam Temple, Visakhapatnam",
        "Rushikonda Beach, Visakhapatnam",
        "Araku Coffee House, Visakhapatnam",
        "Visakhapatnam Railway Station",
        "Dwaraka Bus Station, Visakhapatnam",
        "NAD Junction, Visakhapatnam",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Builds a solve request from resolved landmark coordinates, padded with
/// deterministically generated deliveries around the depot until `count`
/// is reached. Demands are drawn from [5, 25).
pub fn generate_request(count: usize, seed: u64, resolved: &[Coordinate]) -> SolveRequest {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let depot = Coordinate::new(DEMO_DEPOT.0, DEMO_DEPOT.1);

    let mut deliveries: Vec<Delivery> = resolved
        .iter()
        .take(count)
        .map(|c| Delivery {
            lat: c.lat,
            lon: c.lon,
            demand: rng.gen_range(5.0..25.0),
        })
        .collect();

    while deliveries.len() < count {
        deliveries.push(Delivery {
            lat: depot.lat + rng.gen_range(-0.08..0.08),
            lon: depot.lon + rng.gen_range(-0.08..0.08),
            demand: rng.gen_range(5.0..25.0),
        });
    }

    let total_demand: f64 = deliveries.iter().map(|d| d.demand).sum();
    info!(
        deliveries = deliveries.len(),
        total_demand, "generated demo request"
    );

    SolveRequest {
        depot,
        deliveries,
        num_vehicles: None,
        vehicle_capacity: DEFAULT_VEHICLE_CAPACITY,
        algorithm: Algorithm::MultiStart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_generates_the_same_request() {
        let resolved = vec![Coordinate::new(17.714, 83.3236)];
        let a = generate_request(10, 42, &resolved);
        let b = generate_request(10, 42, &resolved);

        assert_eq!(a.deliveries.len(), 10);
        for (da, db) in a.deliveries.iter().zip(&b.deliveries) {
            assert_eq!(da.lat, db.lat);
            assert_eq!(da.lon, db.lon);
            assert_eq!(da.demand, db.demand);
        }
    }

    #[test]
    fn resolved_coordinates_come_first() {
        let resolved = vec![
            Coordinate::new(17.714, 83.3236),
            Coordinate::new(17.7492, 83.3426),
        ];
        let request = generate_request(5, 1, &resolved);
        assert_eq!(request.deliveries[0].lat, 17.714);
        assert_eq!(request.deliveries[1].lat, 17.7492);
        assert_eq!(request.deliveries.len(), 5);
    }

    #[test]
    fn generated_deliveries_stay_near_the_depot() {
        let request = generate_request(30, 7, &[]);
        for d in &request.deliveries {
            assert!((d.lat - DEMO_DEPOT.0).abs() < 0.1);
            assert!((d.lon - DEMO_DEPOT.1).abs() < 0.1);
            assert!(d.demand >= 5.0 && d.demand < 25.0);
        }
    }
}
