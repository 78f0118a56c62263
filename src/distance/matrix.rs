use tracing::debug;

use crate::distance::geo::haversine;
use crate::domain::types::Location;

/// Builds the full pairwise haversine matrix for a location list.
///
/// The result is symmetric with a zero diagonal; it is computed once per
/// instance and shared read-only by every heuristic run.
pub fn build_matrix(locations: &[Location]) -> Vec<Vec<f64>> {
    let n = locations.len();
    let mut matrix = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in (i + 1)..n {
            let d = haversine(&locations[i].coordinate, &locations[j].coordinate);
            matrix[i][j] = d;
            matrix[j][i] = d;
        }
    }

    debug!("Built {}x{} distance matrix", n, n);
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Coordinate;

    fn loc(id: usize, lat: f64, lon: f64) -> Location {
        Location {
            id,
            coordinate: Coordinate::new(lat, lon),
            demand: 0.0,
        }
    }

    #[test]
    fn mirrors_upper_and_lower_triangles() {
        let locations = vec![
            loc(0, 17.6868, 83.2185),
            loc(1, 17.7000, 83.2300),
            loc(2, 17.6950, 83.2250),
        ];
        let m = build_matrix(&locations);
        for i in 0..3 {
            assert_eq!(m[i][i], 0.0);
            for j in 0..3 {
                assert_eq!(m[i][j], m[j][i]);
            }
        }
        assert!(m[0][1] > 0.0);
    }
}
