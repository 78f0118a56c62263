pub mod constant {
    /// Mean Earth radius in metres, used by the haversine formula.
    pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

    /// Capacity applied when a request leaves `vehicle_capacity` unset.
    pub const DEFAULT_VEHICLE_CAPACITY: f64 = 100.0;
    /// Demand applied when a delivery leaves `demand` unset.
    pub const DEFAULT_DEMAND: f64 = 10.0;

    /// Randomized restarts per strategy in a multi-start search.
    pub const DEFAULT_RESTARTS: usize = 8;
    /// Base seed for reproducible multi-start runs.
    pub const DEFAULT_SEED: u64 = 64;
    /// Candidates within this fraction of the best distance count as near-ties
    /// for randomized tie-breaking.
    pub const NEAR_TIE_FACTOR: f64 = 0.1;

    /// Demo instance size for the server binary.
    pub const DEMO_LOCATION_COUNT: usize = 24;
    /// Demo depot: Visakhapatnam city centre.
    pub const DEMO_DEPOT: (f64, f64) = (17.6868, 83.2185);
}
