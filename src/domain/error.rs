use std::error::Error;
use std::fmt;

/// Failure modes of the solver core.
///
/// `Validation` and the all-strategies-failed form of `Infeasible` are the
/// only kinds surfaced to callers; the rest are recovered inside the service.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Malformed or out-of-range input, rejected before any computation.
    Validation(String),
    /// Customers that no vehicle assignment can serve.
    Infeasible { customer_ids: Vec<usize> },
    /// A heuristic needed more vehicles than the fleet provides.
    CapacityExhausted { needed: usize, available: usize },
    /// A multi-start restart skipped because the deadline had elapsed.
    Timeout,
    /// Every strategy in a multi-start search failed.
    AllStrategiesFailed(Vec<SolverError>),
}

impl SolverError {
    /// Stable machine-readable kind for the boundary error object.
    pub fn kind(&self) -> &'static str {
        match self {
            SolverError::Validation(_) => "validation_error",
            SolverError::Infeasible { .. } => "infeasible",
            SolverError::CapacityExhausted { .. } => "capacity_exhausted",
            SolverError::Timeout => "timeout",
            SolverError::AllStrategiesFailed(_) => "infeasible",
        }
    }
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::Validation(msg) => write!(f, "invalid input: {}", msg),
            SolverError::Infeasible { customer_ids } => {
                write!(f, "customers {:?} cannot be served by the fleet", customer_ids)
            }
            SolverError::CapacityExhausted { needed, available } => write!(
                f,
                "route construction needed {} vehicles but only {} are available",
                needed, available
            ),
            SolverError::Timeout => write!(f, "search deadline elapsed"),
            SolverError::AllStrategiesFailed(errors) => {
                write!(f, "all {} strategies failed: ", errors.len())?;
                let mut first = true;
                for e in errors {
                    if !first {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", e)?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}

impl Error for SolverError {}
