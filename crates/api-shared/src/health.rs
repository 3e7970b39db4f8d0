use crate::HealthRes;

/// Status reported by a healthy service.
pub const HEALTHY: &str = "healthy";

/// Health check behind `GET /health`.
///
/// The service holds no per-request state, so being able to answer is the whole check.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Check health without creating an instance
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            status: HEALTHY.into(),
        }
    }
}
