use crate::wire::HealthRes;

/// Simple health service shared by every API surface.
///
/// Provides a standardised way to check that the intake service is up.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    pub fn new() -> Self {
        Self
    }

    /// Static method to check health without creating an instance.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Customer intake is alive".into(),
        }
    }
}
