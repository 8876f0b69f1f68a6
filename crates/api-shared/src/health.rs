use crate::dto::HealthRes;

/// Simple health service shared by every server binary.
///
/// This service provides a standardised way to check that RxPad is up.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Check health without creating an instance.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "RxPad is alive".into(),
        }
    }
}
