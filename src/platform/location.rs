//! Location service capability

use serde::{Deserialize, Serialize};

/// Permission level reported by the platform location service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AuthorizationState {
    /// User has not been asked yet
    #[default]
    NotDetermined,
    /// User declined
    Denied,
    /// Policy (parental controls, MDM) blocks access
    Restricted,
    AuthorizedWhenInUse,
    AuthorizedAlways,
}

impl AuthorizationState {
    pub fn is_authorized(&self) -> bool {
        matches!(
            self,
            AuthorizationState::AuthorizedWhenInUse | AuthorizationState::AuthorizedAlways
        )
    }

    /// Denied or restricted: the user or policy has already decided against access
    pub fn is_refused(&self) -> bool {
        matches!(self, AuthorizationState::Denied | AuthorizationState::Restricted)
    }
}

/// Platform location service.
///
/// Requests are fire-and-forget. Results come back through the screen's
/// notification handlers (`on_authorization_changed`, `on_fixes_received`,
/// `on_fix_failed`) on the same thread.
pub trait LocationService {
    /// Current authorization as known to the platform
    fn authorization_status(&self) -> AuthorizationState;

    /// Ask the user for when-in-use access. A no-op on the platform side when
    /// the user already decided.
    fn request_permission(&mut self);

    /// Ask for one position fix
    fn request_single_fix(&mut self);
}
