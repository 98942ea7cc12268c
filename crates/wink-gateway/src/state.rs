use std::sync::Arc;

use wink_core::ExpirationPolicy;
use wink_redirector::Redirector;
use wink_shortener::Shortener;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    redirector: Arc<dyn Redirector>,
    default_expiration: ExpirationPolicy,
}

impl AppState {
    pub fn new(shortener: Arc<dyn Shortener>, redirector: Arc<dyn Redirector>) -> Self {
        Self {
            shortener,
            redirector,
            default_expiration: ExpirationPolicy::Never,
        }
    }

    /// Sets the policy applied to links created without an explicit TTL.
    pub fn with_default_expiration(mut self, default_expiration: ExpirationPolicy) -> Self {
        self.default_expiration = default_expiration;
        self
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn redirector(&self) -> &dyn Redirector {
        self.redirector.as_ref()
    }

    pub fn default_expiration(&self) -> ExpirationPolicy {
        self.default_expiration
    }
}
