//! Rate limiting for follower-graph writes.
//!
//! Follow and unfollow each cost several document operations, so they are
//! throttled per client IP.

use actix_governor::governor::clock::QuantaInstant;
use actix_governor::governor::middleware::NoOpMiddleware;
use actix_governor::{GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor};

pub type FollowLimiterConfig = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>>;

/// Create rate limiter configuration for follow/unfollow endpoints.
///
/// Allows a burst of 20 requests, replenishing one request per second.
/// Build it once and share it between workers so the quota is global.
///
/// Usage:
/// ```ignore
/// let config = create_follow_rate_limiter_config();
/// web::resource("/{id}/followers").wrap(Governor::new(&config))
/// ```
pub fn create_follow_rate_limiter_config() -> FollowLimiterConfig {
    GovernorConfigBuilder::default()
        .per_second(1)
        .burst_size(20)
        .finish()
        .expect("static rate limiter settings are valid")
}
