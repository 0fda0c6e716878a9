//! Per-client-IP rate limiting for contact creation.
//!
//! Requires the server to run with `ConnectInfo<SocketAddr>` so the peer
//! address is available to the key extractor.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};

pub type RateLimitLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Token-bucket limiter keyed on the peer IP.
///
/// `per_second` is the replenish interval in seconds (one token every
/// `per_second` seconds), `burst` the bucket size. Returns `None` when
/// either value is zero.
pub fn per_ip_rate_limiter(per_second: u64, burst: u32) -> Option<RateLimitLayer> {
    let config = GovernorConfigBuilder::default()
        .per_second(per_second)
        .burst_size(burst)
        .finish()?;

    Some(GovernorLayer::new(Arc::new(config)))
}
