//! Gzip for JSON listings and CSV/PDF exports.

use tower_http::compression::CompressionLayer;

/// Only clients that send `Accept-Encoding: gzip` get compressed bodies.
pub fn build_compression_layer() -> CompressionLayer {
    CompressionLayer::new().gzip(true)
}
