use tower_http::compression::CompressionLayer;

/// Compresses page and asset responses according to the request's `Accept-Encoding`.
pub fn compression_layer() -> CompressionLayer {
    CompressionLayer::new()
}
