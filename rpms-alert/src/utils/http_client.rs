use std::sync::OnceLock;

use tracing::debug;

/// Install the process-wide rustls crypto provider.
///
/// reqwest is built without a bundled provider, so this must run before the
/// first `Client` is constructed. Repeated calls are no-ops.
pub fn install_rustls_provider() {
    static PROVIDER_INSTALLED: OnceLock<()> = OnceLock::new();
    PROVIDER_INSTALLED.get_or_init(|| {
        if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
            // Safe to ignore: can happen if another crate installed it first.
            debug!(existing_provider = ?e, "rustls CryptoProvider already installed");
        }
    });
}
