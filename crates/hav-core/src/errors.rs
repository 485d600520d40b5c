use thiserror::Error;

use crate::crypto::CryptoError;

/// Fatal errors from signing and verification.
///
/// An input that is well formed but fails a check is not an error; it is
/// reported in the [`VerificationResult`](crate::VerificationResult). What
/// remains fatal is a key the composed backend cannot use.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Key or backend failure.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}
