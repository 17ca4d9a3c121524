//! Identity verification hook.
//!
//! Parlor does not implement authentication itself; the host application
//! does (an identity provider in production, a permissive verifier in
//! development, a mock in tests). The server calls [`IdentityVerifier`]
//! with the token from the client's `authenticate` message and trusts
//! whatever identity comes back.

use parlor_protocol::UserId;

use crate::AuthError;

/// A verified player identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub display_name: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: UserId(user_id.into()),
            display_name: display_name.into(),
        }
    }
}

/// Validates a client's auth token and returns their identity.
///
/// `Send + Sync + 'static` because the verifier is shared by every
/// connection task for the lifetime of the server.
///
/// # Example
///
/// ```rust
/// use parlor_session::{AuthError, Identity, IdentityVerifier};
///
/// /// Accepts `"uid:Display Name"` tokens. Development only.
/// struct DevVerifier;
///
/// impl IdentityVerifier for DevVerifier {
///     async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
///         let (uid, name) = token
///             .split_once(':')
///             .ok_or_else(|| AuthError::InvalidToken("expected uid:name".into()))?;
///         Ok(Identity::new(uid, name))
///     }
/// }
/// ```
pub trait IdentityVerifier: Send + Sync + 'static {
    /// Validates the given token and returns the verified identity.
    ///
    /// # Errors
    /// - [`AuthError::InvalidToken`] — the token is malformed, expired,
    ///   or rejected by the provider
    /// - [`AuthError::Unavailable`] — the provider could not be reached
    fn verify(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Identity, AuthError>> + Send;
}
