//! Identity-provider session claims.

use serde::{Deserialize, Serialize};

/// Claims carried by the identity provider's session token.
///
/// `sub` is the external identity id; the service never issues these tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // identity id
    pub exp: usize,  // expiration timestamp
    pub iat: usize,  // issued at timestamp
}
