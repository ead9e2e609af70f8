pub mod middleware;
pub mod verifier;

pub use middleware::RequirePostScope;
pub use verifier::{AuthError, Claims, TokenVerifier};
