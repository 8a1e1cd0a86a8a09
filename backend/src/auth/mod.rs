//! Authentication module
//!
//! Verifies access tokens issued by the external identity provider.

mod jwt;
mod middleware;

pub use jwt::{Claims, JwtService};
pub use middleware::AuthUser;
