//! Authentication module
//!
//! Verifies bearer JWTs issued by the identity service and exposes the
//! caller as an [`AuthUser`] extractor.

mod jwt;
mod middleware;

pub use jwt::{Claims, JwtService};
pub use middleware::AuthUser;
