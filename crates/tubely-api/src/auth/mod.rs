//! Bearer-token authentication
//!
//! Access tokens are HS256 JWTs whose subject is the user id. Handlers receive the
//! authenticated caller through the [`AuthUser`] extractor.

pub mod extractor;
pub mod jwt;

pub use extractor::AuthUser;
pub use jwt::{Claims, JwtConfig};
