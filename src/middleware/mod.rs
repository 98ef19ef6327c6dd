/// Middleware module
///
/// Request authentication for actix-web services.

mod jwt_middleware;

pub use jwt_middleware::AuthenticatedUser;
pub use jwt_middleware::JwtMiddleware;
