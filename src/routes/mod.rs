mod auth;
mod health_check;

pub use auth::{login, logout, protected, refresh, signup, UserDirectory};
pub use health_check::health_check;
