pub mod auth;
pub mod roles;
pub mod secret;
pub mod users;
