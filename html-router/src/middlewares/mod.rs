pub mod auth_middleware;
pub mod compression;
pub mod response_middleware;
