pub mod comment;
pub mod config;
pub mod database;
pub mod middleware;
pub mod post;
pub mod router;
pub mod share;
pub mod utils;
