pub mod catalog;
pub mod handlers;
pub mod middleware;
pub mod migrate;
pub mod routes;
pub mod search;
pub mod sitemaps;

pub use routes::create_router;
