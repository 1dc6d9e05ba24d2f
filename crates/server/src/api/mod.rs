pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod tools;

pub use routes::create_router;
