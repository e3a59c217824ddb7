pub mod error;
pub mod handlers;
pub mod pages;
pub mod routes;
