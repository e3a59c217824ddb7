#[cfg(test)]
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;
