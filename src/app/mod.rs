pub mod page;
pub mod query_client;
pub mod render;
