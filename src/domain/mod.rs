pub mod ad;
pub mod error;
pub mod post;
pub mod query;
pub mod session;
pub mod ports;
