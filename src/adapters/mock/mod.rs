pub mod registry;

pub use registry::{ADS_PATH, MockRegistry, MockedResponse};
