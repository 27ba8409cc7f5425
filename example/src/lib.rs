mod data;
mod error;
mod foo_client;

pub use error::Error;
pub use foo_client::{FooClient, FooClientBuilder};
