mod error;
mod mock_server;
mod recorder;
mod util;

pub use error::Error;
pub use mock_server::{MockProcedure, MockResponse, MockServer};
pub use recorder::{RecordedCall, Recorder};
