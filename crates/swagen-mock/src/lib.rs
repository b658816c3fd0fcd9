pub mod emitters;
pub mod error;
pub mod generator;
pub mod mock_value;

pub use error::MockError;
pub use generator::generate_mocks;
