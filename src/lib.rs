pub mod bootstrap;
pub mod config;
pub mod dto;
pub mod match_management;
pub mod test_support;

pub use bootstrap::{init_tracing, load_dotenv};
