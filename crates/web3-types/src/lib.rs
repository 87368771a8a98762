pub mod address;
pub mod chain;

pub use address::truncate_address;
pub use chain::{ChainId, SUPPORTED_CHAINS, network_name};
