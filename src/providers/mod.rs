pub mod http;
pub mod memory;
pub mod util;

pub use http::HttpStore;
pub use memory::MemoryStore;
