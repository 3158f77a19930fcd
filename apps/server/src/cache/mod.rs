pub mod store;
pub mod world;

pub use store::CacheStore;
