pub mod restore;
pub mod store;

pub use restore::RestoreHandler;
pub use store::StoreHandler;
