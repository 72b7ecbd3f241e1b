pub mod path_resolver;
pub mod store_manager;

pub use path_resolver::PathResolver;
pub use store_manager::StoreManager;

pub use store_manager::{collect_files, get_store_path, list_versions, store_package};
