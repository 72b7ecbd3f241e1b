pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = "Incremental package reference restore for interactive sessions";
pub const BIN_NAME: &str = "pkgrestore";

pub const RESTORE_TFM: &str = "netcoreapp3.1";
pub const SCRIPT_EXTENSION: &str = ".fsx";
pub const PACKAGE_MANAGER_KEY: &str = "nuget";
pub const SOURCE_PREFIX: &str = "nuget:";

pub const POLL_INTERVAL_MS: u64 = 500;
pub const RESTORE_TIMEOUT_SECS: u64 = 90;

pub const RESTORE_SOURCES_LINE: &str = "RestoreSources=";
pub const INCLUDE_LINE: &str = "Include=";
pub const VERSION_FIELD: &str = "Version=";

pub const STORE_DIR_NAME: &str = ".pkgrestore";
pub const PACKAGES_DIR_NAME: &str = "packages";

pub const SOURCE_FILE_EXTENSIONS: &[&str] = &["cs", "csx", "fs", "fsx"];

pub const PACKAGE_NOT_FOUND_CODE: i32 = 1101;
