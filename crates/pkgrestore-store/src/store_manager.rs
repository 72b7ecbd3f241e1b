use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::PathResolver;
use pkgrestore_constants::{PACKAGES_DIR_NAME, STORE_DIR_NAME};

pub struct StoreManager;

impl StoreManager {
    pub fn get_store_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(STORE_DIR_NAME)
            .join(PACKAGES_DIR_NAME)
    }

    /// Unpacks a gzipped tarball as `<store>/<name>/<version>/`. An existing
    /// directory is left untouched.
    pub fn store_package(
        store_base: &Path,
        package_name: &str,
        version: &str,
        tarball_bytes: &[u8],
    ) -> io::Result<PathBuf> {
        let path = PathResolver::get_package_path(store_base, package_name, version);

        if path.exists() {
            return Ok(path);
        }

        Self::extract_and_store_package(&path, tarball_bytes)?;
        Ok(path)
    }

    fn extract_and_store_package(path: &Path, tarball_bytes: &[u8]) -> io::Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let tar = flate2::read::GzDecoder::new(tarball_bytes);
        let mut archive = tar::Archive::new(tar);
        archive.unpack(temp_dir.path())?;

        let entries: Vec<_> = fs::read_dir(temp_dir.path())?.collect::<Result<Vec<_>, _>>()?;

        // A single top-level directory (e.g. `package/`) is flattened away.
        let extracted_package_dir = match entries.as_slice() {
            [only] if only.file_type()?.is_dir() => only.path(),
            _ => temp_dir.path().to_path_buf(),
        };

        fs::create_dir_all(path)?;

        fs_extra::dir::copy(
            &extracted_package_dir,
            path,
            &fs_extra::dir::CopyOptions::new()
                .overwrite(true)
                .content_only(true),
        )
        .map_err(io::Error::other)?;

        Ok(())
    }

    /// Version directories present for a package, in no particular order.
    pub fn list_versions(store_base: &Path, package_name: &str) -> io::Result<Vec<String>> {
        let base = PathResolver::get_package_base_path(store_base, package_name);
        if !base.is_dir() {
            return Ok(Vec::new());
        }

        let mut versions = Vec::new();
        for entry in fs::read_dir(base)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    versions.push(name.to_string());
                }
            }
        }
        Ok(versions)
    }

    /// Every regular file below `root`, sorted for stable output.
    pub fn collect_files(root: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                let file_type = entry.file_type()?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if file_type.is_file() {
                    files.push(entry.path());
                }
            }
        }

        files.sort();
        Ok(files)
    }
}

pub fn get_store_path() -> PathBuf {
    StoreManager::get_store_path()
}

pub fn store_package(
    store_base: &Path,
    package_name: &str,
    version: &str,
    tarball_bytes: &[u8],
) -> io::Result<PathBuf> {
    StoreManager::store_package(store_base, package_name, version, tarball_bytes)
}

pub fn list_versions(store_base: &Path, package_name: &str) -> io::Result<Vec<String>> {
    StoreManager::list_versions(store_base, package_name)
}

pub fn collect_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    StoreManager::collect_files(root)
}
