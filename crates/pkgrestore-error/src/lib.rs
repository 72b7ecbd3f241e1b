use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreError {
    ConflictingRequest {
        name: String,
        requested: String,
        existing: String,
    },
    InvalidPackageSpec(String),
    MalformedPackageRoot(String),
    TimeoutExceeded { packages: Vec<String> },
    EngineUnavailable(String),
    StoreError(String),
    IoError(String),
}

impl fmt::Display for RestoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConflictingRequest {
                name,
                requested,
                existing,
            } => {
                write!(
                    f,
                    "{name} version {requested} cannot be added because version {existing} was added previously."
                )
            }
            Self::InvalidPackageSpec(spec) => {
                write!(f, "Invalid Package specification: '{spec}'")
            }
            Self::MalformedPackageRoot(path) => {
                write!(f, "Cannot derive package identity from root '{path}'")
            }
            Self::TimeoutExceeded { packages } => {
                write!(
                    f,
                    "Package restore took longer than expected for packages: {}.",
                    packages.join(", ")
                )
            }
            Self::EngineUnavailable(msg) => {
                write!(f, "Dependency manager unavailable: {msg}")
            }
            Self::StoreError(msg) => {
                write!(f, "Package store error: {msg}")
            }
            Self::IoError(msg) => {
                write!(f, "IO error: {msg}")
            }
        }
    }
}

impl std::error::Error for RestoreError {}

impl From<anyhow::Error> for RestoreError {
    fn from(err: anyhow::Error) -> Self {
        Self::StoreError(err.to_string())
    }
}

impl From<std::io::Error> for RestoreError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RestoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_names_every_package() {
        let err = RestoreError::TimeoutExceeded {
            packages: vec!["Bar".to_string(), "Foo".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Package restore took longer than expected for packages: Bar, Foo."
        );
    }

    #[test]
    fn test_conflict_message() {
        let err = RestoreError::ConflictingRequest {
            name: "Foo".to_string(),
            requested: "2.0.0".to_string(),
            existing: "1.0.0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Foo version 2.0.0 cannot be added because version 1.0.0 was added previously."
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(matches!(RestoreError::from(io), RestoreError::IoError(msg) if msg == "missing"));
    }
}
