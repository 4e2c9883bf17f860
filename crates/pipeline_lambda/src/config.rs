use std::path::PathBuf;

/// Always writable inside the Lambda execution environment.
pub const DEFAULT_SCRATCH_DIRECTORY: &str = "/tmp";
pub const DEFAULT_TABLE_NAME: &str = "Guestbook";

pub const SOURCE_DIRECTORY_ENV: &str = "SOURCE_DIRECTORY";
pub const TABLE_NAME_ENV: &str = "GUESTBOOK_TABLE_NAME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySyncConfig {
    /// Directory suggested by the execution context. Advisory only.
    pub advisory_source_directory: Option<PathBuf>,
    pub scratch_directory: PathBuf,
}

impl DirectorySyncConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            advisory_source_directory: non_empty(lookup(SOURCE_DIRECTORY_ENV)).map(PathBuf::from),
            scratch_directory: PathBuf::from(DEFAULT_SCRATCH_DIRECTORY),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentStoreConfig {
    pub table_name: String,
}

impl CommentStoreConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            table_name: non_empty(lookup(TABLE_NAME_ENV))
                .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
