//! Media storage implementations - local filesystem and in-memory.

mod local;
mod memory;

pub use local::LocalMediaStorage;
pub use memory::InMemoryMediaStorage;

use scribe_core::ports::StorageError;

/// Storage names are relative paths made of plain segments.
fn check_name(name: &str) -> Result<(), StorageError> {
    let valid = !name.is_empty()
        && !name.starts_with('/')
        && name
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
        && !name.contains('\\');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::check_name;

    #[test]
    fn test_check_name() {
        assert!(check_name("posts/a.gif").is_ok());
        assert!(check_name("../etc/passwd").is_err());
        assert!(check_name("/abs.gif").is_err());
        assert!(check_name("posts//a.gif").is_err());
        assert!(check_name("").is_err());
    }
}
