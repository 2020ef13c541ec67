use std::path::PathBuf;

/// Location of a schema file shipped under `migration/postgresql`.
pub fn get_path(dir: &str, file: &str) -> PathBuf {
    ["migration", "postgresql", file]
        .iter()
        .fold(PathBuf::from(dir), |buf, chunk| buf.join(chunk))
}
