use std::path::{Path, PathBuf};

pub const DEFAULT_EXTENSION: &str = "htm";

/// The input path with its extension replaced.
pub fn output_path(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension)
}

/// The first of `name.ext`, `name_1.ext`, `name_2.ext`, ... that does not
/// exist yet.
pub fn free_output_path(input: &Path, extension: &str) -> PathBuf {
    let first = output_path(input, extension);
    if !first.exists() {
        return first;
    }

    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut n = 1;
    loop {
        let candidate = first.with_file_name(format!("{}_{}.{}", stem, n, extension));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn extension_is_replaced_or_added() {
        assert_eq!(
            output_path(Path::new("notes.md"), DEFAULT_EXTENSION),
            PathBuf::from("notes.htm")
        );
        assert_eq!(
            output_path(Path::new("docs/readme"), "html"),
            PathBuf::from("docs/readme.html")
        );
    }

    #[test]
    fn free_path_is_the_plain_name_when_unused() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.md");
        assert_eq!(free_output_path(&input, "htm"), dir.path().join("page.htm"));
    }

    #[test]
    fn free_path_skips_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.md");
        fs::write(dir.path().join("page.htm"), "").unwrap();
        fs::write(dir.path().join("page_1.htm"), "").unwrap();
        assert_eq!(
            free_output_path(&input, "htm"),
            dir.path().join("page_2.htm")
        );
    }
}
