use anyhow::{Context, Result};
use directories::ProjectDirs;
use pictureshow::{BatchResult, ReadError};
use std::io::Write;
use std::path::{Path, PathBuf};

/// `"1 page"`, `"2 pages"`; zero is written as singular.
pub fn number(count: usize, noun: &str) -> String {
    let suffix = if count > 1 { "s" } else { "" };
    format!("{count} {noun}{suffix}")
}

/// Append `.pdf` to a path without an extension.
pub fn ensure_suffix(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension("pdf")
    }
}

/// Location of the error log in the user cache directory
pub fn error_log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pictureshow").map(|dirs| dirs.cache_dir().join("errors.log"))
}

fn error_entry(path: &Path, err: &ReadError) -> String {
    format!("{}:\n{}: {}\n", path.display(), err.kind(), err)
}

/// Print the end-of-run summary, with skipped inputs in detail if `verbose`.
pub fn write_summary(
    out: &mut impl Write,
    result: &BatchResult,
    output: &Path,
    verbose: bool,
) -> std::io::Result<()> {
    let errors = result.unique_errors();
    if !errors.is_empty() {
        writeln!(out, "{} skipped due to error.", number(errors.len(), "file"))?;
        if verbose {
            for (path, err) in &errors {
                writeln!(out, "{}", error_entry(path, err))?;
            }
        }
    }

    if result.num_ok > 0 {
        writeln!(
            out,
            "Saved {} ({}) to '{}'",
            number(result.num_ok, "picture"),
            number(result.num_pages, "page"),
            output.display()
        )
    } else {
        writeln!(out, "Nothing to save.")
    }
}

/// Write every unique skipped input to `log_path`, replacing older content.
pub fn write_error_log(log_path: &Path, result: &BatchResult) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create '{}'", parent.display()))?;
    }
    let text: String = result
        .unique_errors()
        .into_iter()
        .map(|(path, err)| error_entry(path, err) + "\n")
        .collect();
    std::fs::write(log_path, text)
        .with_context(|| format!("Failed to write error log '{}'", log_path.display()))?;
    log::debug!("Wrote error log '{}'", log_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_errors() -> BatchResult {
        let unreadable = || ReadError::Unidentified("cannot identify image file".to_string());
        BatchResult {
            num_ok: 3,
            errors: vec![
                (PathBuf::from("a.txt"), unreadable()),
                (PathBuf::from("b.txt"), unreadable()),
                (PathBuf::from("a.txt"), unreadable()),
            ],
            num_pages: 1,
        }
    }

    #[test]
    fn test_number() {
        assert_eq!(number(0, "page"), "0 page");
        assert_eq!(number(1, "page"), "1 page");
        assert_eq!(number(2, "page"), "2 pages");
    }

    #[test]
    fn test_ensure_suffix() {
        assert_eq!(ensure_suffix(PathBuf::from("out")), PathBuf::from("out.pdf"));
        assert_eq!(ensure_suffix(PathBuf::from("out.pdf")), PathBuf::from("out.pdf"));
        assert_eq!(ensure_suffix(PathBuf::from("out.PDF")), PathBuf::from("out.PDF"));
        assert_eq!(ensure_suffix(PathBuf::from("dir/out.v2")), PathBuf::from("dir/out.v2"));
    }

    #[test]
    fn test_summary() {
        let mut out = Vec::new();
        write_summary(&mut out, &result_with_errors(), Path::new("pics.pdf"), false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "2 files skipped due to error.\nSaved 3 pictures (1 page) to 'pics.pdf'\n"
        );
    }

    #[test]
    fn test_verbose_summary_lists_errors() {
        let mut out = Vec::new();
        write_summary(&mut out, &result_with_errors(), Path::new("pics.pdf"), true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("a.txt:\nUnreadablePicture: cannot identify image file\n"));
        assert_eq!(text.matches("a.txt:").count(), 1);
    }

    #[test]
    fn test_nothing_to_save() {
        let mut out = Vec::new();
        write_summary(&mut out, &BatchResult::default(), Path::new("x.pdf"), false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Nothing to save.\n");
    }

    #[test]
    fn test_error_log() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("cache").join("errors.log");

        write_error_log(&log_path, &result_with_errors()).unwrap();
        let text = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(
            text,
            "a.txt:\nUnreadablePicture: cannot identify image file\n\n\
             b.txt:\nUnreadablePicture: cannot identify image file\n\n"
        );
    }
}
