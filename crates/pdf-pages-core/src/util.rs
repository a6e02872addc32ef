//! Utility functions shared across the crate.

use std::path::PathBuf;

/// Get the user's config directory following XDG conventions.
///
/// Returns `$XDG_CONFIG_HOME` if set, otherwise `$HOME/.config`.
pub fn config_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
}

/// Strip any directory components a browser may have sent with a filename.
///
/// Some clients submit `C:\Users\me\a.pdf` or `dir/a.pdf`; only the last
/// component identifies the file.
pub fn base_file_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name).trim()
}

/// Filename without a trailing `.pdf` extension (case-insensitive).
pub fn pdf_stem(name: &str) -> &str {
    let base = base_file_name(name);
    let len = base.len();
    if len > 4 && base.is_char_boundary(len - 4) && base[len - 4..].eq_ignore_ascii_case(".pdf") {
        &base[..len - 4]
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_file_name() {
        assert_eq!(base_file_name("a.pdf"), "a.pdf");
        assert_eq!(base_file_name("dir/sub/a.pdf"), "a.pdf");
        assert_eq!(base_file_name(r"C:\Users\me\report.pdf"), "report.pdf");
    }

    #[test]
    fn test_pdf_stem() {
        assert_eq!(pdf_stem("a.pdf"), "a");
        assert_eq!(pdf_stem("Scan.PDF"), "Scan");
        assert_eq!(pdf_stem("notes.pdf.pdf"), "notes.pdf");
        assert_eq!(pdf_stem("no_extension"), "no_extension");
        assert_eq!(pdf_stem(".pdf"), ".pdf");
    }
}
