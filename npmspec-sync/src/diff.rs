//! Unified diff preview for pending spec updates.

use similar::TextDiff;

/// Unified diff of `old` against `new`, headed `a/<label>` / `b/<label>`.
///
/// Empty when the two texts are identical.
pub fn preview_diff(label: &str, old: &str, new: &str) -> String {
    if old == new {
        return String::new();
    }
    let old_header = format!("a/{label}");
    let new_header = format!("b/{label}");
    TextDiff::from_lines(old, new)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_texts_have_no_diff() {
        assert_eq!(preview_diff("x.spec", "a\nb\n", "a\nb\n"), "");
    }

    #[test]
    fn version_change_shows_both_lines() {
        let old = "Name:    nodejs-foo\nVersion: 1.0.0\nRelease: 0\n";
        let new = "Name:    nodejs-foo\nVersion: 1.1.0\nRelease: 0\n";
        let diff = preview_diff("nodejs-foo.spec", old, new);
        assert!(diff.contains("--- a/nodejs-foo.spec"));
        assert!(diff.contains("+++ b/nodejs-foo.spec"));
        assert!(diff.contains("-Version: 1.0.0"));
        assert!(diff.contains("+Version: 1.1.0"));
        assert!(diff.contains(" Release: 0"));
    }
}
