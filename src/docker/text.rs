//! Line-oriented helpers for docker CLI output.

/// Split command output into lines.
///
/// Exactly one trailing `\n` is dropped first, so `"a\nb\n"` and `"a\nb"`
/// both give `["a", "b"]`. Empty output gives no lines at all.
pub fn lines(output: &str) -> Vec<String> {
    let trimmed = output.strip_suffix('\n').unwrap_or(output);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('\n').map(str::to_string).collect()
}

/// Sort names case-insensitively, keeping the input order of names that
/// differ only in case.
pub fn sort_case_insensitive(names: &mut [String]) {
    names.sort_by_cached_key(|name| name.to_lowercase());
}
