//! Folder-template rendering and destination path assembly.

/// Render a folder template with a step's capture groups.
///
/// For each capture index `i` from 1 to `groups.len()`, in increasing order,
/// the first literal occurrence of `$i` in the progressively rewritten
/// template is replaced with group `i` (or with nothing if the group did not
/// participate). Later occurrences of the same placeholder stay as written,
/// and there is no escape for a literal `$1`.
///
/// ```
/// assert_eq!(automover::render("Area/$1/$2", &[Some("x"), Some("y")]), "Area/x/y");
/// assert_eq!(automover::render("Area/$1", &[None::<&str>]), "Area/");
/// ```
#[must_use]
pub fn render<S: AsRef<str>>(template: &str, groups: &[Option<S>]) -> String {
    let mut out = template.to_owned();
    for (i, group) in groups.iter().enumerate() {
        let placeholder = format!("${}", i + 1);
        let text = group.as_ref().map_or("", AsRef::as_ref);
        out = out.replacen(&placeholder, text, 1);
    }
    out
}

/// Append a rendered segment to an accumulated destination path.
///
/// Empty segments contribute nothing. Consecutive segments are joined by
/// exactly one `/`.
pub(crate) fn push_segment(path: &mut String, segment: &str) {
    if path.is_empty() {
        path.push_str(segment);
        return;
    }
    let segment = segment.trim_start_matches('/');
    if segment.is_empty() {
        return;
    }
    if !path.ends_with('/') {
        path.push('/');
    }
    path.push_str(segment);
}
