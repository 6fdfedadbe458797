use crate::Platform;

const INDEXED_PLACEHOLDER: &str = "%[1]s";
const PLACEHOLDER: &str = "%s";

/// Substitutes `version` into a `package-url-prefix` pattern and appends the
/// template file name for `platform`.
///
/// Both `%s` and the indexed `%[1]s` form are accepted; every occurrence is replaced.
pub fn build_template_url(pattern: &str, version: &str, platform: Platform) -> String {
    let mut url = pattern
        .replace(INDEXED_PLACEHOLDER, version)
        .replace(PLACEHOLDER, version);
    url.push_str(platform.template_file_name());
    url
}

/// Joins a repository base and a relative path with exactly one `/` between them.
pub fn url_join(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if base.is_empty() {
        return path.to_string();
    }
    if path.is_empty() {
        return format!("{base}/");
    }
    format!("{base}/{path}")
}
