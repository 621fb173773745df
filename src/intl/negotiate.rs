//! Picking the best supported locale for a list of user preferences

fn base_language(tag: &str) -> String {
    tag.split(|c: char| c == '-' || c == '_')
        .next()
        .unwrap_or(tag)
        .to_ascii_lowercase()
}

/// Choose a supported locale for the ranked `requested` preferences
///
/// 1. The first requested tag that exactly equals a supported tag.
/// 2. Otherwise the first supported tag (in `supported` order) whose base
///    language matches the base language of any requested tag.
/// 3. Otherwise `fallback`, returned as-is.
pub fn negotiate_locale<'a, R, S>(requested: &[R], supported: &'a [S], fallback: &'a S) -> &'a S
where
    R: AsRef<str>,
    S: AsRef<str>,
{
    for wanted in requested {
        if let Some(found) = supported.iter().find(|s| s.as_ref() == wanted.as_ref()) {
            return found;
        }
    }

    let wanted_bases: Vec<String> = requested.iter().map(|r| base_language(r.as_ref())).collect();
    supported
        .iter()
        .find(|s| wanted_bases.contains(&base_language(s.as_ref())))
        .unwrap_or(fallback)
}
