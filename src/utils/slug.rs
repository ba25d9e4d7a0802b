use deunicode::deunicode;
use regex::Regex;

/// Hard cap on derived slugs.
pub const SLUG_MAX_LENGTH: usize = 50;

/// Turns post titles into URL-safe slugs.
///
/// Construction compiles the separator pattern, so build one at startup and
/// hand it to whatever needs it (`PostService` owns the process copy).
#[derive(Debug, Clone)]
pub struct SlugGenerator {
    separators: Regex,
}

impl SlugGenerator {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            separators: Regex::new(r"[^a-z0-9_-]+")?,
        })
    }

    /// Transliterate, lower-case, collapse separator runs into `-`, trim
    /// hyphens and cut at [`SLUG_MAX_LENGTH`]. Blank titles give `""`.
    pub fn slugify(&self, title: &str) -> String {
        let ascii = deunicode(title).to_ascii_lowercase();
        let joined = self.separators.replace_all(&ascii, "-");
        let cut: String = joined
            .trim_matches('-')
            .chars()
            .take(SLUG_MAX_LENGTH)
            .collect();

        // the cutoff can land right after a separator
        cut.trim_end_matches('-').to_string()
    }

    /// Whether a caller-assigned slug is acceptable as-is.
    pub fn is_valid(&self, slug: &str) -> bool {
        !slug.is_empty()
            && slug.len() <= SLUG_MAX_LENGTH
            && slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }
}
