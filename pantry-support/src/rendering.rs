//! Text rendering utilities for human-friendly error messages.
//!
//! Provides helpers to format resolution chains and "did you mean?"
//! suggestions for container keys.

/// Renders a resolution chain as a readable string.
///
/// # Examples
/// ```
/// use pantry_support::rendering::render_chain;
///
/// let chain = vec!["mailer", "transport", "mailer"];
/// assert_eq!(render_chain(&chain), "mailer → transport → mailer");
/// ```
pub fn render_chain(chain: &[impl AsRef<str>]) -> String {
    chain
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Returns the last namespace segment of a dotted key.
///
/// ```
/// use pantry_support::rendering::last_segment;
///
/// assert_eq!(last_segment("param.db.host"), "host");
/// assert_eq!(last_segment("mailer"), "mailer");
/// ```
pub fn last_segment(key: &str) -> &str {
    key.rsplit('.').next().unwrap_or(key)
}

/// Generates "did you mean?" suggestions for a missing key.
///
/// Compares the requested key against the available keys and returns
/// the closest ones, best match first.
pub fn suggest_similar(
    requested: &str,
    available: &[&str],
    max_suggestions: usize,
) -> Vec<String> {
    let requested_lower = requested.to_lowercase();
    let requested_short = last_segment(&requested_lower).to_string();

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter(|&&name| name != requested && !name.is_empty())
        .filter_map(|&name| {
            let name_lower = name.to_lowercase();
            let name_short = last_segment(&name_lower);

            // Substring either way
            if name_lower.contains(&requested_lower)
                || requested_lower.contains(&name_lower)
            {
                return Some((name, 100));
            }

            if name_short.contains(requested_short.as_str())
                || requested_short.contains(name_short)
            {
                return Some((name, 80));
            }

            let common = name_short
                .chars()
                .zip(requested_short.chars())
                .take_while(|(a, b)| a == b)
                .count();

            if common >= 3 {
                return Some((name, common * 10));
            }

            None
        })
        .collect();

    // Stable order for equal scores
    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_cycle() {
        let chain = vec!["a", "b", "c", "a"];
        assert_eq!(render_chain(&chain), "a → b → c → a");
    }

    #[test]
    fn render_single_key() {
        assert_eq!(render_chain(&["a"]), "a");
    }

    #[test]
    fn render_empty_chain() {
        let chain: Vec<String> = vec![];
        assert_eq!(render_chain(&chain), "");
    }

    #[test]
    fn last_segment_of_undotted_key() {
        assert_eq!(last_segment("commonService"), "commonService");
        assert_eq!(last_segment("param."), "");
    }

    #[test]
    fn suggests_suffixed_variant() {
        let available = vec!["commonService", "commonServiceDev", "component"];
        let suggestions = suggest_similar("commonServise", &available, 3);
        assert_eq!(suggestions.first().map(String::as_str), Some("commonService"));
    }

    #[test]
    fn suggests_by_last_segment() {
        let available = vec!["param.db.host", "param.db.port"];
        let suggestions = suggest_similar("db.host", &available, 3);
        assert_eq!(suggestions, vec!["param.db.host".to_string()]);
    }

    #[test]
    fn never_suggests_the_requested_key() {
        let suggestions = suggest_similar("mailer", &["mailer"], 3);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn no_match() {
        let suggestions = suggest_similar("xyz", &["database"], 3);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn respects_limit() {
        let available = vec!["log.a", "log.b", "log.c", "log.d"];
        assert_eq!(suggest_similar("log", &available, 2).len(), 2);
    }
}
