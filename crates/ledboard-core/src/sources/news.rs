use alloc::string::String;

/// A single top story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub title: String,
}

impl Headline {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// Join headline titles into the single line shown on the ticker.
///
/// Every run of whitespace, including newlines and tabs inside a title,
/// collapses to one space, so the ticker is always a single line.
pub fn news_digest(headlines: &[Headline]) -> String {
    let mut digest = String::new();
    for word in headlines.iter().flat_map(|h| h.title.split_whitespace()) {
        if !digest.is_empty() {
            digest.push(' ');
        }
        digest.push_str(word);
    }
    digest
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_digest_joins_titles_with_single_space() {
        let stories = vec![
            Headline::new("Markets rally"),
            Headline::new("  Storm heads north "),
            Headline::new("Local team wins"),
        ];
        assert_eq!(
            news_digest(&stories),
            "Markets rally Storm heads north Local team wins"
        );
    }

    #[test]
    fn test_digest_skips_blank_titles() {
        let stories = vec![Headline::new(""), Headline::new("Only one"), Headline::new(" ")];
        assert_eq!(news_digest(&stories), "Only one");
    }

    #[test]
    fn test_digest_flattens_multiline_titles() {
        let stories = vec![
            Headline::new("Long headline\nhere\tand  there"),
            Headline::new("\r\nNext story\n"),
        ];
        let digest = news_digest(&stories);
        assert_eq!(digest, "Long headline here and there Next story");
        assert!(!digest.contains(['\n', '\r', '\t']));
    }

    #[test]
    fn test_digest_of_nothing_is_empty() {
        assert!(news_digest(&[]).is_empty());
    }
}
