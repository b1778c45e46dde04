//! Movie identification arguments

use clap::Args;

use reelfinder::pipeline::queries::primary_language;

/// Which movie to resolve media for
#[derive(Debug, Clone, Args)]
pub struct MovieArgs {
    /// Movie title
    pub title: String,

    /// Release year
    #[arg(long, short = 'y')]
    pub year: Option<String>,

    /// Movie language; for a list such as "Hindi, English" the first is used
    #[arg(long, short = 'l')]
    pub lang: Option<String>,
}

impl MovieArgs {
    pub fn year(&self) -> &str {
        self.year.as_deref().unwrap_or_default()
    }

    /// Language segment for queries, empty when not given
    pub fn language(&self) -> String {
        match self.lang.as_deref() {
            Some(lang) if !lang.trim().is_empty() => primary_language(lang),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(lang: Option<&str>) -> MovieArgs {
        MovieArgs {
            title: "RRR".to_string(),
            year: None,
            lang: lang.map(str::to_string),
        }
    }

    #[test]
    fn test_language_takes_first_of_list() {
        assert_eq!(args(Some("Telugu, Hindi")).language(), "Telugu");
    }

    #[test]
    fn test_language_empty_when_absent() {
        assert_eq!(args(None).language(), "");
        assert_eq!(args(Some("  ")).language(), "");
        assert_eq!(args(None).year(), "");
    }
}
