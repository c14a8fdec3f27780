use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Failed to load page: {url}")]
    ConnectionFailure {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Tag not found: <{tag}> {attrs}")]
    TagNotFound { tag: String, attrs: String },

    #[error("Expected content not found: {context}")]
    ContentNotFound { context: String },

    #[error("Unknown PEP status code: {code:?}")]
    UnknownStatusCode { code: String },

    #[error("Row has {actual} fields, expected {expected}")]
    RowArity { expected: usize, actual: usize },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ScrapeError {
    fn user_message(&self) -> String {
        match self {
            ScrapeError::ConnectionFailure { url, source } => {
                format!("Failed to load page {}: {}", url, source)
            }
            ScrapeError::TagNotFound { tag, attrs } => {
                format!("Expected tag <{}> {} was not found in the page", tag, attrs)
            }
            ScrapeError::ContentNotFound { context } => {
                format!("Expected content not found: {}", context)
            }
            ScrapeError::UnknownStatusCode { code } => {
                format!("The PEP index uses an unknown status code: {:?}", code)
            }
            ScrapeError::InvalidUrl { url } => {
                format!("Invalid URL: {}", url)
            }
            ScrapeError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            ScrapeError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ScrapeError::ConnectionFailure { .. } => Some(
                "Check your internet connection and try again. If the problem persists, python.org might be temporarily unavailable.".to_string()
            ),
            ScrapeError::TagNotFound { .. } | ScrapeError::ContentNotFound { .. } => Some(
                "The site markup may have changed since this tool was written. Try --clear-cache first; if the error remains, the selectors need updating.".to_string()
            ),
            ScrapeError::UnknownStatusCode { .. } => Some(
                "A new status abbreviation was likely added to the PEP index; the expected-status table needs a new entry.".to_string()
            ),
            ScrapeError::InvalidUrl { .. } => Some(
                "Base URLs in the configuration must be absolute and end with a trailing slash (e.g., https://docs.python.org/3/).".to_string()
            ),
            ScrapeError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ScrapeError {
    fn from(error: toml::de::Error) -> Self {
        ScrapeError::Config {
            message: error.to_string(),
        }
    }
}

impl From<url::ParseError> for ScrapeError {
    fn from(error: url::ParseError) -> Self {
        ScrapeError::InvalidUrl {
            url: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_not_found_names_the_filter() {
        let error = ScrapeError::TagNotFound {
            tag: "section".to_string(),
            attrs: "id=\"what-s-new-in-python\"".to_string(),
        };
        let message = error.user_message();
        assert!(message.contains("section"));
        assert!(message.contains("what-s-new-in-python"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_config_error_message() {
        let error = ScrapeError::Config {
            message: "timeout must be greater than 0".to_string(),
        };
        assert!(error.user_message().contains("timeout"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_cancelled_has_no_suggestion() {
        assert!(ScrapeError::Cancelled.suggestion().is_none());
    }

    #[test]
    fn test_row_arity_display() {
        let error = ScrapeError::RowArity {
            expected: 3,
            actual: 2,
        };
        assert_eq!(error.to_string(), "Row has 2 fields, expected 3");
    }
}
