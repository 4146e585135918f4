use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub corpus: CorpusConfig,
    pub images: ImageConfig,
    pub recommend: RecommendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    pub recipes_path: PathBuf,
    pub ingredient_delimiter: char,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    pub image_dir: PathBuf,
    pub url_prefix: String,
    pub default_image: String,
    pub category_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendConfig {
    pub top_n: usize,
    pub specials_count: usize,
    pub unknown_time: UnknownTimePolicy,
    pub invalid_filter: InvalidFilterPolicy,
    pub difficulty_match: DifficultyMatch,
}

/// What a time limit does with recipes whose time is missing or unparseable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownTimePolicy {
    Exclude,
    Include,
}

/// What happens to a filter value that fails to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidFilterPolicy {
    Ignore,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DifficultyMatch {
    Exact,
    CaseInsensitive,
}

impl std::str::FromStr for UnknownTimePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "exclude" => Ok(Self::Exclude),
            "include" => Ok(Self::Include),
            other => Err(Error::Config(format!(
                "Invalid UNKNOWN_TIME value: {other} (expected exclude or include)"
            ))),
        }
    }
}

impl std::str::FromStr for InvalidFilterPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "reject" => Ok(Self::Reject),
            other => Err(Error::Config(format!(
                "Invalid INVALID_FILTER value: {other} (expected ignore or reject)"
            ))),
        }
    }
}

impl std::str::FromStr for DifficultyMatch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "case-insensitive" => Ok(Self::CaseInsensitive),
            other => Err(Error::Config(format!(
                "Invalid DIFFICULTY_MATCH value: {other} (expected exact or case-insensitive)"
            ))),
        }
    }
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            specials_count: 5,
            unknown_time: UnknownTimePolicy::Exclude,
            invalid_filter: InvalidFilterPolicy::Ignore,
            difficulty_match: DifficultyMatch::Exact,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            image_dir: "static/images".into(),
            url_prefix: "images".to_string(),
            default_image: "images/default.jpg".to_string(),
            category_dir: None,
        }
    }
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid PORT value".to_string()))?;

        let max_request_body_size = std::env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| "65536".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid MAX_REQUEST_BODY_SIZE value".to_string()))?;

        let recipes_path = std::env::var("RECIPES_PATH")
            .unwrap_or_else(|_| "dataset/recipes.csv".to_string())
            .into();

        let ingredient_delimiter = std::env::var("INGREDIENT_DELIMITER")
            .unwrap_or_else(|_| ",".to_string());
        let mut delimiter_chars = ingredient_delimiter.chars();
        let ingredient_delimiter = match (delimiter_chars.next(), delimiter_chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(Error::Config(
                    "INGREDIENT_DELIMITER must be a single character".to_string(),
                ))
            }
        };

        let image_dir = std::env::var("IMAGE_DIR")
            .unwrap_or_else(|_| "static/images".to_string())
            .into();
        let url_prefix = std::env::var("IMAGE_URL_PREFIX").unwrap_or_else(|_| "images".to_string());
        let default_image =
            std::env::var("DEFAULT_IMAGE").unwrap_or_else(|_| "images/default.jpg".to_string());
        let category_dir = std::env::var("CATEGORY_IMAGE_DIR").ok().map(PathBuf::from);

        let top_n = std::env::var("TOP_N")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid TOP_N value".to_string()))?;

        let specials_count = std::env::var("SPECIALS_COUNT")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid SPECIALS_COUNT value".to_string()))?;

        let unknown_time = std::env::var("UNKNOWN_TIME")
            .unwrap_or_else(|_| "exclude".to_string())
            .parse()?;
        let invalid_filter = std::env::var("INVALID_FILTER")
            .unwrap_or_else(|_| "ignore".to_string())
            .parse()?;
        let difficulty_match = std::env::var("DIFFICULTY_MATCH")
            .unwrap_or_else(|_| "exact".to_string())
            .parse()?;

        Ok(Settings {
            server: ServerConfig {
                host,
                port,
                max_request_body_size,
            },
            corpus: CorpusConfig {
                recipes_path,
                ingredient_delimiter,
            },
            images: ImageConfig {
                image_dir,
                url_prefix,
                default_image,
                category_dir,
            },
            recommend: RecommendConfig {
                top_n,
                specials_count,
                unknown_time,
                invalid_filter,
                difficulty_match,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.recommend.top_n == 0 {
            return Err(Error::Config("TOP_N must be non-zero".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
                max_request_body_size: 65536,
            },
            corpus: CorpusConfig {
                recipes_path: "dataset/recipes.csv".into(),
                ingredient_delimiter: ',',
            },
            images: ImageConfig::default(),
            recommend: RecommendConfig::default(),
        };

        assert!(settings.validate().is_ok());

        settings.server.port = 0;
        assert!(settings.validate().is_err());

        settings.server.port = 5000;
        settings.recommend.top_n = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "Include".parse::<UnknownTimePolicy>().unwrap(),
            UnknownTimePolicy::Include
        );
        assert_eq!(
            "reject".parse::<InvalidFilterPolicy>().unwrap(),
            InvalidFilterPolicy::Reject
        );
        assert_eq!(
            "case-insensitive".parse::<DifficultyMatch>().unwrap(),
            DifficultyMatch::CaseInsensitive
        );
        assert!("sometimes".parse::<UnknownTimePolicy>().is_err());
    }
}
