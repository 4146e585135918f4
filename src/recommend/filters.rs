use crate::config::{DifficultyMatch, InvalidFilterPolicy, RecommendConfig, UnknownTimePolicy};
use crate::corpus::Recipe;
use crate::error::Result;
use crate::utils::validation::{non_empty, parse_time_limit};
use tracing::{debug, warn};

/// Optional constraints applied after ranking. Blank values are no-ops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    pub diet: Option<String>,
    pub difficulty: Option<String>,
    /// Minutes, as typed by the user
    pub time_limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterPolicy {
    pub unknown_time: UnknownTimePolicy,
    pub invalid_filter: InvalidFilterPolicy,
    pub difficulty_match: DifficultyMatch,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self::from(&RecommendConfig::default())
    }
}

impl From<&RecommendConfig> for FilterPolicy {
    fn from(config: &RecommendConfig) -> Self {
        Self {
            unknown_time: config.unknown_time,
            invalid_filter: config.invalid_filter,
            difficulty_match: config.difficulty_match,
        }
    }
}

impl FilterPolicy {
    fn time_allows(&self, recipe: &Recipe, limit: i64) -> bool {
        match (recipe.time, self.unknown_time) {
            (Some(minutes), _) => i64::from(minutes) <= limit,
            (None, UnknownTimePolicy::Include) => true,
            (None, UnknownTimePolicy::Exclude) => i64::from(recipe.time_or_unbounded()) <= limit,
        }
    }

    fn difficulty_matches(&self, recipe: &Recipe, wanted: &str) -> bool {
        let Some(difficulty) = recipe.difficulty.as_deref() else {
            return false;
        };
        match self.difficulty_match {
            DifficultyMatch::Exact => difficulty == wanted,
            DifficultyMatch::CaseInsensitive => difficulty.to_lowercase() == wanted.to_lowercase(),
        }
    }
}

/// Keep the recipes that satisfy every provided constraint, in input order.
///
/// An unparseable time limit is dropped with a warning under
/// [`InvalidFilterPolicy::Ignore`] and is an error under
/// [`InvalidFilterPolicy::Reject`].
pub fn apply_filters<'a, I>(
    results: I,
    params: &FilterParams,
    policy: &FilterPolicy,
) -> Result<Vec<&'a Recipe>>
where
    I: IntoIterator<Item = &'a Recipe>,
{
    let diet = non_empty(params.diet.as_deref()).map(str::to_lowercase);
    let difficulty = non_empty(params.difficulty.as_deref());

    let time_limit = match non_empty(params.time_limit.as_deref()) {
        None => None,
        Some(raw) => match parse_time_limit(raw) {
            Ok(limit) => Some(limit),
            Err(e) => match policy.invalid_filter {
                InvalidFilterPolicy::Ignore => {
                    warn!("Ignoring time filter: {}", e);
                    None
                }
                InvalidFilterPolicy::Reject => return Err(e),
            },
        },
    };

    let filtered: Vec<&'a Recipe> = results
        .into_iter()
        .filter(|r| diet.as_ref().map_or(true, |d| r.diet.to_lowercase() == *d))
        .filter(|r| difficulty.map_or(true, |d| policy.difficulty_matches(r, d)))
        .filter(|r| time_limit.map_or(true, |limit| policy.time_allows(r, limit)))
        .collect();

    debug!("Filters {:?} kept {} recipes", params, filtered.len());
    Ok(filtered)
}

impl FilterParams {
    pub fn is_empty(&self) -> bool {
        non_empty(self.diet.as_deref()).is_none()
            && non_empty(self.difficulty.as_deref()).is_none()
            && non_empty(self.time_limit.as_deref()).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::fixtures::recipe;
    use crate::error::Error;

    fn recipes() -> Vec<Recipe> {
        let mut soup = recipe("Tomato Soup", &["tomato"]);
        soup.diet = "Vegetarian".to_string();
        soup.difficulty = Some("Easy".to_string());
        soup.time = Some(20);

        let mut curry = recipe("Chicken Curry", &["chicken"]);
        curry.diet = "Non-Veg".to_string();
        curry.difficulty = Some("Medium".to_string());
        curry.time = Some(45);

        let mut stew = recipe("Bean Stew", &["beans"]);
        stew.diet = "vegetarian".to_string();

        vec![soup, curry, stew]
    }

    fn names(recipes: &[&Recipe]) -> Vec<String> {
        recipes.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_no_filters_is_identity() {
        let recipes = recipes();
        let kept = apply_filters(&recipes, &FilterParams::default(), &FilterPolicy::default())
            .unwrap();
        assert_eq!(kept.len(), 3);

        let blank = FilterParams {
            diet: Some(" ".to_string()),
            difficulty: Some(String::new()),
            time_limit: Some(String::new()),
        };
        assert!(blank.is_empty());
        assert_eq!(
            apply_filters(&recipes, &blank, &FilterPolicy::default()).unwrap().len(),
            3
        );
    }

    #[test]
    fn test_diet_is_case_insensitive_and_keeps_order() {
        let recipes = recipes();
        let params = FilterParams {
            diet: Some("VEGETARIAN".to_string()),
            ..Default::default()
        };
        let kept = apply_filters(&recipes, &params, &FilterPolicy::default()).unwrap();
        assert_eq!(names(&kept), vec!["Tomato Soup", "Bean Stew"]);
    }

    #[test]
    fn test_difficulty_match_modes() {
        let recipes = recipes();
        let params = FilterParams {
            difficulty: Some("easy".to_string()),
            ..Default::default()
        };

        let exact = apply_filters(&recipes, &params, &FilterPolicy::default()).unwrap();
        assert!(exact.is_empty());

        let policy = FilterPolicy {
            difficulty_match: DifficultyMatch::CaseInsensitive,
            ..Default::default()
        };
        let relaxed = apply_filters(&recipes, &params, &policy).unwrap();
        assert_eq!(names(&relaxed), vec!["Tomato Soup"]);
    }

    #[test]
    fn test_time_limit_and_unknown_time() {
        let recipes = recipes();
        let params = FilterParams {
            time_limit: Some("30".to_string()),
            ..Default::default()
        };

        let kept = apply_filters(&recipes, &params, &FilterPolicy::default()).unwrap();
        assert_eq!(names(&kept), vec!["Tomato Soup"]);

        let policy = FilterPolicy {
            unknown_time: UnknownTimePolicy::Include,
            ..Default::default()
        };
        let kept = apply_filters(&recipes, &params, &policy).unwrap();
        assert_eq!(names(&kept), vec!["Tomato Soup", "Bean Stew"]);

        let params = FilterParams {
            time_limit: Some("45".to_string()),
            ..Default::default()
        };
        let kept = apply_filters(&recipes, &params, &FilterPolicy::default()).unwrap();
        assert_eq!(names(&kept), vec!["Tomato Soup", "Chicken Curry"]);
    }

    #[test]
    fn test_unparseable_time_limit() {
        let recipes = recipes();
        let params = FilterParams {
            time_limit: Some("abc".to_string()),
            ..Default::default()
        };

        let kept = apply_filters(&recipes, &params, &FilterPolicy::default()).unwrap();
        assert_eq!(kept.len(), 3);

        let policy = FilterPolicy {
            invalid_filter: InvalidFilterPolicy::Reject,
            ..Default::default()
        };
        assert!(matches!(
            apply_filters(&recipes, &params, &policy),
            Err(Error::InvalidFilterInput(_))
        ));
    }

    #[test]
    fn test_combined_filters() {
        let recipes = recipes();
        let params = FilterParams {
            diet: Some("non-veg".to_string()),
            difficulty: Some("Medium".to_string()),
            time_limit: Some("60".to_string()),
        };
        let kept = apply_filters(&recipes, &params, &FilterPolicy::default()).unwrap();
        assert_eq!(names(&kept), vec!["Chicken Curry"]);
    }
}
