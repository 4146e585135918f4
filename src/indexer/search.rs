use crate::corpus::{Corpus, Recipe};
use crate::indexer::tfidf::TfIdfIndex;
use tracing::debug;

/// A recipe with its similarity to the query, in [0, 1]
#[derive(Debug, Clone)]
pub struct RankedResult<'a> {
    pub recipe: &'a Recipe,
    pub score: f64,
}

/// Ranking over a corpus, built once at startup
#[derive(Debug, Clone)]
pub struct SearchIndex {
    tfidf: TfIdfIndex,
}

impl SearchIndex {
    pub fn new(corpus: &Corpus) -> Self {
        Self {
            tfidf: TfIdfIndex::build(corpus),
        }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.tfidf.vocabulary_size()
    }

    /// Up to `top_n` recipes with positive similarity, best first.
    ///
    /// Equal scores keep corpus order. `corpus` must be the one this index
    /// was built from.
    pub fn rank<'c>(&self, corpus: &'c Corpus, query: &str, top_n: usize) -> Vec<RankedResult<'c>> {
        debug_assert_eq!(self.tfidf.len(), corpus.len());

        let scores = self.tfidf.similarities(query);
        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));

        let results: Vec<RankedResult<'c>> = order
            .into_iter()
            .filter(|&i| scores[i] > 0.0)
            .take(top_n)
            .filter_map(|i| {
                corpus.get(i).map(|recipe| RankedResult {
                    recipe,
                    score: scores[i],
                })
            })
            .collect();

        debug!(
            "Query {:?} matched {} recipes (top_n {})",
            query,
            results.len(),
            top_n
        );
        results
    }
}

/// One-shot ranking that builds the index for this call only
pub fn rank(query: &str, corpus: &Corpus, top_n: usize) -> Vec<Recipe> {
    SearchIndex::new(corpus)
        .rank(corpus, query, top_n)
        .into_iter()
        .map(|result| result.recipe.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::fixtures::recipe;

    fn corpus() -> Corpus {
        Corpus::new(vec![
            recipe("Tomato Soup", &["tomato", "onion", "basil"]),
            recipe("Chicken Curry", &["chicken", "onion", "curry powder"]),
        ])
    }

    #[test]
    fn test_chicken_onion_prefers_curry() {
        let corpus = corpus();
        let index = SearchIndex::new(&corpus);
        let results = index.rank(&corpus, "chicken onion", 5);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].recipe.name, "Chicken Curry");
        assert_eq!(results[1].recipe.name, "Tomato Soup");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_results_sorted_positive_and_truncated() {
        let corpus = Corpus::new(vec![
            recipe("A", &["rice", "beans"]),
            recipe("B", &["rice"]),
            recipe("C", &["pasta"]),
            recipe("D", &["rice", "beans", "corn"]),
            recipe("E", &["beans"]),
        ]);
        let index = SearchIndex::new(&corpus);

        let results = index.rank(&corpus, "rice beans", 3);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.score > 0.0 && r.score <= 1.0));
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(results[0].recipe.name, "A");

        let all = index.rank(&corpus, "rice beans", 10);
        assert_eq!(all.len(), 4);
        assert!(all.iter().all(|r| r.recipe.name != "C"));
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let corpus = Corpus::new(vec![
            recipe("First", &["egg", "milk"]),
            recipe("Other", &["flour"]),
            recipe("Second", &["milk", "egg"]),
            recipe("Third", &["egg", "milk"]),
        ]);
        let index = SearchIndex::new(&corpus);

        let names: Vec<&str> = index
            .rank(&corpus, "egg milk", 5)
            .iter()
            .map(|r| r.recipe.name.as_str())
            .collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_empty_inputs() {
        let corpus = corpus();
        assert!(rank("", &corpus, 5).is_empty());
        assert!(rank("saffron", &corpus, 5).is_empty());
        assert!(rank("chicken", &Corpus::default(), 5).is_empty());
        assert!(rank("chicken", &corpus, 0).is_empty());
    }

    #[test]
    fn test_rank_is_deterministic() {
        let corpus = corpus();
        let first: Vec<usize> = rank("onion basil", &corpus, 5).iter().map(|r| r.id).collect();
        let second: Vec<usize> = rank("onion basil", &corpus, 5).iter().map(|r| r.id).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![0, 1]);
    }
}
