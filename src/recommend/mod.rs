// Recommendation: ranking, post-filters and daily specials over one corpus

pub mod filters;
pub mod specials;

pub use filters::{apply_filters, FilterParams, FilterPolicy};
pub use specials::{daily_seed, Clock, FixedClock, SystemClock};

use crate::config::{RecommendConfig, Settings};
use crate::corpus::{
    load_recipes, CategoryImages, Corpus, ImageIndex, LoadReport, LoaderOptions, Recipe,
};
use crate::error::Result;
use crate::indexer::search::{RankedResult, SearchIndex};
use chrono::NaiveDate;
use tracing::{debug, info};

/// Display path prefix for per-category images
pub const CATEGORY_URL_PREFIX: &str = "categories";

/// Application context: the corpus, its index and the request policies.
///
/// Built once before serving and shared read-only.
pub struct Recommender {
    corpus: Corpus,
    index: SearchIndex,
    config: RecommendConfig,
    policy: FilterPolicy,
    clock: Box<dyn Clock>,
    category_images: Option<CategoryImages>,
}

impl Recommender {
    pub fn new(corpus: Corpus, config: RecommendConfig) -> Self {
        let index = SearchIndex::new(&corpus);
        info!(
            "Search index ready: {} recipes, {} terms",
            corpus.len(),
            index.vocabulary_size()
        );

        Self {
            policy: FilterPolicy::from(&config),
            corpus,
            index,
            config,
            clock: Box::new(SystemClock),
            category_images: None,
        }
    }

    /// Load the dataset and image index described by `settings`
    pub fn from_settings(settings: &Settings) -> Result<(Self, LoadReport)> {
        let images = ImageIndex::from_dir(
            &settings.images.image_dir,
            settings.images.url_prefix.clone(),
            settings.images.default_image.clone(),
        )?;
        info!("Image index ready: {} files", images.len());

        let options = LoaderOptions {
            ingredient_delimiter: settings.corpus.ingredient_delimiter,
        };
        let (corpus, report) = load_recipes(&settings.corpus.recipes_path, &images, &options)?;

        let mut recommender = Self::new(corpus, settings.recommend.clone());
        if let Some(dir) = &settings.images.category_dir {
            info!("Category images enabled from {:?}", dir);
            recommender = recommender.with_category_images(CategoryImages::new(
                dir.clone(),
                CATEGORY_URL_PREFIX,
            ));
        }

        Ok((recommender, report))
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_category_images(mut self, images: CategoryImages) -> Self {
        self.category_images = Some(images);
        self
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn config(&self) -> &RecommendConfig {
        &self.config
    }

    /// Ranked candidates with their scores
    pub fn rank(&self, query: &str, top_n: usize) -> Vec<RankedResult<'_>> {
        self.index.rank(&self.corpus, query, top_n)
    }

    /// Rank `query`, then apply `params` without re-ranking
    pub fn recommend(&self, query: &str, params: &FilterParams) -> Result<Vec<Recipe>> {
        self.recommend_top(query, params, self.config.top_n)
    }

    /// [`Recommender::recommend`] with an explicit candidate count
    pub fn recommend_top(
        &self,
        query: &str,
        params: &FilterParams,
        top_n: usize,
    ) -> Result<Vec<Recipe>> {
        debug!("Recommend query={:?} filters={:?} top_n={}", query, params, top_n);
        let ranked = self.rank(query, top_n);
        let kept = apply_filters(ranked.iter().map(|r| r.recipe), params, &self.policy)?;
        Ok(kept.into_iter().cloned().collect())
    }

    /// Recipe by id, or `Error::NotFound`
    pub fn recipe(&self, id: usize) -> Result<Recipe> {
        self.corpus.lookup(id).cloned()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn todays_specials(&self) -> Vec<Recipe> {
        specials::specials(&self.corpus, self.config.specials_count, self.clock.as_ref())
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn specials_on(&self, date: NaiveDate, n: usize) -> Vec<Recipe> {
        specials::specials_for_date(&self.corpus, n, date)
            .into_iter()
            .cloned()
            .collect()
    }

    /// A copy of `recipe` for display, with a per-request category image when
    /// one is available. The corpus entry is left untouched.
    pub fn for_display(&self, recipe: &Recipe) -> Recipe {
        let mut copy = recipe.clone();
        if let Some(images) = &self.category_images {
            if let Some(image) = images.pick(&recipe.name, &mut rand::thread_rng()) {
                copy.image = image;
            }
        }
        copy
    }
}
