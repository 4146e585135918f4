//! Display image resolution.
//!
//! Two layouts are supported: a flat directory of files named after the
//! dataset's image keys, and a tree with one directory per food category.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp"];

/// Prefix some assets in the dataset carry in front of their key
const ASSET_PREFIX: char = '-';

/// Case-insensitive index over a flat directory of image files
#[derive(Debug, Clone)]
pub struct ImageIndex {
    /// lower-cased file name -> file name as found on disk
    files: HashMap<String, String>,
    url_prefix: String,
    default_image: String,
}

impl ImageIndex {
    /// Index every file in `dir`. A missing directory yields an empty index.
    pub fn from_dir(
        dir: impl AsRef<Path>,
        url_prefix: impl Into<String>,
        default_image: impl Into<String>,
    ) -> crate::Result<Self> {
        let dir = dir.as_ref();
        let mut names = Vec::new();

        match std::fs::read_dir(dir) {
            Ok(entries) => {
                for entry in entries {
                    let entry = entry?;
                    if entry.file_type()?.is_file() {
                        if let Some(name) = entry.file_name().to_str() {
                            names.push(name.to_string());
                        }
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "Image directory {:?} not found, every recipe will use the default image",
                    dir
                );
            }
            Err(e) => return Err(e.into()),
        }

        names.sort();
        debug!("Indexed {} image files from {:?}", names.len(), dir);
        Ok(Self::from_names(names, url_prefix, default_image))
    }

    pub fn from_names<I, S>(
        names: I,
        url_prefix: impl Into<String>,
        default_image: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        // Names differing only in case: the first one given wins
        let mut files = HashMap::new();
        for name in names {
            let name: String = name.into();
            files.entry(name.to_lowercase()).or_insert(name);
        }

        Self {
            files,
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
            default_image: default_image.into(),
        }
    }

    /// An index with no files; everything resolves to the default image
    pub fn empty(default_image: impl Into<String>) -> Self {
        Self::from_names(Vec::<String>::new(), "", default_image)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn default_image(&self) -> &str {
        &self.default_image
    }

    /// Resolve a recipe's declared image key to a display path.
    ///
    /// Tries the key itself, then the dash-prefixed key, then falls back to
    /// the default image. Never fails.
    pub fn resolve(&self, key: Option<&str>) -> String {
        let Some(key) = key.map(str::trim).filter(|k| !k.is_empty()) else {
            return self.default_image.clone();
        };

        let file_name = with_image_extension(key);
        let lookup = file_name.to_lowercase();

        let found = self
            .files
            .get(&lookup)
            .or_else(|| self.files.get(&format!("{ASSET_PREFIX}{lookup}")));

        match found {
            Some(name) => self.display_path(name),
            None => self.default_image.clone(),
        }
    }

    fn display_path(&self, file_name: &str) -> String {
        if self.url_prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", self.url_prefix, file_name)
        }
    }
}

fn with_image_extension(key: &str) -> String {
    let lower = key.to_lowercase();
    if IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        key.to_string()
    } else {
        format!("{key}.jpg")
    }
}

/// Images grouped in one directory per category (`<root>/<category>/*.jpg`)
#[derive(Debug, Clone)]
pub struct CategoryImages {
    root: PathBuf,
    url_prefix: String,
}

impl CategoryImages {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    /// Pick a random image for the category named after `recipe_name`.
    ///
    /// Returns `None` when the category directory is missing or empty.
    pub fn pick<R: Rng + ?Sized>(&self, recipe_name: &str, rng: &mut R) -> Option<String> {
        let (category, files) = self
            .candidates(recipe_name)
            .into_iter()
            .find_map(|category| {
                let files = self.list_images(&category);
                (!files.is_empty()).then_some((category, files))
            })?;

        let file = files.choose(rng)?;
        Some(format!("{}/{}/{}", self.url_prefix, category, file))
    }

    /// Directory names tried for a recipe name: as given, then snake_case
    fn candidates(&self, recipe_name: &str) -> Vec<String> {
        let name = recipe_name.trim();
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Vec::new();
        }

        let snake = name.to_lowercase().replace(' ', "_");
        if snake == name {
            vec![name.to_string()]
        } else {
            vec![name.to_string(), snake]
        }
    }

    /// Sorted file names, so a seeded rng picks the same file every run
    fn list_images(&self, category: &str) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.root.join(category)) else {
            return Vec::new();
        };

        let mut files: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect();
        files.sort();
        files
    }
}
