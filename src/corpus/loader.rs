use crate::corpus::images::ImageIndex;
use crate::corpus::models::{
    RawRecord, Recipe, SourceFormat, DEFAULT_DIET, DEFAULT_INSTRUCTIONS, DEFAULT_NAME,
};
use crate::corpus::Corpus;
use crate::error::{Error, Result};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

const ID_FIELDS: &[&str] = &["id"];
const NAME_FIELDS: &[&str] = &["title", "name"];
// The Kaggle export carries a cleaned copy next to the raw ingredient lines
const INGREDIENT_FIELDS: &[&str] = &["cleaned_ingredients", "ingredients"];
const INSTRUCTION_FIELDS: &[&str] = &["instructions"];
const DIET_FIELDS: &[&str] = &["diet"];
const DIFFICULTY_FIELDS: &[&str] = &["difficulty"];
const TIME_FIELDS: &[&str] = &["time"];
const IMAGE_FIELDS: &[&str] = &["image_name", "image"];

#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Separator for ingredient fields that are not list literals
    pub ingredient_delimiter: char,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            ingredient_delimiter: ',',
        }
    }
}

/// A field that was absent on one record and replaced by its default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingValue {
    pub record: usize,
    pub field: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub missing: Vec<MissingValue>,
}

impl LoadReport {
    /// Missing value counts per field
    pub fn missing_by_field(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for missing in &self.missing {
            *counts.entry(missing.field).or_insert(0) += 1;
        }
        counts
    }
}

/// Load and normalize the dataset at `path`, format chosen by extension
pub fn load_recipes(
    path: impl AsRef<Path>,
    images: &ImageIndex,
    options: &LoaderOptions,
) -> Result<(Corpus, LoadReport)> {
    let path = path.as_ref();
    let format = SourceFormat::from_path(path).ok_or_else(|| {
        Error::DataFormat(format!(
            "Cannot infer dataset format from {path:?} (expected .csv or .json)"
        ))
    })?;

    info!("Loading recipes from {:?} ({:?})", path, format);
    let file = std::fs::File::open(path)?;
    let records = match format {
        SourceFormat::Csv => read_csv_records(file)?,
        SourceFormat::Json => read_json_records(file)?,
    };

    let (corpus, report) = normalize(records, images, options);
    info!("Loaded {} recipes", report.loaded);
    for (field, count) in report.missing_by_field() {
        warn!(
            "Field '{}' missing on {} records, default substituted",
            field, count
        );
    }

    Ok((corpus, report))
}

/// Read a row-oriented dataset. The header row must name a title and an
/// ingredients column.
pub fn read_csv_records<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().to_lowercase())
        .collect();
    check_structure(|aliases| aliases.iter().any(|a| headers.iter().any(|h| h.as_str() == *a)))?;

    let mut records = Vec::new();
    for (row, result) in reader.byte_records().enumerate() {
        // Row 1 is the header
        let row_data = match result {
            Ok(row_data) => row_data,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!("Skipping malformed CSV row {}: {}", row + 2, e);
                continue;
            }
        };

        let mut record = RawRecord::new();
        for (header, value) in headers.iter().zip(row_data.iter()) {
            if header.is_empty() {
                continue;
            }
            let text = match std::str::from_utf8(value) {
                Ok(text) => text.to_string(),
                Err(_) => {
                    warn!("CSV row {} has invalid UTF-8 in '{}', decoding lossily", row + 2, header);
                    String::from_utf8_lossy(value).into_owned()
                }
            };
            record.insert(header.as_str(), Value::String(text));
        }
        records.push(record);
    }

    debug!("Read {} CSV records", records.len());
    Ok(records)
}

/// Read a structured dataset: a top-level array of objects
pub fn read_json_records<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let value: Value = serde_json::from_reader(reader)?;
    let Value::Array(items) = value else {
        return Err(Error::DataFormat(
            "Recipe JSON must be a top-level array".to_string(),
        ));
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(map) => records.push(RawRecord::from(map)),
            other => {
                return Err(Error::DataFormat(format!(
                    "Recipe entry {index} is not an object: {}",
                    json_kind(&other)
                )))
            }
        }
    }

    if !records.is_empty() {
        check_structure(|aliases| records.iter().any(|r| r.has_field(aliases)))?;
    }

    debug!("Read {} JSON records", records.len());
    Ok(records)
}

fn check_structure(has: impl Fn(&[&str]) -> bool) -> Result<()> {
    if !has(NAME_FIELDS) {
        return Err(Error::DataFormat(
            "Dataset has no title/name field".to_string(),
        ));
    }
    if !has(INGREDIENT_FIELDS) {
        return Err(Error::DataFormat(
            "Dataset has no ingredients field".to_string(),
        ));
    }
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Turn raw records into the corpus, substituting defaults for missing values
pub fn normalize(
    records: Vec<RawRecord>,
    images: &ImageIndex,
    options: &LoaderOptions,
) -> (Corpus, LoadReport) {
    let mut report = LoadReport::default();
    let recipes: Vec<Recipe> = records
        .iter()
        .enumerate()
        .map(|(id, record)| normalize_record(id, record, images, options, &mut report))
        .collect();

    report.loaded = recipes.len();
    (Corpus::new(recipes), report)
}

fn normalize_record(
    id: usize,
    record: &RawRecord,
    images: &ImageIndex,
    options: &LoaderOptions,
    report: &mut LoadReport,
) -> Recipe {
    let mut missing = |field: &'static str| {
        debug!("Record {} has no {}, using default", id, field);
        report.missing.push(MissingValue { record: id, field });
    };

    let name = record.text(NAME_FIELDS).unwrap_or_else(|| {
        missing("name");
        DEFAULT_NAME.to_string()
    });

    let ingredients = match record.get(INGREDIENT_FIELDS) {
        Some(value) => parse_ingredients(value, options.ingredient_delimiter),
        None => {
            missing("ingredients");
            Vec::new()
        }
    };

    let instructions = record.text(INSTRUCTION_FIELDS).unwrap_or_else(|| {
        missing("instructions");
        DEFAULT_INSTRUCTIONS.to_string()
    });

    let diet = record.text(DIET_FIELDS).unwrap_or_else(|| {
        missing("diet");
        DEFAULT_DIET.to_string()
    });

    let image_key = record.text(IMAGE_FIELDS);
    if image_key.is_none() {
        missing("image");
    }
    let image = images.resolve(image_key.as_deref());

    let difficulty = record.text(DIFFICULTY_FIELDS);

    let time = match record.get(TIME_FIELDS) {
        None => None,
        Some(value) => {
            let parsed = parse_minutes(value);
            if parsed.is_none() {
                missing("time");
            }
            parsed
        }
    };

    let source_id = record.get(ID_FIELDS).and_then(|value| match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    });

    Recipe {
        id,
        source_id,
        name,
        ingredients,
        instructions,
        image,
        diet,
        difficulty,
        time,
    }
}

/// Parse an ingredients value: an array, a list literal such as
/// `['1 cup rice', '2 cups water']`, or a delimited string
pub fn parse_ingredients(value: &Value, delimiter: char) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => {
            let s = s.trim();
            if s.starts_with('[') && s.ends_with(']') {
                parse_list_literal(&s[1..s.len() - 1])
            } else {
                s.split(delimiter)
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            }
        }
        _ => Vec::new(),
    }
}

/// Items of a quoted list body; each item is wrapped in `'` or `"`
fn parse_list_literal(body: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c != '\'' && c != '"' {
            continue;
        }

        let quote = c;
        let mut item = String::new();
        while let Some(ch) = chars.next() {
            match ch {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        item.push(escaped);
                    }
                }
                ch if ch == quote => break,
                ch => item.push(ch),
            }
        }

        let item = item.trim();
        if !item.is_empty() {
            items.push(item.to_string());
        }
    }

    items
}

fn duration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+)\s*(hours?|hrs?|h|minutes?|mins?|m)\b").expect("valid duration regex")
    })
}

/// Minutes from an integer, a numeric string, or text like "1 hour 15 min"
pub fn parse_minutes(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(minutes) = s.parse::<u32>() {
                return Some(minutes);
            }

            let mut total: Option<u32> = None;
            for caps in duration_regex().captures_iter(s) {
                let amount: u32 = caps[1].parse().ok()?;
                let minutes = if caps[2].to_lowercase().starts_with('h') {
                    amount.checked_mul(60)?
                } else {
                    amount
                };
                total = Some(total.unwrap_or(0).checked_add(minutes)?);
            }
            total
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn images() -> ImageIndex {
        ImageIndex::from_names(["tomato-soup.jpg"], "images", "images/default.jpg")
    }

    #[test]
    fn test_read_csv_kaggle_shape() {
        let data = "\
,Title,Ingredients,Instructions,Image_Name,Cleaned_Ingredients
0,Tomato Soup,\"['2 tomatoes', '1 onion']\",Simmer.,tomato-soup,\"['tomato', 'onion', 'basil']\"
1,,,,,
";
        let records = read_csv_records(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        let (corpus, report) = normalize(records, &images(), &LoaderOptions::default());
        let soup = corpus.get(0).unwrap();
        assert_eq!(soup.name, "Tomato Soup");
        assert_eq!(soup.ingredients, vec!["tomato", "onion", "basil"]);
        assert_eq!(soup.image, "images/tomato-soup.jpg");
        assert_eq!(soup.diet, DEFAULT_DIET);
        assert_eq!(soup.time, None);

        let blank = corpus.get(1).unwrap();
        assert_eq!(blank.name, DEFAULT_NAME);
        assert_eq!(blank.instructions, DEFAULT_INSTRUCTIONS);
        assert_eq!(blank.image, "images/default.jpg");
        assert!(blank.ingredients.is_empty());

        let by_field = report.missing_by_field();
        assert_eq!(by_field.get("diet"), Some(&2));
        assert_eq!(by_field.get("name"), Some(&1));
    }

    #[test]
    fn test_read_csv_invalid_utf8_row_keeps_loading() {
        let mut data = b"Title,Ingredients\nSoup,\"['water']\"\nBad ".to_vec();
        data.extend_from_slice(b"\xff\xfe Row,salt\nCurry,\"['chicken']\"\n");

        let records = read_csv_records(data.as_slice()).unwrap();
        assert_eq!(records.len(), 3);

        let (corpus, _) = normalize(records, &images(), &LoaderOptions::default());
        assert_eq!(corpus.get(0).unwrap().name, "Soup");
        assert!(corpus.get(1).unwrap().name.starts_with("Bad "));
        assert!(corpus.get(1).unwrap().name.contains('\u{FFFD}'));
        assert_eq!(corpus.get(1).unwrap().ingredients, vec!["salt"]);
        assert_eq!(corpus.get(2).unwrap().name, "Curry");
        assert_eq!(corpus.get(2).unwrap().ingredients, vec!["chicken"]);
    }

    #[test]
    fn test_read_csv_requires_title_and_ingredients() {
        let err = read_csv_records("Instructions,Image_Name\nStir.,x\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::DataFormat(_)));

        let err = read_csv_records("Title,Instructions\nSoup,Stir.\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("ingredients"));
    }

    #[test]
    fn test_read_csv_header_only_is_empty() {
        let records = read_csv_records("title,ingredients\n".as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_read_json_records() {
        let data = json!([
            {"id": 10, "name": "Chicken Curry", "ingredients": ["chicken", "onion"],
             "instructions": "Cook.", "diet": "Non-Veg", "difficulty": "Medium", "time": 40},
            {"id": "11", "name": "Salad", "ingredients": "lettuce, tomato", "time": "abc"}
        ])
        .to_string();

        let records = read_json_records(data.as_bytes()).unwrap();
        let (corpus, report) = normalize(records, &images(), &LoaderOptions::default());

        let curry = corpus.get(0).unwrap();
        assert_eq!(curry.source_id, Some(10));
        assert_eq!(curry.difficulty.as_deref(), Some("Medium"));
        assert_eq!(curry.time, Some(40));
        assert_eq!(curry.diet, "Non-Veg");

        let salad = corpus.get(1).unwrap();
        assert_eq!(salad.id, 1);
        assert_eq!(salad.source_id, Some(11));
        assert_eq!(salad.ingredients, vec!["lettuce", "tomato"]);
        assert_eq!(salad.time, None);
        assert!(report
            .missing
            .contains(&MissingValue { record: 1, field: "time" }));
    }

    #[test]
    fn test_read_json_structure_errors() {
        assert!(matches!(
            read_json_records(r#"{"name": "x"}"#.as_bytes()),
            Err(Error::DataFormat(_))
        ));
        assert!(matches!(
            read_json_records(r#"[1, 2]"#.as_bytes()),
            Err(Error::DataFormat(_))
        ));
        assert!(matches!(
            read_json_records(r#"[{"name": "Soup"}]"#.as_bytes()),
            Err(Error::DataFormat(_))
        ));
        assert!(read_json_records("[]".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_ingredients_forms() {
        assert_eq!(
            parse_ingredients(&json!(r#"['a "quoted" one', "it's here"]"#), ','),
            vec![r#"a "quoted" one"#, "it's here"]
        );
        assert_eq!(parse_ingredients(&json!("rice; beans ;"), ';'), vec!["rice", "beans"]);
        assert_eq!(parse_ingredients(&json!("[]"), ','), Vec::<String>::new());
        assert_eq!(parse_ingredients(&json!(""), ','), Vec::<String>::new());
        assert_eq!(parse_ingredients(&json!(["egg", " ", 2]), ','), vec!["egg", "2"]);
    }

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_minutes(&json!(45)), Some(45));
        assert_eq!(parse_minutes(&json!("30")), Some(30));
        assert_eq!(parse_minutes(&json!("45 minutes")), Some(45));
        assert_eq!(parse_minutes(&json!("1 hour 15 min")), Some(75));
        assert_eq!(parse_minutes(&json!("2 hours")), Some(120));
        assert_eq!(parse_minutes(&json!(-5)), None);
        assert_eq!(parse_minutes(&json!("abc")), None);
        assert_eq!(parse_minutes(&Value::Null), None);
    }

    #[test]
    fn test_load_recipes_infers_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.json");
        std::fs::write(&path, r#"[{"name": "Soup", "ingredients": ["water"]}]"#).unwrap();

        let (corpus, report) =
            load_recipes(&path, &images(), &LoaderOptions::default()).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(report.loaded, 1);

        let err = load_recipes(dir.path().join("recipes.txt"), &images(), &LoaderOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::DataFormat(_)));
    }
}
