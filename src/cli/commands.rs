use crate::corpus::{LoadReport, Recipe};
use crate::recommend::{FilterParams, Recommender};
use crate::utils::validation::parse_date;
use crate::Result;

/// Print recommendations for `query`
pub fn search(
    recommender: &Recommender,
    query: &str,
    filters: &FilterParams,
    top_n: Option<usize>,
) -> Result<()> {
    let top_n = top_n.unwrap_or(recommender.config().top_n);
    let results = recommender.recommend_top(query, filters, top_n)?;

    if results.is_empty() {
        println!("No recipes found for \"{query}\"");
        return Ok(());
    }

    println!("\nFound {} recipes:\n", results.len());
    for recipe in &results {
        print_card(recipe);
    }

    Ok(())
}

/// Print the specials for `date` (YYYY-MM-DD) or today
pub fn specials(recommender: &Recommender, date: Option<&str>, n: Option<usize>) -> Result<()> {
    let date = match date {
        Some(raw) => parse_date(raw)?,
        None => recommender.today(),
    };
    let n = n.unwrap_or(recommender.config().specials_count);

    println!("\nSpecials for {date}:\n");
    for recipe in recommender.specials_on(date, n) {
        print_card(&recipe);
    }

    Ok(())
}

/// Print one recipe in full
pub fn show(recommender: &Recommender, id: usize) -> Result<()> {
    let recipe = recommender.for_display(&recommender.recipe(id)?);

    println!("\n{}", recipe.name);
    println!("{}", "=".repeat(recipe.name.chars().count()));
    println!("Diet: {}", recipe.diet);
    if let Some(difficulty) = &recipe.difficulty {
        println!("Difficulty: {difficulty}");
    }
    if let Some(time) = recipe.time {
        println!("Time: {time} min");
    }
    println!("Image: {}", recipe.image);

    println!("\nIngredients:");
    for ingredient in &recipe.ingredients {
        println!("  - {ingredient}");
    }

    println!("\nInstructions:\n{}", recipe.instructions);
    Ok(())
}

/// Print a summary of a dataset load
pub fn print_report(recommender: &Recommender, report: &LoadReport, default_image: &str) {
    println!("✓ Loaded {} recipes", report.loaded);

    let without_image = recommender
        .corpus()
        .iter()
        .filter(|r| r.image == default_image)
        .count();
    println!("  Default image used by {without_image} recipes");

    let by_field = report.missing_by_field();
    if by_field.is_empty() {
        println!("  No missing values");
    } else {
        println!("  Missing values (defaults substituted):");
        for (field, count) in by_field {
            println!("    {field}: {count}");
        }
    }
}

fn print_card(recipe: &Recipe) {
    let mut details = vec![recipe.diet.clone()];
    if let Some(difficulty) = &recipe.difficulty {
        details.push(difficulty.clone());
    }
    if let Some(time) = recipe.time {
        details.push(format!("{time} min"));
    }

    println!("  [{}] {} ({})", recipe.id, recipe.name, details.join(", "));
}
