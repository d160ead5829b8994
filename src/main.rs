use std::env;
use std::error::Error;

use log::{debug, warn};
use serde::Deserialize;

use recipe_book::{
    view, AppConfig, HttpRecipeStore, ImageUpload, RecipeForm, RecipeStore, RecipeView,
    SubmitError, TargetServings,
};

const USAGE: &str = "Usage:
  recipe-book list
  recipe-book show <id> [servings]
  recipe-book add <draft.json> [image]";

/// Recipe draft as written in a JSON file for `add`
#[derive(Debug, Deserialize)]
struct DraftFile {
    title: String,
    instructions: String,
    #[serde(default)]
    ingredients: Vec<DraftIngredient>,
}

#[derive(Debug, Deserialize)]
struct DraftIngredient {
    name: String,
    #[serde(default)]
    amount: String,
    unit: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = AppConfig::load()?;
    debug!("Loaded configuration: {:?}", config);
    let store = HttpRecipeStore::from_config(&config)?;

    match args.first().map(String::as_str) {
        Some("list") => list(&store).await,
        Some("show") => {
            let id = args
                .get(1)
                .ok_or("Please provide a recipe id")?
                .parse::<u64>()?;
            let servings = args.get(2).map(|s| TargetServings::from_input(s));
            show(&store, id, servings).await
        }
        Some("add") => {
            let path = args.get(1).ok_or("Please provide a draft file")?;
            add(&store, &config, path, args.get(2)).await
        }
        _ => {
            eprintln!("{}", USAGE);
            Err("Unknown command".into())
        }
    }
}

async fn list(store: &HttpRecipeStore) -> Result<(), Box<dyn Error>> {
    let recipes = store.list().await?;
    if recipes.is_empty() {
        println!("Рецептов пока нет.");
        return Ok(());
    }
    for card in view::summarize(&recipes) {
        let servings = card
            .servings
            .map(|s| s.to_string())
            .unwrap_or_else(|| "?".to_string());
        println!(
            "#{} {} [servings: {}, ingredients: {}]\n    {}",
            card.id, card.title, servings, card.ingredient_count, card.preview
        );
    }
    Ok(())
}

async fn show(
    store: &HttpRecipeStore,
    id: u64,
    servings: Option<TargetServings>,
) -> Result<(), Box<dyn Error>> {
    let recipe = store.get(id).await?;
    let image = store.image_url(&recipe);
    let mut detail = RecipeView::new(recipe);
    if let Some(servings) = servings {
        detail.set_target(servings);
    }

    println!("{}", detail.recipe().title);
    if let Some(image) = image {
        println!("{}", image);
    }
    println!("\nServings: {}\n", detail.target());
    for ingredient in detail.ingredients() {
        println!("  {}", ingredient);
    }
    println!("\n{}", detail.instructions());
    Ok(())
}

async fn add(
    store: &HttpRecipeStore,
    config: &AppConfig,
    path: &str,
    image: Option<&String>,
) -> Result<(), Box<dyn Error>> {
    let draft: DraftFile = serde_json::from_str(&tokio::fs::read_to_string(path).await?)?;

    let mut form = RecipeForm::with_default_unit(config.default_unit.clone());
    form.set_title(draft.title);
    form.set_instructions(draft.instructions);

    for (index, ingredient) in draft.ingredients.into_iter().enumerate() {
        if index > 0 {
            form.ingredients_mut().add();
        }
        let rows = form.ingredients_mut();
        rows.set_name(index, ingredient.name);
        if !rows.set_amount(index, ingredient.amount.clone()) {
            warn!(
                "Ignoring amount {:?} for ingredient {}",
                ingredient.amount, index
            );
        }
        if let Some(unit) = ingredient.unit {
            rows.set_unit(index, unit);
        }
    }

    if let Some(image) = image {
        form.set_image(Some(ImageUpload::from_path(image).await?));
    }

    match form.submit(store).await {
        Ok(created) => {
            println!("Рецепт сохранен! (id {})", created.id);
            Ok(())
        }
        Err(SubmitError::Invalid(errors)) => {
            for (key, message) in errors.iter() {
                eprintln!("{}: {}", key, message);
            }
            Err("Recipe draft is invalid".into())
        }
        Err(e) => Err(e.into()),
    }
}
