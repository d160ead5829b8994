use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::AppConfig;
use crate::error::RecipeError;
use crate::model::{CreatedRecipe, PersistedRecipe, RecipePayload};
use crate::store::RecipeStore;

/// Recipe service reached over HTTP
pub struct HttpRecipeStore {
    client: Client,
    base_url: String,
}

impl HttpRecipeStore {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, RecipeError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpRecipeStore {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a store from loaded configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, RecipeError> {
        Self::new(
            config.api_url.clone(),
            Some(Duration::from_secs(config.timeout)),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of a recipe's photo
    pub fn image_url(&self, recipe: &PersistedRecipe) -> Option<String> {
        let image = recipe.image.as_deref()?;
        if image.starts_with("http://") || image.starts_with("https://") {
            return Some(image.to_string());
        }
        Some(format!("{}/{}", self.base_url, image.trim_start_matches('/')))
    }

    fn recipes_url(&self) -> String {
        format!("{}/recipes/", self.base_url)
    }

    fn build_form(payload: &RecipePayload) -> Result<Form, RecipeError> {
        let mut form = Form::new()
            .text("title", payload.title.clone())
            .text("instructions", payload.instructions.clone())
            .text("servings_default", payload.servings_default.to_string())
            .text("ingredients", payload.ingredients_json()?);

        if let Some(image) = &payload.image {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(image.mime_type())?;
            form = form.part("image", part);
        }
        Ok(form)
    }
}

/// Turn a response into `T`, mapping non-success statuses to errors
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, RecipeError> {
    let status = response.status();
    let body = response.text().await?;
    debug!("Recipe service answered {}: {}", status, body);

    if !status.is_success() {
        return Err(RecipeError::ServerError {
            status: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body).map_err(|e| RecipeError::ParseError(e.to_string()))
}

#[async_trait]
impl RecipeStore for HttpRecipeStore {
    fn store_name(&self) -> &str {
        "http"
    }

    async fn create(&self, payload: &RecipePayload) -> Result<CreatedRecipe, RecipeError> {
        let form = Self::build_form(payload)?;
        let response = self
            .client
            .post(self.recipes_url())
            .multipart(form)
            .send()
            .await?;

        let created: CreatedRecipe = read_json(response).await?;
        info!("Created recipe {} ({:?})", created.id, payload.title);
        Ok(created)
    }

    async fn get(&self, id: u64) -> Result<PersistedRecipe, RecipeError> {
        let response = self
            .client
            .get(format!("{}{}", self.recipes_url(), id))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(RecipeError::NotFound(id));
        }
        read_json(response).await
    }

    async fn list(&self) -> Result<Vec<PersistedRecipe>, RecipeError> {
        let response = self.client.get(self.recipes_url()).send().await?;
        let recipes: Vec<PersistedRecipe> = read_json(response).await?;
        info!("Fetched {} recipe(s)", recipes.len());
        Ok(recipes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn store(url: String) -> HttpRecipeStore {
        HttpRecipeStore::new(url, None).unwrap()
    }

    fn recipe_with_image(image: Option<&str>) -> PersistedRecipe {
        PersistedRecipe {
            id: 1,
            title: "Pie".to_string(),
            instructions: None,
            servings_default: Some(2),
            image: image.map(str::to_string),
            ingredients: vec![],
        }
    }

    #[test]
    fn test_image_url_resolution() {
        let store = store("http://localhost:8000/".to_string());
        assert_eq!(store.base_url(), "http://localhost:8000");
        assert_eq!(
            store.image_url(&recipe_with_image(Some("media/recipe_1/a.jpg"))),
            Some("http://localhost:8000/media/recipe_1/a.jpg".to_string())
        );
        assert_eq!(
            store.image_url(&recipe_with_image(Some("https://cdn.example.com/a.jpg"))),
            Some("https://cdn.example.com/a.jpg".to_string())
        );
        assert_eq!(store.image_url(&recipe_with_image(None)), None);
    }

    #[tokio::test]
    async fn test_list() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/recipes/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id": 1, "title": "Soup", "instructions": "Boil", "servings_default": 2,
                     "image": null, "ingredients": [{"name": "Water", "amount": 1.5, "unit": "L"}]}]"#,
            )
            .create_async()
            .await;

        let recipes = store(server.url()).list().await.unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].title, "Soup");
        assert_eq!(recipes[0].ingredients[0].amount, Some(1.5));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/recipes/42")
            .with_status(404)
            .with_body(r#"{"detail": "Not Found"}"#)
            .create_async()
            .await;

        let result = store(server.url()).get(42).await;
        assert!(matches!(result, Err(RecipeError::NotFound(42))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/recipes/")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let result = store(server.url()).list().await;
        match result {
            Err(RecipeError::ServerError { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "Internal Server Error");
            }
            other => panic!("Expected server error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/recipes/")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let result = store(server.url()).list().await;
        assert!(matches!(result, Err(RecipeError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_create_sends_multipart() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/recipes/")
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data; boundary=.*".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="title"\r\n\r\nSoup"#.to_string()),
                Matcher::Regex(r#"name="servings_default"\r\n\r\n1"#.to_string()),
                Matcher::Regex(r#""ingredient_name":"Water""#.to_string()),
                Matcher::Regex(r#"name="image"; filename="soup.png""#.to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"message": "Рецепт создан!", "id": 3, "image_url": "http://127.0.0.1:8000/media/recipe_3/x.png"}"#,
            )
            .create_async()
            .await;

        let payload = RecipePayload {
            title: "Soup".to_string(),
            instructions: "Boil".to_string(),
            servings_default: 1,
            ingredients: vec![crate::model::IngredientPayload {
                ingredient_name: "Water".to_string(),
                amount: 2.0,
                unit: "L".to_string(),
                id: crate::editor::IngredientId::new(1),
            }],
            image: Some(crate::model::ImageUpload::new("soup.png", vec![1, 2, 3])),
        };

        let created = store(server.url()).create(&payload).await.unwrap();
        assert_eq!(created.id, 3);
        assert!(created.image_url.is_some());
        mock.assert_async().await;
    }
}
