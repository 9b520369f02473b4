use log::info;
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::error::AppResult;
use crate::forms::{normalize_name, FieldErrors, FormValues};

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl Category {
    pub fn icon_or(&self, fallback: &str) -> String {
        self.icon
            .clone()
            .filter(|icon| !icon.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CategoryRef {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

pub fn to_form(category: &Category) -> FormValues {
    FormValues::new()
        .with_text("name", category.name.clone())
        .with_text("description", category.description.clone().unwrap_or_default())
        .with_text("icon", category.icon.clone().unwrap_or_default())
}

pub fn from_form(values: &FormValues) -> Result<CategoryPayload, FieldErrors> {
    let mut errors = FieldErrors::default();
    let name = values.require_text("name", "El nombre es requerido", &mut errors);
    let payload = CategoryPayload {
        name: name.unwrap_or_default(),
        description: values.trimmed("description"),
        icon: values.trimmed("icon"),
    };
    errors.into_result(payload)
}

pub fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
    let wanted = normalize_name(name);
    categories.iter().find(|c| normalize_name(&c.name) == wanted)
}

pub async fn list_categories(client: &ApiClient) -> AppResult<Vec<Category>> {
    client.get("categories").await
}

pub async fn get_category(client: &ApiClient, id: u64) -> AppResult<Category> {
    client.get(&format!("categories/{}", id)).await
}

pub async fn create_category(client: &ApiClient, payload: &CategoryPayload) -> AppResult<Category> {
    info!("creating category {}", payload.name);
    client.post("categories", payload).await
}

pub async fn update_category(client: &ApiClient, id: u64, payload: &CategoryPayload) -> AppResult<Category> {
    client.patch(&format!("categories/{}", id), payload).await
}

pub async fn delete_category(client: &ApiClient, id: u64) -> AppResult<()> {
    client.delete(&format!("categories/{}", id)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: 1,
                name: "Educación".into(),
                description: None,
                icon: Some("📚".into()),
            },
            Category {
                id: 2,
                name: "Viajes".into(),
                description: None,
                icon: None,
            },
        ]
    }

    #[test]
    fn finds_names_without_accents_or_case() {
        let list = categories();
        assert_eq!(find_by_name(&list, "educacion").map(|c| c.id), Some(1));
        assert_eq!(find_by_name(&list, "VIAJES").map(|c| c.id), Some(2));
        assert_eq!(find_by_name(&list, "Salud"), None);
    }

    #[test]
    fn name_is_required() {
        let errors = from_form(&FormValues::new().with_text("icon", "🛒")).unwrap_err();
        assert_eq!(errors.get("name"), Some("El nombre es requerido"));

        let payload = from_form(&FormValues::new().with_text("name", " Hogar ")).unwrap();
        assert_eq!(payload.name, "Hogar");
        assert_eq!(payload.icon, None);
    }

    #[test]
    fn icon_fallback() {
        let list = categories();
        assert_eq!(list[0].icon_or("🛒"), "📚");
        assert_eq!(list[1].icon_or("🛒"), "🛒");
        assert_eq!(to_form(&list[0]).text("name"), "Educación");
    }
}
