use log::info;
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::error::AppResult;
use crate::forms::{FieldErrors, FormValues};

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub registration_date: Option<String>,
    #[serde(default)]
    pub active: bool,
}

impl UserProfile {
    pub fn initials(&self) -> String {
        let initials: String = self
            .name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .collect();
        initials.to_uppercase()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub username: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PasswordUpdate {
    pub password: String,
}

pub fn looks_like_email(raw: &str) -> bool {
    let raw = raw.trim();
    match raw.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !raw.contains(char::is_whitespace)
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

pub fn profile_form(profile: &UserProfile) -> FormValues {
    FormValues::new()
        .with_text("name", profile.name.clone())
        .with_text("username", profile.username.clone())
        .with_text("email", profile.email.clone())
}

pub fn profile_from_form(values: &FormValues) -> Result<ProfileUpdate, FieldErrors> {
    let mut errors = FieldErrors::default();
    let name = values.require_text("name", "El nombre es requerido", &mut errors);
    let username = values.require_text("username", "El nombre de usuario es requerido", &mut errors);
    let email = values.require_text("email", "El correo es requerido", &mut errors);
    if matches!(&email, Some(email) if !looks_like_email(email)) {
        errors.add("email", "Ingresa un correo electrónico válido");
    }
    errors.into_result(ProfileUpdate {
        name: name.unwrap_or_default(),
        username: username.unwrap_or_default(),
        email: email.unwrap_or_default(),
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    pub fn of(password: &str) -> Option<Self> {
        if password.is_empty() {
            return None;
        }
        if password.chars().count() < 8 {
            return Some(PasswordStrength::Weak);
        }
        let classes = [
            password.chars().any(|c| c.is_ascii_uppercase()),
            password.chars().any(|c| c.is_ascii_lowercase()),
            password.chars().any(|c| c.is_ascii_digit()),
            password.chars().any(|c| "!@#$%^&*(),.?\":{}|<>".contains(c)),
        ]
        .iter()
        .filter(|present| **present)
        .count();
        Some(match classes {
            0..=2 => PasswordStrength::Weak,
            3 => PasswordStrength::Medium,
            _ => PasswordStrength::Strong,
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            PasswordStrength::Weak => "Débil",
            PasswordStrength::Medium => "Media",
            PasswordStrength::Strong => "Fuerte",
        }
    }

    pub fn text_class(self) -> &'static str {
        match self {
            PasswordStrength::Weak => "text-red-500",
            PasswordStrength::Medium => "text-yellow-500",
            PasswordStrength::Strong => "text-green-500",
        }
    }
}

pub fn password_from_form(values: &FormValues) -> Result<PasswordUpdate, FieldErrors> {
    let mut errors = FieldErrors::default();
    values.require_text("current_password", "La contraseña actual es requerida", &mut errors);

    let new_password = values.text("new_password");
    if new_password.chars().count() < 8 {
        errors.add("new_password", "La contraseña debe tener al menos 8 caracteres");
    } else if new_password.chars().count() > 100 {
        errors.add("new_password", "La contraseña no debe exceder 100 caracteres");
    } else if !new_password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.add("new_password", "La contraseña debe contener al menos una letra mayúscula");
    } else if !new_password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.add("new_password", "La contraseña debe contener al menos una letra minúscula");
    } else if !new_password.chars().any(|c| c.is_ascii_digit()) {
        errors.add("new_password", "La contraseña debe contener al menos un número");
    }

    let confirm = values.text("confirm_password");
    if confirm.is_empty() {
        errors.add("confirm_password", "Por favor confirma tu contraseña");
    } else if confirm != new_password {
        errors.add("confirm_password", "Las contraseñas no coinciden");
    }

    errors.into_result(PasswordUpdate { password: new_password })
}

pub async fn get_profile(client: &ApiClient, id: u64) -> AppResult<UserProfile> {
    client.get(&format!("users/{}", id)).await
}

pub async fn update_profile(client: &ApiClient, id: u64, update: &ProfileUpdate) -> AppResult<UserProfile> {
    info!("updating profile of user {}", id);
    client.patch(&format!("users/{}", id), update).await
}

pub async fn change_password(client: &ApiClient, id: u64, update: &PasswordUpdate) -> AppResult<serde_json::Value> {
    info!("changing password of user {}", id);
    client.patch(&format!("users/{}", id), update).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn email_shape() {
        assert!(looks_like_email("ana@fopy.app"));
        assert!(!looks_like_email("ana@fopy"));
        assert!(!looks_like_email("ana fopy@x.com"));
        assert!(!looks_like_email("@fopy.app"));
    }

    #[test]
    fn profile_requires_all_fields() {
        let errors = profile_from_form(&FormValues::new().with_text("email", "nope")).unwrap_err();
        assert!(errors.get("name").is_some());
        assert!(errors.get("username").is_some());
        assert_eq!(errors.get("email"), Some("Ingresa un correo electrónico válido"));

        let profile: UserProfile = serde_json::from_value(json!({
            "id": 1, "name": "Ana María Pérez", "username": "ana", "email": "ana@fopy.app"
        }))
        .unwrap();
        assert_eq!(profile.initials(), "AM");
        assert!(profile_from_form(&profile_form(&profile)).is_ok());
    }

    #[test]
    fn password_change_rules() {
        let base = FormValues::new().with_text("current_password", "old");

        let errors = password_from_form(&base.clone().with_text("new_password", "Abc1")).unwrap_err();
        assert_eq!(
            errors.get("new_password"),
            Some("La contraseña debe tener al menos 8 caracteres")
        );

        let values = base
            .clone()
            .with_text("new_password", "Secreta123")
            .with_text("confirm_password", "Secreta124");
        let errors = password_from_form(&values).unwrap_err();
        assert_eq!(errors.get("confirm_password"), Some("Las contraseñas no coinciden"));

        let values = base
            .with_text("new_password", "Secreta123")
            .with_text("confirm_password", "Secreta123");
        assert_eq!(
            serde_json::to_value(password_from_form(&values).unwrap()).unwrap(),
            json!({"password": "Secreta123"})
        );
    }

    #[test]
    fn strength_levels() {
        assert_eq!(PasswordStrength::of(""), None);
        assert_eq!(PasswordStrength::of("Ab1"), Some(PasswordStrength::Weak));
        assert_eq!(PasswordStrength::of("abcdefgh1"), Some(PasswordStrength::Weak));
        assert_eq!(PasswordStrength::of("Abcdefgh1"), Some(PasswordStrength::Medium));
        assert_eq!(PasswordStrength::of("Abcdefgh1!").map(|s| s.label()), Some("Fuerte"));
    }
}
