use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::error::{AppError, AppResult};
use crate::features::users::looks_like_email;
use crate::forms::{FieldErrors, FormValues};
use crate::session::Session;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AuthUser {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

// Older backends put the user fields at the top level.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AuthResponse {
    #[serde(alias = "accessToken", alias = "token")]
    pub access_token: String,
    #[serde(default)]
    pub user: Option<AuthUser>,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl AuthResponse {
    pub fn into_session(self) -> AppResult<Session> {
        let (user_id, name, email) = match self.user {
            Some(user) => (user.id, user.name, user.email),
            None => match self.id {
                Some(id) => (id, self.name.unwrap_or_default(), self.email.unwrap_or_default()),
                None => return Err(AppError::decode("la respuesta de autenticación no incluye el usuario")),
            },
        };
        if self.access_token.is_empty() {
            return Err(AppError::decode("la respuesta de autenticación no incluye el token"));
        }
        Ok(Session {
            user_id,
            access_token: self.access_token,
            name,
            email,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

pub fn login_from_form(values: &FormValues) -> Result<LoginRequest, FieldErrors> {
    let mut errors = FieldErrors::default();
    let email = values.require_text("email", "El correo es requerido", &mut errors);
    if matches!(&email, Some(email) if !looks_like_email(email)) {
        errors.add("email", "Ingresa un correo electrónico válido");
    }
    if values.text("password").is_empty() {
        errors.add("password", "La contraseña es requerida");
    }
    errors.into_result(LoginRequest {
        email: email.unwrap_or_default(),
        password: values.text("password"),
    })
}

pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| "@$!%*?&.".contains(c))
        && password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@$!%*?&.".contains(c))
}

fn check_new_password(values: &FormValues, errors: &mut FieldErrors) -> String {
    let password = values.text("password");
    if password.chars().count() < 8 {
        errors.add("password", "La contraseña debe tener como mínimo 8 carácteres");
    } else if !is_strong_password(&password) {
        errors.add(
            "password",
            "La contraseña debe contener al menos una letra mayúscula, una letra minúscula, un número y un símbolo especial",
        );
    }
    let confirmation = values.text("password_confirmation");
    if confirmation.is_empty() {
        errors.add("password_confirmation", "La contraseña de confirmación es requerida");
    } else if confirmation != password {
        errors.add("password_confirmation", "Las contraseñas no coinciden");
    }
    password
}

pub fn register_from_form(values: &FormValues) -> Result<RegisterRequest, FieldErrors> {
    let mut errors = FieldErrors::default();
    let name = values.require_text("name", "El nombre es requerido", &mut errors);
    let username = values.require_text("username", "El nombre de usuario es requerido", &mut errors);
    let email = values.require_text("email", "El correo es requerido", &mut errors);
    if matches!(&email, Some(email) if !looks_like_email(email)) {
        errors.add("email", "Ingresa un correo electrónico válido");
    }
    let password = check_new_password(values, &mut errors);
    errors.into_result(RegisterRequest {
        name: name.unwrap_or_default(),
        username: username.unwrap_or_default(),
        email: email.unwrap_or_default(),
        password,
    })
}

pub fn reset_from_form(values: &FormValues, token: Option<&str>) -> Result<ResetPasswordRequest, FieldErrors> {
    let mut errors = FieldErrors::default();
    let password = check_new_password(values, &mut errors);
    let token = token.map(str::trim).filter(|t| !t.is_empty());
    if token.is_none() {
        errors.add("token", "Token inválido o no proporcionado");
    }
    errors.into_result(ResetPasswordRequest {
        token: token.unwrap_or_default().to_string(),
        password,
    })
}

pub async fn login(client: &ApiClient, request: &LoginRequest) -> AppResult<Session> {
    info!("logging in {}", request.email);
    let response: AuthResponse = client.post("auth/login", request).await?;
    response.into_session()
}

pub async fn register(client: &ApiClient, request: &RegisterRequest) -> AppResult<Session> {
    info!("registering {}", request.email);
    let response: AuthResponse = client.post("auth/register", request).await?;
    response.into_session()
}

pub async fn forgot_password(client: &ApiClient, request: &ForgotPasswordRequest) -> AppResult<String> {
    let response: Option<MessageResponse> = client.post("auth/forgot-password", request).await?;
    Ok(response.map(|r| r.message).unwrap_or_default())
}

pub async fn reset_password(client: &ApiClient, request: &ResetPasswordRequest) -> AppResult<String> {
    let response: Option<MessageResponse> = client.post("auth/reset-password", request).await?;
    Ok(response.map(|r| r.message).unwrap_or_default())
}

pub async fn logout(client: &ApiClient) {
    if let Err(err) = client.delete("auth/logout").await {
        warn!("logout request failed: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_from_nested_or_flat_response() {
        let nested: AuthResponse = serde_json::from_value(json!({
            "accessToken": "abc",
            "user": {"id": 4, "name": "Ana", "email": "ana@fopy.app"}
        }))
        .unwrap();
        let session = nested.into_session().unwrap();
        assert_eq!((session.user_id, session.access_token.as_str()), (4, "abc"));

        let flat: AuthResponse =
            serde_json::from_value(json!({"access_token": "xyz", "id": 9, "name": "Luis"})).unwrap();
        assert_eq!(flat.into_session().unwrap().name, "Luis");

        let missing: AuthResponse = serde_json::from_value(json!({"token": "t"})).unwrap();
        assert!(matches!(missing.into_session(), Err(AppError::Decode { .. })));
    }

    #[test]
    fn login_validation() {
        let errors = login_from_form(&FormValues::new().with_text("email", "ana")).unwrap_err();
        assert!(errors.get("email").is_some());
        assert_eq!(errors.get("password"), Some("La contraseña es requerida"));

        let ok = login_from_form(
            &FormValues::new()
                .with_text("email", " ana@fopy.app ")
                .with_text("password", "x"),
        )
        .unwrap();
        assert_eq!(ok.email, "ana@fopy.app");
    }

    #[test]
    fn strong_password_rules() {
        assert!(is_strong_password("Secreta1!"));
        assert!(!is_strong_password("Secreta12"));
        assert!(!is_strong_password("secreta1!"));
        assert!(!is_strong_password("Secreta 1!"));
    }

    #[test]
    fn reset_needs_token_and_matching_passwords() {
        let values = FormValues::new()
            .with_text("password", "Secreta1!")
            .with_text("password_confirmation", "Secreta1!");
        let errors = reset_from_form(&values, None).unwrap_err();
        assert_eq!(errors.get("token"), Some("Token inválido o no proporcionado"));

        let request = reset_from_form(&values, Some("tok")).unwrap();
        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({"token": "tok", "password": "Secreta1!"})
        );

        let mismatched = values.with_text("password_confirmation", "Otra1!aaa");
        let errors = reset_from_form(&mismatched, Some("tok")).unwrap_err();
        assert_eq!(errors.get("password_confirmation"), Some("Las contraseñas no coinciden"));
    }
}
