use log::error;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    #[error("usuario no autenticado")]
    Unauthenticated,

    #[error("error de red: {message}")]
    Network { message: String },

    #[error("el servidor respondió {status}: {message}")]
    Http { status: u16, message: String },

    #[error("respuesta inválida: {message}")]
    Decode { message: String },

    #[error("{message}")]
    Api { message: String },

    #[error("no soportado: {message}")]
    Unsupported { message: String },
}

impl AppError {
    pub fn network<S: Into<String>>(message: S) -> Self {
        let message = message.into();
        error!("network error: {}", message);
        Self::Network { message }
    }

    pub fn http<S: Into<String>>(status: u16, message: S) -> Self {
        let message = message.into();
        error!("http error {}: {}", status, message);
        Self::Http { status, message }
    }

    pub fn decode<S: Into<String>>(message: S) -> Self {
        let message = message.into();
        error!("decode error: {}", message);
        Self::Decode { message }
    }

    pub fn api<S: Into<String>>(message: S) -> Self {
        let message = message.into();
        error!("api error: {}", message);
        Self::Api { message }
    }

    pub fn unsupported<S: Into<String>>(message: S) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, AppError::Unauthenticated | AppError::Http { status: 401, .. })
    }

    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Api { message } if !message.is_empty() => message.clone(),
            AppError::Http { message, .. } if !message.is_empty() => message.clone(),
            AppError::Unauthenticated => "Tu sesión ha expirado, inicia sesión de nuevo".to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<gloo_net::Error> for AppError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => AppError::decode(e.to_string()),
            other => AppError::network(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::decode(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_status_counts_as_unauthenticated() {
        assert!(AppError::Http {
            status: 401,
            message: String::new()
        }
        .is_unauthenticated());
        assert!(AppError::Unauthenticated.is_unauthenticated());
        assert!(!AppError::Network {
            message: "offline".into()
        }
        .is_unauthenticated());
    }

    #[test]
    fn user_message_prefers_server_text() {
        let err = AppError::Api {
            message: "Presupuesto duplicado".into(),
        };
        assert_eq!(err.user_message("Error al guardar"), "Presupuesto duplicado");

        let err = AppError::Network {
            message: "TypeError: failed to fetch".into(),
        };
        assert_eq!(err.user_message("Error al guardar"), "Error al guardar");
    }

    #[test]
    fn serde_errors_become_decode_errors() {
        let err: AppError = serde_json::from_str::<u32>("\"x\"").unwrap_err().into();
        assert!(matches!(err, AppError::Decode { .. }));
    }
}
