//! Backend message codes mapped to user-facing text

use serde::Deserialize;

/// Generic fallback when a login attempt fails without a usable message
pub const LOGIN_FAILED: &str = "Не вдалося увійти";

/// Generic fallback when a registration fails without a usable message
pub const REGISTER_FAILED: &str = "Реєстрація не вдалася";

const ERROR_MESSAGES: [(&str, &str); 3] = [
    ("USER_ALREADY_EXISTS", "Користувач з таким логіном вже існує"),
    ("INVALID_USERNAME_OR_PASSWORD", "Неправильний логін або пароль"),
    ("USERNAME_NOT_FOUND", "Користувача з таким логіном не існує"),
];

/// Error body returned by the auth endpoints: `{"message": "<CODE>"}`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

/// Look up the fixed text for a known code
pub fn localize(code: &str) -> Option<&'static str> {
    ERROR_MESSAGES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, text)| *text)
}

/// Text for a server message: the mapped text, or the raw message itself
pub fn localize_or_raw(code: &str) -> String {
    localize(code)
        .map(str::to_string)
        .unwrap_or_else(|| code.to_string())
}

/// Extract `(code, user-facing message)` from an auth error body.
///
/// Falls back to `fallback` when the body carries no message.
pub fn describe_error_body(body: &[u8], fallback: &str) -> (Option<String>, String) {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(code),
        }) if !code.is_empty() => {
            let text = localize_or_raw(&code);
            (Some(code), text)
        }
        _ => (None, fallback.to_string()),
    }
}
