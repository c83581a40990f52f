use crate::error::{AppError, AppResult};

pub const MAX_LOT_NAME_LEN: usize = 30;
pub const MAX_POSTAL_CODE_LEN: usize = 6;
pub const MOBILE_LEN: usize = 10;
pub const MAX_GENDER_LEN: usize = 6;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_SPOTS_PER_LOT: i32 = 10_000;

fn bad(message: impl Into<String>) -> AppError {
    AppError::BadRequest(message.into())
}

/// Trims and rejects empty input.
pub fn required(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(bad(format!("{field} is required")));
    }
    Ok(value.to_string())
}

pub fn normalize_email(email: &str) -> AppResult<String> {
    let email = required("Email", email)?.to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid || email.chars().any(char::is_whitespace) {
        return Err(bad("Email is not valid"));
    }
    Ok(email)
}

pub fn normalize_mobile(mobile: &str) -> AppResult<String> {
    let mobile = required("Mobile", mobile)?;
    if mobile.len() != MOBILE_LEN || !mobile.chars().all(|c| c.is_ascii_digit()) {
        return Err(bad(format!("Mobile must be {MOBILE_LEN} digits")));
    }
    Ok(mobile)
}

pub fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(bad(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub fn normalize_gender(gender: Option<&str>) -> AppResult<Option<String>> {
    match gender.map(str::trim).filter(|g| !g.is_empty()) {
        None => Ok(None),
        Some(g) if g.chars().count() <= MAX_GENDER_LEN => Ok(Some(g.to_string())),
        Some(_) => Err(bad(format!(
            "Gender must be at most {MAX_GENDER_LEN} characters"
        ))),
    }
}

pub fn normalize_lot_name(name: &str) -> AppResult<String> {
    let name = required("Name", name)?;
    if name.chars().count() > MAX_LOT_NAME_LEN {
        return Err(bad(format!(
            "Name must be at most {MAX_LOT_NAME_LEN} characters"
        )));
    }
    Ok(name)
}

pub fn normalize_postal_code(code: &str) -> AppResult<String> {
    let code = required("Postal code", code)?.to_uppercase();
    if code.len() > MAX_POSTAL_CODE_LEN || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(bad(format!(
            "Postal code must be at most {MAX_POSTAL_CODE_LEN} letters or digits"
        )));
    }
    Ok(code)
}

pub fn validate_price(price_per_hour: i64) -> AppResult<()> {
    if price_per_hour < 0 {
        return Err(bad("Price per hour cannot be negative"));
    }
    Ok(())
}

pub fn validate_capacity(spots: i32) -> AppResult<()> {
    if spots < 1 {
        return Err(bad("A lot needs at least one spot"));
    }
    if spots > MAX_SPOTS_PER_LOT {
        return Err(bad(format!(
            "A lot can have at most {MAX_SPOTS_PER_LOT} spots"
        )));
    }
    Ok(())
}

pub fn normalize_vehicle_number(vehicle: &str) -> AppResult<String> {
    Ok(required("Vehicle number", vehicle)?.to_uppercase())
}

/// Escapes `\`, `%` and `_` so user text matches literally inside a `LIKE` pattern.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
