//! # ماژول توابع کمکی (Utilities)
//!
//! تولید کد کوتاه و اعتبارسنجی ورودی‌ها.

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

// =====================================
// Constants
// =====================================
/// کاراکترهای مجاز برای short code (فقط حروف و اعداد)
pub const SHORT_CODE_CHARS: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// طول پیش‌فرض short code
pub const DEFAULT_SHORT_CODE_LENGTH: usize = 7;

/// کوتاه‌ترین طول مجاز
pub const MIN_SHORT_CODE_LENGTH: usize = 6;

/// بلندترین طول مجاز
pub const MAX_SHORT_CODE_LENGTH: usize = 8;

/// حداکثر طول URL اصلی
pub const MAX_URL_LENGTH: usize = 2048;

/// الگوی معتبر برای short code
pub static VALID_SHORT_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("Invalid regex pattern"));

// =====================================
// Short Code Generation
// =====================================
/// تولید short code تصادفی با طول پیش‌فرض
///
/// ```rust
/// use shortlink::utils::generate_short_code;
///
/// let code = generate_short_code();
/// assert_eq!(code.len(), 7);
/// ```
#[must_use]
pub fn generate_short_code() -> String {
    generate_short_code_with_length(DEFAULT_SHORT_CODE_LENGTH)
}

/// تولید short code با طول مشخص
///
/// هر کاراکتر مستقل و یکنواخت از `SHORT_CODE_CHARS` انتخاب میشه.
/// یکتا بودن اینجا تضمین نمیشه؛ دیتابیس تکراری رو رد میکنه.
#[must_use]
pub fn generate_short_code_with_length(length: usize) -> String {
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..SHORT_CODE_CHARS.len());
            SHORT_CODE_CHARS[idx] as char
        })
        .collect()
}

// =====================================
// Validation Functions
// =====================================
/// آیا رشته میتونه یه short code باشه؟
///
/// برای رد کردن زودهنگام مسیرهای عجیب قبل از رفتن سراغ دیتابیس.
#[must_use]
pub fn is_valid_short_code(code: &str) -> bool {
    let len = code.len();

    if !(MIN_SHORT_CODE_LENGTH..=MAX_SHORT_CODE_LENGTH).contains(&len) {
        return false;
    }

    VALID_SHORT_CODE.is_match(code)
}

/// پارس کردن URL ورودی کاربر
///
/// فقط آدرس مطلق با scheme `http` یا `https` قبول میشه. خروجی فرم
/// نرمال شده‌ست: percent-encoded و بدون tab/newline، پس همیشه یه
/// header `Location` معتبره.
///
/// # Errors
/// پیام خطای قابل نمایش به کاربر
pub fn parse_link_url(raw: &str) -> Result<url::Url, String> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err("URL is required".to_string());
    }

    if raw.len() > MAX_URL_LENGTH {
        return Err(format!("URL must be at most {MAX_URL_LENGTH} characters"));
    }

    let parsed = url::Url::parse(raw).map_err(|_| "Invalid URL format".to_string())?;

    match parsed.scheme() {
        "http" | "https" if !parsed.has_host() => {
            return Err("URL must include a host".to_string())
        }
        "http" | "https" => {}
        other => return Err(format!("Unsupported URL scheme '{other}'")),
    }

    // percent-encoding میتونه طول رو بیشتر کنه
    if parsed.as_str().len() > MAX_URL_LENGTH {
        return Err(format!("URL must be at most {MAX_URL_LENGTH} characters"));
    }

    Ok(parsed)
}

/// اعتبارسنجی URL
#[must_use]
pub fn is_valid_url(url_str: &str) -> bool {
    parse_link_url(url_str).is_ok()
}
