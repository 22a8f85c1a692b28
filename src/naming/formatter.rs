//! Нормализация имени приложения в короткий токен для подписи рабочего стола.
//!
//! Шаги применяются строго по порядку, каждый следующий рассчитывает на
//! результат предыдущего:
//!
//! 1. trim + lowercase
//! 2. `org.example.app` -> `app` (reverse-DNS префиксы)
//! 3. `app-2.1` -> `app` (хвосты из цифр и `.-_/|` перед пробелом или концом)
//! 4. `app (profile)` -> `app` (всё начиная с первой скобки)
//! 5. всё кроме `[a-z0-9]` -> пробел
//! 6. слова `latest`, `beta`, `unstable` -> пробел
//! 7. схлопывание пробелов
//!
//! Пустой результат означает "имени нет, узел пропускается".

use once_cell::sync::Lazy;
use regex::Regex;

static REVERSE_DNS: Lazy<Regex> = Lazy::new(|| compile(r"([a-z0-9]+\.)+"));
static NUMBER_SUFFIX: Lazy<Regex> = Lazy::new(|| compile(r"[0-9.\-_/|]+($|\s)"));
static ANNOTATION: Lazy<Regex> = Lazy::new(|| compile(r"\s*[\[({].*"));
static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| compile(r"[^a-z0-9]"));
static CHANNEL_KEYWORD: Lazy<Regex> = Lazy::new(|| compile(r"\b(latest|beta|unstable)\b"));

pub fn format_name(raw: &str) -> String {
    let name = raw.trim().to_lowercase();
    let name = REVERSE_DNS.replace_all(&name, "");
    let name = NUMBER_SUFFIX.replace_all(&name, "");
    let name = ANNOTATION.replace_all(&name, "");
    let name = NON_ALPHANUMERIC.replace_all(&name, " ");
    let name = CHANNEL_KEYWORD.replace_all(&name, " ");
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

// Шаблоны статические: ошибка компиляции тут - ошибка в исходнике
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("invalid built-in name pattern")
}
