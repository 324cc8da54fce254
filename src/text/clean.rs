//! Text normalization. `collapse_newlines` produces the stored article
//! text; `preprocess_text` produces the stripped-down variant fed to the
//! sentiment scorer (dates and month names are removed so the model
//! cannot latch onto them).

use once_cell::sync::Lazy;
use regex::Regex;

/// Consent walls and login screens served instead of the article. Such
/// a page is left unparsed for the next pass.
pub const BLOCK_MARKERS: &[&str] = &[
    "Регистрация пройдена успешно!",
    "Please Enable Cookies",
    "Access Denied",
    "Your username or password is invalid",
];

pub fn starts_with_block_marker(text: &str) -> bool {
    BLOCK_MARKERS.iter().any(|m| text.starts_with(m))
}

static MULTI_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").expect("newline regex"));

/// Paragraph breaks become single spaces in the stored text.
pub fn collapse_newlines(text: &str) -> String {
    MULTI_NEWLINE.replace_all(text, " ").into_owned()
}

static ANY_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").expect("regex"));
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("regex"));
static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("regex"));
static YEAR_PHRASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:(\d{2}|\d{4})\s*(?:год(?:а|у)?|year))\b").expect("regex"));
static BARE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:(\d{2}|\d{4}))\b").expect("regex"));
static MONTH_NAMES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)January|February|March|April|May|June|July|August|September|October|November|December|январ[ья]|феврал[ья]|март[а]?|апрел[ья]|мая?|июн[ья]?(?:[яю]|е[ао])?|июл[ья]?[яи]?|август[а]?|сентябр[ья]?|октябр[ья]?|ноябр[ья]?|декабр[ья]",
    )
    .expect("month regex")
});

fn is_ascii_punctuation(c: char) -> bool {
    c.is_ascii() && !c.is_ascii_alphanumeric() && !c.is_ascii_whitespace() && !c.is_ascii_control()
}

/// Scorer input: punctuation stripped, whitespace squashed, year and
/// month mentions removed.
pub fn preprocess_text(text: &str) -> String {
    let without_punct: String = text
        .trim()
        .chars()
        .filter(|c| !is_ascii_punctuation(*c))
        .collect();

    let step = ANY_NEWLINE.replace_all(&without_punct, " ");
    let step = NON_WORD.replace_all(&step, " ");
    let step = MULTI_SPACE.replace_all(&step, " ");
    let step = YEAR_PHRASE.replace_all(&step, "");
    let step = BARE_YEAR.replace_all(&step, "");
    MONTH_NAMES.replace_all(&step, "").into_owned()
}
