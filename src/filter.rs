//! Stop-word topic filter applied to titles before ingestion.
//!
//! Titles are tokenized, reduced to crude lemmas by suffix stripping, and
//! intersected with a fixed bilingual blocklist. The gate only sees the
//! boolean outcome, so alternative classifiers can be swapped in behind
//! [`TitleFilter`].

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Boolean predicate deciding whether a title is routed to the
/// excluded-filter store instead of the article store.
pub trait TitleFilter: Send + Sync {
    fn is_excluded(&self, title: &str) -> bool;
}

/// Topic blocklist, lemma/stem form. Titles touching these topics are
/// kept out of the article table.
static BLOCKLIST: &[&str] = &[
    // Russian
    "telegram",
    "twitter",
    "аборт",
    "аварийный",
    "атмосферный",
    "беженец",
    "бренд",
    "вдова",
    "ветеран",
    "взрыв",
    "внук",
    "возгорание",
    "вратарь",
    "выбор",
    "геноцид",
    "гибель",
    "голевой",
    "гололедица",
    "госпитализировать",
    "группировка",
    "губернатор",
    "девушка",
    "диверсия",
    "дождь",
    "жена",
    "жених",
    "загореться",
    "задержание",
    "заложник",
    "заморозок",
    "землетрясение",
    "зритель",
    "иммигрант",
    "инвалидность",
    "каникулы",
    "кинотеатр",
    "кладбище",
    "климат",
    "концерт",
    "ледяной",
    "летальный",
    "магазин",
    "маньяк",
    "матч",
    "митинг",
    "многодетный",
    "мобилизация",
    "мошенник",
    "мошенничество",
    "мчс",
    "обстрел",
    "обстрелять",
    "оползень",
    "осадки",
    "паводок",
    "пациент",
    "пенсионер",
    "пенсия",
    "плен",
    "погибнуть",
    "пожар",
    "полицейский",
    "полиция",
    "полуфинал",
    "похищение",
    "преступник",
    "реабилитация",
    "ребёнок",
    "родственник",
    "свадьба",
    "семья",
    "синоптик",
    "сирота",
    "скончаться",
    "следственный",
    "смерть",
    "снег",
    "снежный",
    "соцсеть",
    "супруг",
    "телеграм",
    "теракт",
    "терроризм",
    "террористический",
    "тюрьма",
    "убийство",
    "убитый",
    "уголовный",
    "фильм",
    "футбол",
    "хоккеист",
    "хоккейный",
    "цветение",
    "церемония",
    "чемпионат",
    "шайба",
    "школьник",
    "штамм",
    "эвакуировать",
    "эвтаназия",
    "мятеж",
    "вагнер",
    // English
    "abortion",
    "athlete",
    "attack",
    "baseball",
    "bishop",
    "blizzard",
    "bloodshed",
    "burial",
    "buried",
    "catholic",
    "ceasefire",
    "championship",
    "christian",
    "church",
    "civilian",
    "cloudy",
    "coach",
    "cocaine",
    "crime",
    "cricket",
    "cult",
    "cyclone",
    "daughter",
    "death",
    "died",
    "drought",
    "election",
    "evacuate",
    "evacuation",
    "explosion",
    "extradition",
    "fans",
    "father",
    "filmmaker",
    "football",
    "funeral",
    "gunfire",
    "holocaust",
    "homicide",
    "injure",
    "injured",
    "injuries",
    "interview",
    "jesus",
    "kidnap",
    "kidnapped",
    "killed",
    "killing",
    "legislative",
    "lgbt",
    "mafia",
    "marriage",
    "married",
    "migrant",
    "migration",
    "missile",
    "mosque",
    "mother",
    "mourner",
    "murder",
    "murderer",
    "museum",
    "music",
    "musician",
    "muslim",
    "mutiny",
    "orthodox",
    "pastor",
    "playing",
    "police",
    "policing",
    "polling",
    "pope",
    "postseason",
    "prayer",
    "presidential",
    "priest",
    "prisoner",
    "protest",
    "rainfall",
    "rains",
    "raped",
    "rebellion",
    "religious",
    "rescue",
    "riot",
    "sexual",
    "sexually",
    "shoot",
    "shooting",
    "soccer",
    "socialist",
    "son",
    "spiritual",
    "sports",
    "stock",
    "stocks",
    "suicide",
    "survivor",
    "tournament",
    "transgender",
    "tsunami",
    "vatican",
    "violence",
    "wagner",
    "wife",
    "witness",
    "worship",
    "wounded",
];

/// Function words removed before the blocklist intersection.
static STOPWORDS: &[&str] = &[
    // Russian
    "без", "более", "был", "была", "были", "было", "быть", "вас", "вот", "все",
    "всего", "всех", "где", "для", "его", "еще", "или", "ими", "как", "кто",
    "между", "меня", "мне", "над", "нас", "нет", "них", "него", "нее", "она",
    "они", "оно", "около", "под", "при", "про", "так", "там", "тем", "теперь",
    "того", "тоже", "только", "хотя", "чего", "чем", "что", "чтобы", "это",
    "эти", "этого", "этой", "этом", "этот",
    // English
    "about", "after", "all", "and", "are", "before", "because", "between", "both",
    "but", "can", "does", "for", "from", "has", "have", "her", "here", "him",
    "his", "how", "into", "its", "more", "most", "not", "now", "off", "once",
    "only", "other", "our", "out", "over", "own", "same", "she", "some",
    "such", "than", "that", "the", "their", "them", "then", "there", "these",
    "they", "this", "those", "through", "under", "until", "very", "was",
    "were", "what", "when", "where", "which", "while", "who", "whom", "why",
    "will", "with", "you", "your",
];

/// Longest-first so the most specific inflection wins.
const RU_ENDINGS: &[&str] = &[
    "ьный", "ьная", "ьное", "ьные", "иями", "ого", "его", "ому", "ему", "ыми",
    "ими", "ами", "ями", "ях", "ах", "ов", "ев", "ей", "ой", "ий", "ый", "ая",
    "яя", "ое", "ее", "ие", "ые", "ам", "ям", "ом", "ем", "ую", "юю", "а",
    "я", "о", "е", "ы", "и", "у", "ю", "ь",
];

const EN_ENDINGS: &[&str] = &["ing", "ers", "ies", "ed", "es", "er", "s"];

static BLOCKSET: Lazy<HashSet<&'static str>> = Lazy::new(|| BLOCKLIST.iter().copied().collect());
static STOPSET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOPWORDS.iter().copied().collect());

/// Blocklist-backed [`TitleFilter`]. Process-wide read-only; build once
/// and share.
#[derive(Debug, Default)]
pub struct StopWordFilter;

impl StopWordFilter {
    pub fn new() -> Self {
        Self
    }
}

impl TitleFilter for StopWordFilter {
    fn is_excluded(&self, title: &str) -> bool {
        find_words(title)
            .into_iter()
            .filter(|w| !STOPSET.contains(w.as_str()))
            .any(|w| BLOCKSET.contains(w.as_str()) || BLOCKSET.contains(lemma(&w).as_str()))
    }
}

/// Alphabetic tokens of length >= 3, lowercased.
fn find_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 3 && w.chars().all(char::is_alphabetic))
        .map(str::to_lowercase)
        .collect()
}

/// Crude lemmatization: strip one known inflectional ending, keeping at
/// least three characters of stem.
fn lemma(word: &str) -> String {
    let endings: &[&str] = if word.chars().any(|c| ('\u{0400}'..='\u{04FF}').contains(&c)) {
        RU_ENDINGS
    } else {
        EN_ENDINGS
    };
    for ending in endings {
        if let Some(stem) = word.strip_suffix(ending) {
            if stem.chars().count() >= 3 {
                return stem.to_string();
            }
        }
    }
    word.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_business_title_passes() {
        let filter = StopWordFilter::new();
        assert!(!filter.is_excluded("Test Event"));
        assert!(!filter.is_excluded("Trade agreement signed with regional partners"));
    }

    #[test]
    fn english_blocked_token() {
        let filter = StopWordFilter::new();
        assert!(filter.is_excluded("Football match tonight"));
        assert!(filter.is_excluded("Police investigate downtown shooting"));
    }

    #[test]
    fn russian_inflected_forms_match() {
        let filter = StopWordFilter::new();
        assert!(filter.is_excluded("Футбольный матч завершился"));
        assert!(filter.is_excluded("Пожар в жилом доме"));
        assert!(!filter.is_excluded("Экспорт зерна вырос"));
    }

    #[test]
    fn short_and_nonalpha_tokens_ignored() {
        assert_eq!(find_words("AI on x2!"), Vec::<String>::new());
        assert_eq!(find_words("Нефть и газ"), vec!["нефть".to_string(), "газ".to_string()]);
    }

    #[test]
    fn lemma_strips_inflections() {
        assert_eq!(lemma("футбольный"), "футбол");
        assert_eq!(lemma("матча"), "матч");
        assert_eq!(lemma("выборы"), "выбор");
        assert_eq!(lemma("shootings"), "shooting");
        assert_eq!(lemma("газ"), "газ");
    }
}
