//! Fake content generation for simulated chat activity.
//!
//! The engine never invents text itself. Names, profile fields, message
//! bodies, emoji and placeholder image URLs all come from a
//! [`ContentSource`], which draws from the engine's seeded RNG so a fixed
//! seed reproduces the same conversation.
//!
//! [`LoremContent`] is the built-in source backed by static word pools.

use std::fmt::Debug;

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

/// Supplier of plausible human-readable content.
pub trait ContentSource: Send + Sync + Debug {
    /// A first and last name.
    fn full_name(&self, rng: &mut StdRng) -> String;

    /// A short profile biography.
    fn bio(&self, rng: &mut StdRng) -> String;

    /// An email address.
    fn email(&self, rng: &mut StdRng) -> String;

    /// A job title.
    fn job_title(&self, rng: &mut StdRng) -> String;

    /// A placeholder avatar image URL.
    fn avatar_url(&self, rng: &mut StdRng) -> String;

    /// A placeholder image URL of the given dimensions.
    fn image_url(&self, rng: &mut StdRng, width: u32, height: u32) -> String;

    /// A sentence of 1 to 40 words.
    fn sentence(&self, rng: &mut StdRng) -> String;

    /// A single emoji.
    fn emoji(&self, rng: &mut StdRng) -> String;
}

// -----------------------------------------------------------------------
// Word pools
// -----------------------------------------------------------------------

const FIRST_NAMES: &[&str] = &[
    "Ada", "Bruno", "Chloe", "Dmitri", "Elena", "Farah", "Gustavo", "Hana",
    "Ivan", "Jasmine", "Kofi", "Lena", "Mateo", "Nadia", "Oscar", "Priya",
    "Quinn", "Rosa", "Samir", "Tessa", "Umar", "Vera", "Wes", "Ximena",
    "Yusuf", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Becker", "Castillo", "Dubois", "Eriksen", "Fischer", "Garcia",
    "Hughes", "Ito", "Jensen", "Kowalski", "Larsen", "Moreau", "Nakamura",
    "Okafor", "Petrov", "Quigley", "Rossi", "Schmidt", "Tanaka", "Ueda",
    "Valdez", "Weber", "Yilmaz", "Zimmerman",
];

const LOREM_WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing",
    "elit", "sed", "do", "eiusmod", "tempor", "incididunt", "ut", "labore",
    "et", "dolore", "magna", "aliqua", "enim", "ad", "minim", "veniam",
    "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure",
    "in", "reprehenderit", "voluptate", "velit", "esse", "cillum", "fugiat",
    "nulla", "pariatur", "excepteur", "sint", "occaecat", "cupidatat", "non",
    "proident", "sunt", "culpa", "qui", "officia", "deserunt", "mollit",
    "anim", "id", "est", "laborum",
];

const JOB_DESCRIPTORS: &[&str] = &[
    "Senior", "Lead", "Principal", "Junior", "Chief", "Regional", "Global",
    "Dynamic", "Future", "Corporate",
];

const JOB_AREAS: &[&str] = &[
    "Marketing", "Operations", "Security", "Research", "Design", "Data",
    "Infrastructure", "Quality", "Communications", "Accounts",
];

const JOB_TYPES: &[&str] = &[
    "Engineer", "Manager", "Analyst", "Designer", "Architect", "Consultant",
    "Specialist", "Coordinator", "Developer", "Strategist",
];

const BIO_NOUNS: &[&str] = &[
    "coffee", "film", "music", "travel", "book", "cat", "dog", "running",
    "photography", "pizza", "chess", "garden",
];

const BIO_ROLES: &[&str] = &[
    "enthusiast", "lover", "fan", "addict", "devotee", "junkie", "buff",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net", "mail.test"];

const EMOJI: &[&str] = &[
    // smiley
    "😀", "😂", "😍", "🤔", "😎", "😭", "🥳", "😴", "🙃", "😇",
    // flag
    "🏁", "🚩", "🏳️", "🏴", "🇯🇵", "🇫🇷", "🇧🇷", "🇨🇦", "🇳🇬", "🇮🇳",
    // food
    "🍕", "🍣", "🌮", "🍩", "🍎", "🥐", "🍜", "🧀", "🍫", "🍉",
];

const MAX_SENTENCE_WORDS: usize = 40;

/// Upper bound for the cache-busting `lock` parameter on image URLs.
const IMAGE_LOCK_MAX: u32 = 1_000_000;

const AVATAR_WIDTH: u32 = 640;
const AVATAR_HEIGHT: u32 = 480;

/// Pick one entry from a non-empty static pool.
fn pick(rng: &mut StdRng, pool: &[&'static str]) -> &'static str {
    pool.choose(rng).copied().unwrap_or_default()
}

/// Built-in [`ContentSource`] backed by static lorem-ipsum style pools.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoremContent;

impl ContentSource for LoremContent {
    fn full_name(&self, rng: &mut StdRng) -> String {
        format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES))
    }

    fn bio(&self, rng: &mut StdRng) -> String {
        format!(
            "{} {}, {} {}",
            pick(rng, BIO_NOUNS),
            pick(rng, BIO_ROLES),
            pick(rng, BIO_NOUNS),
            pick(rng, BIO_ROLES)
        )
    }

    fn email(&self, rng: &mut StdRng) -> String {
        let suffix: u32 = rng.random_range(1..100);
        format!(
            "{}.{}{suffix}@{}",
            pick(rng, FIRST_NAMES).to_lowercase(),
            pick(rng, LAST_NAMES).to_lowercase(),
            pick(rng, EMAIL_DOMAINS)
        )
    }

    fn job_title(&self, rng: &mut StdRng) -> String {
        format!(
            "{} {} {}",
            pick(rng, JOB_DESCRIPTORS),
            pick(rng, JOB_AREAS),
            pick(rng, JOB_TYPES)
        )
    }

    fn avatar_url(&self, rng: &mut StdRng) -> String {
        self.image_url(rng, AVATAR_WIDTH, AVATAR_HEIGHT)
    }

    fn image_url(&self, rng: &mut StdRng, width: u32, height: u32) -> String {
        let lock: u32 = rng.random_range(1..=IMAGE_LOCK_MAX);
        format!("https://loremflickr.com/{width}/{height}?lock={lock}")
    }

    fn sentence(&self, rng: &mut StdRng) -> String {
        let word_count = rng.random_range(1..=MAX_SENTENCE_WORDS);
        let words: Vec<&str> = (0..word_count).map(|_| pick(rng, LOREM_WORDS)).collect();
        let mut sentence = capitalize(&words.join(" "));
        sentence.push('.');
        sentence
    }

    fn emoji(&self, rng: &mut StdRng) -> String {
        pick(rng, EMOJI).to_owned()
    }
}

/// Uppercase the first character of `text`.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
