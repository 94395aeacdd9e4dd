//! Word lists and filler text for generated records

use rand::seq::SliceRandom;
use rand::Rng;

pub const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Grace", "Linus", "Barbara", "Dennis", "Margaret", "Ken", "Frances", "Edsger",
    "Radia", "Donald", "Hedy", "John", "Katherine", "Tim", "Shafi", "Niklaus", "Sophie", "Guido",
];

pub const LAST_NAMES: &[&str] = &[
    "Lovelace", "Turing", "Hopper", "Torvalds", "Liskov", "Ritchie", "Hamilton", "Thompson",
    "Allen", "Dijkstra", "Perlman", "Knuth", "Lamarr", "Backus", "Johnson", "Berners", "Goldwasser",
    "Wirth", "Wilson", "Rossum",
];

pub const SKILLS: &[&str] = &[
    "Python",
    "JavaScript",
    "MongoDB",
    "SQL",
    "Data Science",
    "Machine Learning",
];

pub const CATEGORIES: &[&str] = &[
    "Programming",
    "Data Science",
    "Design",
    "Database",
    "Cybersecurity",
];

pub const COURSE_TAGS: &[&str] = &["Python", "MongoDB", "Cloud", "UX", "Networks"];

const WORDS: &[&str] = &[
    "data", "model", "query", "index", "stream", "design", "system", "network", "secure", "cloud",
    "pattern", "schema", "learn", "build", "deploy", "scale", "test", "review", "practice",
    "project", "module", "concept", "theory", "applied", "modern", "advanced", "practical", "intro",
    "guide",
];

/// A capitalised sentence of exactly `words` words ending in a full stop
pub fn sentence<R: Rng + ?Sized>(rng: &mut R, words: usize) -> String {
    let picked: Vec<&str> = (0..words.max(1))
        .map(|_| *WORDS.choose(rng).unwrap_or(&"lorem"))
        .collect();

    let mut text = capitalise(picked[0]);
    for word in &picked[1..] {
        text.push(' ');
        text.push_str(word);
    }
    text.push('.');
    text
}

/// A few sentences of filler
pub fn paragraph<R: Rng + ?Sized>(rng: &mut R, sentences: usize) -> String {
    (0..sentences.max(1))
        .map(|_| {
            let len = rng.gen_range(4..=9);
            sentence(rng, len)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `count` distinct entries of `pool`
pub fn sample<R: Rng + ?Sized>(rng: &mut R, pool: &[&str], count: usize) -> Vec<String> {
    pool.choose_multiple(rng, count)
        .map(|s| s.to_string())
        .collect()
}

/// Round to `places` decimals
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
