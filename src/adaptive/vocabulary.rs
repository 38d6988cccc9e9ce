//! Practice word tables and activity lists.
//!
//! Words are Indonesian; each level groups them by topic category.

use std::collections::{BTreeMap, HashSet};

use crate::adaptive::types::{DifficultyLevel, LearningStyle};

type CategoryTable = &'static [(&'static str, &'static [&'static str])];

const VERY_EASY_WORDS: CategoryTable = &[
    ("family", &["mama", "papa", "kakak", "adik"]),
    ("basic_needs", &["makan", "minum", "tidur", "main"]),
    ("simple_objects", &["bola", "air", "nasi", "susu"]),
    ("actions", &["duduk", "berdiri", "jalan", "lari"]),
];

const EASY_WORDS: CategoryTable = &[
    ("family", &["keluarga", "orangtua", "saudara", "nenek", "kakek"]),
    ("school", &["sekolah", "guru", "teman", "buku", "pensil"]),
    ("home", &["rumah", "kamar", "dapur", "kursi", "meja"]),
    ("activities", &["bermain", "belajar", "membaca", "menulis"]),
];

const MEDIUM_WORDS: CategoryTable = &[
    ("emotions", &["senang", "sedih", "marah", "takut", "excited"]),
    ("descriptions", &["besar", "kecil", "tinggi", "pendek", "cantik"]),
    ("complex_actions", &["berlari", "melompat", "bercerita", "menyanyi"]),
    ("abstract", &["impian", "harapan", "cita-cita", "kreativitas"]),
];

const HARD_WORDS: CategoryTable = &[
    ("academic", &["pembelajaran", "pengetahuan", "eksperimen", "observasi"]),
    ("social", &["komunikasi", "kolaborasi", "kerjasama", "kepemimpinan"]),
    ("complex_concepts", &["perpustakaan", "matematika", "kreativitas"]),
    ("advanced_emotions", &["antusiasme", "kecemasan", "kepercayaan"]),
];

const VERY_HARD_WORDS: CategoryTable = &[
    ("advanced_academic", &["metamorfosis", "fotosintesis", "gravitasi"]),
    ("complex_social", &["empati", "toleransi", "demokratis", "pluralisme"]),
    ("abstract_concepts", &["filosofi", "metodologi", "epistemologi"]),
    ("scientific", &["mikroorganisme", "ekosistem", "biodiversitas"]),
];

/// Served when word selection cannot run at all.
pub const FALLBACK_WORDS: [&str; 5] = ["mama", "papa", "air", "makan", "tidur"];

pub const GENERIC_ACTIVITIES: [&str; 3] = [
    "Listen carefully to the example",
    "Say the word slowly",
    "Take your time, no rushing",
];

pub fn activities_for(style: LearningStyle) -> &'static [&'static str] {
    match style {
        LearningStyle::Visual => &[
            "Look at the picture while saying the word",
            "Make a picture word card",
            "Watch the pronunciation video",
            "Play guess-the-picture",
        ],
        LearningStyle::Auditory => &[
            "Listen to the example several times",
            "Sing the words",
            "Record your own voice",
            "Play a rhyming game",
        ],
        LearningStyle::Kinesthetic => &[
            "Move your hands while you speak",
            "Walk around while practicing",
            "Act out the word",
            "Make the word with a gesture",
        ],
        LearningStyle::Mixed => &[
            "Combine pictures and sounds",
            "Move while you look and listen",
            "Try a different activity every session",
            "Explore with all your senses",
        ],
    }
}

/// Difficulty → category → words.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    levels: BTreeMap<DifficultyLevel, Vec<(String, Vec<String>)>>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Vocabulary {
    pub fn builtin() -> Self {
        let tables = [
            (DifficultyLevel::VeryEasy, VERY_EASY_WORDS),
            (DifficultyLevel::Easy, EASY_WORDS),
            (DifficultyLevel::Medium, MEDIUM_WORDS),
            (DifficultyLevel::Hard, HARD_WORDS),
            (DifficultyLevel::VeryHard, VERY_HARD_WORDS),
        ];

        let mut vocabulary = Self::empty();
        for (level, table) in tables {
            let categories = table
                .iter()
                .map(|(name, words)| {
                    (name.to_string(), words.iter().map(|w| w.to_string()).collect())
                })
                .collect();
            vocabulary.levels.insert(level, categories);
        }
        vocabulary
    }

    pub fn empty() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Replace one level's table.
    pub fn with_level(
        mut self,
        level: DifficultyLevel,
        categories: Vec<(String, Vec<String>)>,
    ) -> Self {
        self.levels.insert(level, categories);
        self
    }

    pub fn categories(&self, level: DifficultyLevel) -> Option<&[(String, Vec<String>)]> {
        self.levels.get(&level).map(Vec::as_slice)
    }

    /// All distinct words for `level`, in table order. A level without a
    /// table borrows the `Easy` one.
    pub fn words_for(&self, level: DifficultyLevel) -> Vec<String> {
        let categories = self
            .categories(level)
            .or_else(|| self.categories(DifficultyLevel::Easy))
            .unwrap_or(&[]);

        let mut seen = HashSet::new();
        categories
            .iter()
            .flat_map(|(_, words)| words.iter())
            .filter(|w| seen.insert(w.as_str()))
            .cloned()
            .collect()
    }
}

/// Counts vowel groups; every word has at least one syllable.
pub fn estimate_syllables(word: &str) -> usize {
    let mut count = 0;
    let mut prev_was_vowel = false;
    for c in word.to_lowercase().chars() {
        let is_vowel = matches!(c, 'a' | 'i' | 'u' | 'e' | 'o');
        if is_vowel && !prev_was_vowel {
            count += 1;
        }
        prev_was_vowel = is_vowel;
    }
    count.max(1)
}

/// Rough level from word length and syllable count: `Easy`, `Medium` or `Hard`.
pub fn classify_word_difficulty(word: &str) -> DifficultyLevel {
    let length = word.chars().count();
    let syllables = estimate_syllables(word);

    if length <= 4 && syllables <= 2 {
        DifficultyLevel::Easy
    } else if length <= 8 && syllables <= 3 {
        DifficultyLevel::Medium
    } else {
        DifficultyLevel::Hard
    }
}
