//! Lexicon sentiment scorer with intensifier and negation handling.
//!
//! For every positive/negative token we walk backwards over the run of modifiers
//! directly in front of it: each intensifier adds 1.0 to the magnitude and each
//! negation bumps a counter. The walk stops at the first token that is neither.
//! A match contributes `polarity * (1 + intensifiers)`, multiplied by `(-0.5)^n`
//! when `n > 0` negations were seen, so "not not good" stays positive but damped.

use ahash::RandomState;
use anyhow::{bail, Result};
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::OnceLock;

type WordSet = HashSet<String, RandomState>;

/// Names of the four word lists that make up a lexicon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SetName {
    Positive,
    Negative,
    Intensifier,
    Negation,
}

impl FromStr for SetName {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(SetName::Positive),
            "negative" => Ok(SetName::Negative),
            "intensifier" | "intensifiers" => Ok(SetName::Intensifier),
            "negation" | "negations" => Ok(SetName::Negation),
            other => bail!("unknown sentiment word set: {other:?}"),
        }
    }
}

const POSITIVE: &[&str] = &[
    "good", "great", "excellent", "awesome", "amazing", "love", "loved", "lovely", "happy",
    "brilliant", "fantastic", "wonderful", "superb", "nice", "best", "better", "enjoy",
    "enjoyed", "impressive", "perfect", "positive", "recommend", "success", "successful",
    "favorite", "beautiful", "elegant", "fast", "reliable", "stable", "useful", "helpful",
    "exciting", "innovative", "powerful", "delightful", "pleased", "glad", "win", "winning",
];

const NEGATIVE: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "hate", "hated", "poor", "worst", "worse",
    "broken", "buggy", "crash", "crashes", "slow", "ugly", "annoying", "disappointing",
    "disappointed", "useless", "failure", "failed", "fail", "negative", "sad", "angry",
    "boring", "confusing", "painful", "unstable", "unreliable", "wrong", "problem",
    "problems", "mess", "lose", "losing", "insecure", "expensive", "bloated", "frustrating",
];

const INTENSIFIERS: &[&str] = &[
    "very", "really", "extremely", "incredibly", "super", "so", "too", "totally",
    "absolutely", "highly", "truly", "especially", "remarkably", "seriously", "hugely",
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "without",
    "isn't", "wasn't", "aren't", "weren't", "don't", "doesn't", "didn't", "can't",
    "cannot", "won't", "wouldn't", "shouldn't", "couldn't", "hardly", "barely",
];

/// Immutable word lists. Build once and share across threads.
#[derive(Clone, Debug, Default)]
pub struct Lexicon {
    positive: WordSet,
    negative: WordSet,
    intensifiers: WordSet,
    negations: WordSet,
}

fn to_set<I, S>(words: I) -> WordSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words.into_iter().map(|w| w.as_ref().trim().to_lowercase()).collect()
}

impl Lexicon {
    pub fn from_sets<P, N, I, G, S>(positive: P, negative: N, intensifiers: I, negations: G) -> Self
    where
        P: IntoIterator<Item = S>,
        N: IntoIterator<Item = S>,
        I: IntoIterator<Item = S>,
        G: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            positive: to_set(positive),
            negative: to_set(negative),
            intensifiers: to_set(intensifiers),
            negations: to_set(negations),
        }
    }

    /// The built-in English lexicon, initialised on first use.
    pub fn builtin() -> &'static Lexicon {
        static LEXICON: OnceLock<Lexicon> = OnceLock::new();
        LEXICON.get_or_init(|| Lexicon::from_sets(POSITIVE, NEGATIVE, INTENSIFIERS, NEGATIONS))
    }

    fn set(&self, name: SetName) -> &WordSet {
        match name {
            SetName::Positive => &self.positive,
            SetName::Negative => &self.negative,
            SetName::Intensifier => &self.intensifiers,
            SetName::Negation => &self.negations,
        }
    }

    /// Membership test by set name; an unknown name is an error.
    pub fn contains(&self, set_name: &str, word: &str) -> Result<bool> {
        let name: SetName = set_name.parse()?;
        Ok(self.set(name).contains(word))
    }

    fn polarity(&self, word: &str) -> Option<f64> {
        if self.positive.contains(word) {
            Some(1.0)
        } else if self.negative.contains(word) {
            Some(-1.0)
        } else {
            None
        }
    }

    /// Signed score of a token sequence; 0.0 when nothing matches.
    pub fn score<S: AsRef<str>>(&self, tokens: &[S]) -> f64 {
        let mut total = 0.0;
        for (i, tok) in tokens.iter().enumerate() {
            let Some(polarity) = self.polarity(tok.as_ref()) else { continue };

            let mut magnitude = 1.0;
            let mut negations = 0i32;
            for prev in tokens[..i].iter().rev() {
                let prev = prev.as_ref();
                if self.intensifiers.contains(prev) {
                    magnitude += 1.0;
                } else if self.negations.contains(prev) {
                    negations += 1;
                } else {
                    break;
                }
            }

            let mut contribution = polarity * magnitude;
            if negations > 0 {
                contribution *= (-0.5f64).powi(negations);
            }
            total += contribution;
        }
        total
    }
}

/// Score with the built-in lexicon.
pub fn score_tokens<S: AsRef<str>>(tokens: &[S]) -> f64 {
    Lexicon::builtin().score(tokens)
}
