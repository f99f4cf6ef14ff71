use async_trait::async_trait;
use sg_core::{Result, SentimentModel, SentimentResult};

pub const POSITIVE: &str = "POSITIVE";
pub const NEGATIVE: &str = "NEGATIVE";

const POSITIVE_WORDS: &[(&str, f32)] = &[
    ("amazing", 3.0), ("awesome", 3.0), ("beautiful", 2.5), ("best", 3.0),
    ("brilliant", 3.0), ("clear", 1.5), ("delight", 2.5), ("delightful", 2.5),
    ("easy", 1.5), ("enjoy", 2.0), ("enjoyed", 2.0), ("excellent", 3.0),
    ("fantastic", 3.0), ("fast", 1.0), ("fine", 1.0), ("fun", 2.0),
    ("glad", 2.0), ("good", 2.0), ("great", 3.0), ("happy", 2.5),
    ("helpful", 2.0), ("impressive", 2.5), ("like", 1.5), ("liked", 1.5),
    ("love", 3.0), ("loved", 3.0), ("lovely", 2.5), ("nice", 2.0),
    ("perfect", 3.0), ("pleasant", 2.0), ("recommend", 2.0), ("reliable", 2.0),
    ("satisfied", 2.0), ("smooth", 1.5), ("solid", 1.5), ("superb", 3.0),
    ("thank", 1.5), ("thanks", 1.5), ("useful", 2.0), ("well", 1.0),
    ("wonderful", 3.0), ("worth", 1.5),
];

const NEGATIVE_WORDS: &[(&str, f32)] = &[
    ("angry", 2.5), ("annoying", 2.5), ("awful", 3.0), ("bad", 2.5),
    ("boring", 2.0), ("broke", 2.0), ("broken", 2.5), ("bug", 1.5),
    ("buggy", 2.0), ("confusing", 2.0), ("crash", 2.0), ("crashes", 2.0),
    ("disappointed", 2.5), ("disappointing", 2.5), ("fail", 2.0), ("failed", 2.0),
    ("fails", 2.0), ("hate", 3.0), ("hated", 3.0), ("horrible", 3.0),
    ("poor", 2.0), ("problem", 1.5), ("refund", 1.5), ("sad", 2.0),
    ("slow", 1.5), ("terrible", 3.0), ("ugly", 2.0), ("unhappy", 2.5),
    ("useless", 2.5), ("waste", 2.5), ("worse", 2.5), ("worst", 3.0),
    ("wrong", 2.0),
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "without",
    "cannot", "dont", "doesnt", "didnt", "isnt", "wasnt", "arent", "wont", "cant",
];

const INTENSIFIERS: &[&str] = &[
    "very", "really", "extremely", "so", "super", "incredibly", "absolutely", "totally",
];

/// Tokens a negator keeps flipping.
const NEGATION_WINDOW: usize = 3;
/// Slope of the logistic that turns polarity into confidence.
const CONFIDENCE_SLOPE: f32 = 0.8;

/// Offline binary classifier over a fixed polarity lexicon.
#[derive(Debug, Default)]
pub struct LexiconSentimentModel;

impl LexiconSentimentModel {
    pub fn new() -> Self {
        Self
    }

    /// Net polarity of the text; positive values lean positive.
    pub fn polarity(&self, text: &str) -> f32 {
        let tokens = tokenize(text);
        let mut total = 0.0;
        let mut negated_for = 0usize;
        let mut boost = 1.0;

        for token in &tokens {
            if NEGATORS.contains(&token.as_str()) || is_contraction(token) {
                negated_for = NEGATION_WINDOW;
                continue;
            }
            if INTENSIFIERS.contains(&token.as_str()) {
                boost = 1.5;
                continue;
            }

            if let Some(weight) = lookup(token) {
                let weight = weight * boost;
                total += if negated_for > 0 { -weight } else { weight };
                boost = 1.0;
            }
            negated_for = negated_for.saturating_sub(1);
        }

        let exclamations = text.matches('!').count().min(3) as f32;
        total * (1.0 + 0.1 * exclamations)
    }
}

#[async_trait]
impl SentimentModel for LexiconSentimentModel {
    fn name(&self) -> &str {
        "lexicon"
    }

    async fn classify(&self, text: &str) -> Result<Vec<SentimentResult>> {
        let polarity = self.polarity(text);
        let positive = 1.0 / (1.0 + (-CONFIDENCE_SLOPE * polarity).exp());
        let (label, score, other, rest) = if positive >= 0.5 {
            (POSITIVE, positive, NEGATIVE, 1.0 - positive)
        } else {
            (NEGATIVE, 1.0 - positive, POSITIVE, positive)
        };
        Ok(vec![
            SentimentResult { label: label.to_string(), score },
            SentimentResult { label: other.to_string(), score: rest },
        ])
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || is_apostrophe(c)))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase().replace(is_apostrophe, ""))
        .collect()
}

fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}')
}

fn is_contraction(token: &str) -> bool {
    matches!(token, "shouldnt" | "wouldnt" | "couldnt" | "havent" | "hasnt" | "hadnt" | "werent" | "aint")
}

fn lookup(token: &str) -> Option<f32> {
    POSITIVE_WORDS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, weight)| *weight)
        .or_else(|| {
            NEGATIVE_WORDS
                .iter()
                .find(|(word, _)| *word == token)
                .map(|(_, weight)| -*weight)
        })
}
