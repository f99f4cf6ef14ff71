use std::collections::HashMap;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sg_core::{Error, Result, SummarizationModel, SummaryParams, SummaryResult};

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "for", "from", "has",
    "have", "he", "her", "his", "i", "in", "is", "it", "its", "of", "on", "or", "she", "that",
    "the", "their", "them", "they", "this", "to", "was", "we", "were", "which", "while", "who",
    "will", "with", "you",
];

/// Offline summarizer that picks the most representative sentences.
///
/// Lengths are counted in words. Sentences are ranked by the frequency of the
/// content words they carry and taken best first until `min_length` words are
/// collected; they are then put back in source order and the result is cut at
/// `max_length` words. With `do_sample` the ranking is randomly perturbed, so
/// two calls on the same text can pick different sentences.
#[derive(Debug, Default)]
pub struct ExtractiveSummarizer {
    seed: Option<u64>,
}

impl ExtractiveSummarizer {
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Fix the sampling seed so sampled output is reproducible.
    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    fn select(&self, text: &str, params: &SummaryParams) -> Result<String> {
        let sentences = split_sentences(text);
        if sentences.is_empty() {
            return Err(Error::Inference("input contains no sentences".to_string()));
        }

        let frequencies = word_frequencies(&sentences);
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut ranked: Vec<(usize, f32)> = sentences
            .iter()
            .enumerate()
            .map(|(index, sentence)| {
                let mut score = sentence_score(sentence, &frequencies);
                if params.do_sample {
                    score *= rng.gen_range(0.75f32..1.25);
                }
                (index, score)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut picked = Vec::new();
        let mut words = 0usize;
        for (index, _) in ranked {
            if words >= params.min_length as usize && !picked.is_empty() {
                break;
            }
            words += sentences[index].split_whitespace().count();
            picked.push(index);
        }
        picked.sort_unstable();

        let summary: Vec<&str> = picked
            .iter()
            .flat_map(|&index| sentences[index].split_whitespace())
            .take(params.max_length as usize)
            .collect();
        Ok(summary.join(" "))
    }
}

#[async_trait]
impl SummarizationModel for ExtractiveSummarizer {
    fn name(&self) -> &str {
        "extractive"
    }

    async fn summarize(&self, text: &str, params: &SummaryParams) -> Result<Vec<SummaryResult>> {
        let summary_text = self.select(text, params)?;
        Ok(vec![SummaryResult { summary_text }])
    }
}

fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
            if at_boundary {
                let end = index + c.len_utf8();
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = end;
            }
        }
    }
    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences
}

fn content_words(sentence: &str) -> impl Iterator<Item = String> + '_ {
    sentence
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
}

fn word_frequencies(sentences: &[&str]) -> HashMap<String, f32> {
    let mut counts: HashMap<String, f32> = HashMap::new();
    for sentence in sentences {
        for word in content_words(sentence) {
            *counts.entry(word).or_insert(0.0) += 1.0;
        }
    }
    let max = counts.values().cloned().fold(1.0, f32::max);
    counts.values_mut().for_each(|count| *count /= max);
    counts
}

fn sentence_score(sentence: &str, frequencies: &HashMap<String, f32>) -> f32 {
    let words = sentence.split_whitespace().count().max(1) as f32;
    let total: f32 = content_words(sentence)
        .filter_map(|word| frequencies.get(&word).copied())
        .sum();
    total / words.sqrt()
}
