//! CBOW word2vec with negative sampling
//!
//! A compact trainer for the tiny corpora found in a single dataset of job
//! titles. It follows the reference word2vec recipe: frequency-sorted
//! vocabulary, a unigram^0.75 noise distribution, a randomly shrunk context
//! window per position, and a learning rate that decays linearly over all
//! epochs. Training is single-threaded and seeded, so the same corpus and
//! config always give the same vectors.

use std::collections::HashMap;

use ndarray::{Array1, Array2, ArrayView1};
use tracing::debug;

use crate::config::Word2VecConfig;
use crate::{Error, Result};

const NOISE_POWER: f64 = 0.75;

/// A trained word-embedding model
#[derive(Debug, Clone)]
pub struct Word2Vec {
    vocab: HashMap<String, usize>,
    vectors: Array2<f32>,
}

impl Word2Vec {
    /// Train a model on tokenized sentences.
    ///
    /// Fails with [`Error::Training`] when no word reaches `min_count`.
    pub fn train<S: AsRef<str>>(sentences: &[Vec<S>], config: &Word2VecConfig) -> Result<Self> {
        config.validate()?;
        let words = Vocabulary::build(sentences, config.min_count);
        if words.is_empty() {
            return Err(Error::Training("corpus has no words to train on".to_string()));
        }

        let corpus: Vec<Vec<usize>> = sentences
            .iter()
            .map(|s| s.iter().filter_map(|w| words.index.get(w.as_ref()).copied()).collect())
            .collect();

        let mut trainer = Trainer::new(&words, config);
        trainer.run(&corpus);

        debug!(
            vocab = words.len(),
            dims = config.vector_size,
            epochs = config.epochs,
            "trained word2vec model"
        );

        Ok(Self {
            vocab: words.index,
            vectors: trainer.syn0,
        })
    }

    /// Vector of `word`, or `None` if it was never seen in training.
    pub fn vector(&self, word: &str) -> Option<ArrayView1<'_, f32>> {
        self.vocab.get(word).map(|&i| self.vectors.row(i))
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.vocab.contains_key(word)
    }

    /// Number of words in the vocabulary
    #[must_use]
    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.vectors.ncols()
    }

    /// Cosine similarity between the mean vectors of two token sets.
    ///
    /// Out-of-vocabulary tokens count as zero vectors. Returns 0.0 when
    /// either set is empty or has no known token.
    pub fn n_similarity<A: AsRef<str>, B: AsRef<str>>(&self, a: &[A], b: &[B]) -> f32 {
        match (self.mean_vector(a), self.mean_vector(b)) {
            (Some(u), Some(v)) => {
                let (Some(u), Some(v)) = (u.as_slice(), v.as_slice()) else {
                    return 0.0;
                };
                super::cosine_similarity(u, v)
            }
            _ => 0.0,
        }
    }

    fn mean_vector<S: AsRef<str>>(&self, tokens: &[S]) -> Option<Array1<f32>> {
        if tokens.is_empty() {
            return None;
        }
        let mut sum = Array1::<f32>::zeros(self.dimension());
        let mut known = 0usize;
        for token in tokens {
            if let Some(v) = self.vector(token.as_ref()) {
                sum += &v;
                known += 1;
            }
        }
        if known == 0 {
            return None;
        }
        sum /= tokens.len() as f32;
        Some(sum)
    }
}

/// Frequency-sorted vocabulary with its noise distribution
struct Vocabulary {
    index: HashMap<String, usize>,
    counts: Vec<u64>,
}

impl Vocabulary {
    fn build<S: AsRef<str>>(sentences: &[Vec<S>], min_count: usize) -> Self {
        let mut first_seen: Vec<String> = Vec::new();
        let mut raw: HashMap<&str, u64> = HashMap::new();
        for word in sentences.iter().flatten() {
            let word = word.as_ref();
            let count = raw.entry(word).or_insert(0);
            if *count == 0 {
                first_seen.push(word.to_string());
            }
            *count += 1;
        }

        // most frequent first; ties keep first-appearance order
        let mut words: Vec<(String, u64)> = first_seen
            .into_iter()
            .map(|w| {
                let c = raw[w.as_str()];
                (w, c)
            })
            .filter(|(_, c)| *c >= min_count as u64)
            .collect();
        words.sort_by(|a, b| b.1.cmp(&a.1));

        let counts = words.iter().map(|(_, c)| *c).collect();
        let index = words
            .into_iter()
            .enumerate()
            .map(|(i, (w, _))| (w, i))
            .collect();
        Self { index, counts }
    }

    fn len(&self) -> usize {
        self.counts.len()
    }

    fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Cumulative unigram^0.75 distribution, normalized to end at 1.0
    fn noise_cdf(&self) -> Vec<f64> {
        let weights: Vec<f64> = self
            .counts
            .iter()
            .map(|&c| (c as f64).powf(NOISE_POWER))
            .collect();
        let total: f64 = weights.iter().sum();
        let mut acc = 0.0;
        weights
            .iter()
            .map(|w| {
                acc += w / total;
                acc
            })
            .collect()
    }
}

/// Linear congruential generator used by the reference word2vec code
struct Lcg(u64);

impl Lcg {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(25_214_903_917).wrapping_add(11);
        self.0
    }

    /// Uniform in [0, 1)
    fn next_f64(&mut self) -> f64 {
        ((self.next_u64() >> 16) & 0xFFFF_FFFF) as f64 / 4_294_967_296.0
    }

    fn below(&mut self, n: usize) -> usize {
        ((self.next_u64() >> 16) % n as u64) as usize
    }
}

struct Trainer<'a> {
    config: &'a Word2VecConfig,
    syn0: Array2<f32>,
    syn1neg: Array2<f32>,
    noise_cdf: Vec<f64>,
    rng: Lcg,
}

impl<'a> Trainer<'a> {
    fn new(words: &Vocabulary, config: &'a Word2VecConfig) -> Self {
        let dims = config.vector_size;
        let mut rng = Lcg(config.seed);
        let syn0 = Array2::from_shape_simple_fn((words.len(), dims), || {
            ((rng.next_f64() - 0.5) / dims as f64) as f32
        });

        Self {
            config,
            syn0,
            syn1neg: Array2::zeros((words.len(), dims)),
            noise_cdf: words.noise_cdf(),
            rng,
        }
    }

    fn run(&mut self, corpus: &[Vec<usize>]) {
        let words_per_epoch: usize = corpus.iter().map(Vec::len).sum();
        let total = (words_per_epoch * self.config.epochs).max(1) as f32;
        let mut processed = 0usize;

        for _ in 0..self.config.epochs {
            for sentence in corpus {
                for pos in 0..sentence.len() {
                    let progress = processed as f32 / total;
                    let alpha = (self.config.alpha
                        - (self.config.alpha - self.config.min_alpha) * progress)
                        .max(self.config.min_alpha);
                    self.train_position(sentence, pos, alpha);
                    processed += 1;
                }
            }
        }
    }

    fn train_position(&mut self, sentence: &[usize], pos: usize, alpha: f32) {
        let window = self.config.window;
        let shrink = self.rng.below(window);
        let reach = window - shrink;
        let start = pos.saturating_sub(reach);
        let end = (pos + reach + 1).min(sentence.len());

        let context: Vec<usize> = (start..end)
            .filter(|&i| i != pos)
            .map(|i| sentence[i])
            .collect();
        if context.is_empty() {
            return;
        }

        let mut hidden = Array1::<f32>::zeros(self.config.vector_size);
        for &c in &context {
            hidden += &self.syn0.row(c);
        }
        hidden /= context.len() as f32;

        let target = sentence[pos];
        let mut error = Array1::<f32>::zeros(self.config.vector_size);
        for d in 0..=self.config.negative {
            let (word, label) = if d == 0 {
                (target, 1.0)
            } else {
                let noise = self.sample_noise();
                if noise == target {
                    continue;
                }
                (noise, 0.0)
            };

            let f = hidden.dot(&self.syn1neg.row(word));
            let g = (label - sigmoid(f)) * alpha;
            error.scaled_add(g, &self.syn1neg.row(word));
            self.syn1neg.row_mut(word).scaled_add(g, &hidden);
        }

        for &c in &context {
            self.syn0.row_mut(c).scaled_add(1.0, &error);
        }
    }

    fn sample_noise(&mut self) -> usize {
        let r = self.rng.next_f64();
        let idx = self.noise_cdf.partition_point(|&p| p <= r);
        idx.min(self.noise_cdf.len() - 1)
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
