use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::errors::MergeError;

/// A named, binned accumulator with fixed bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub name: String,
    pub low: f64,
    pub high: f64,
    pub nbins: usize,
    #[serde(default)]
    pub log_spaced: bool,
    pub bins: Vec<f64>,
    #[serde(default)]
    pub entries: u64,
}

/// Identity of a histogram: two records merge only if every field matches exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistogramKey {
    pub name: String,
    low_bits: u64,
    high_bits: u64,
    pub nbins: usize,
}

impl HistogramKey {
    pub fn low(&self) -> f64 {
        f64::from_bits(self.low_bits)
    }

    pub fn high(&self) -> f64 {
        f64::from_bits(self.high_bits)
    }
}

impl fmt::Display for HistogramKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}, {:?}) x {}", self.low(), self.high(), self.nbins)
    }
}

impl Histogram {
    pub fn new(name: &str, low: f64, high: f64, nbins: usize, log_spaced: bool) -> Self {
        Self {
            name: name.to_string(),
            low,
            high,
            nbins,
            log_spaced,
            bins: vec![0.0; nbins],
            entries: 0,
        }
    }

    pub fn key(&self) -> HistogramKey {
        HistogramKey {
            name: self.name.clone(),
            low_bits: self.low.to_bits(),
            high_bits: self.high.to_bits(),
            nbins: self.nbins,
        }
    }

    pub fn validate(&self) -> Result<(), MergeError> {
        if self.bins.len() != self.nbins {
            return Err(MergeError::InvalidHistogram {
                name: self.name.clone(),
                reason: format!("{} bins stored, {} declared", self.bins.len(), self.nbins),
            });
        }
        if !(self.low < self.high) {
            return Err(MergeError::InvalidHistogram {
                name: self.name.clone(),
                reason: format!("lower bound {} is not below upper bound {}", self.low, self.high),
            });
        }
        Ok(())
    }

    /// Adds `other` bin by bin. Fails unless both share the same key.
    pub fn merge(&mut self, other: &Histogram) -> Result<(), MergeError> {
        let (mine, theirs) = (self.key(), other.key());
        if mine != theirs {
            return Err(MergeError::IncompatibleHistogram {
                name: other.name.clone(),
                expected: mine.to_string(),
                found: theirs.to_string(),
            });
        }
        other.validate()?;

        for (acc, value) in self.bins.iter_mut().zip(&other.bins) {
            *acc += value;
        }
        self.entries += other.entries;
        Ok(())
    }

    pub fn total(&self) -> f64 {
        self.bins.iter().sum()
    }
}

/// Working set of histograms accumulated across files, in first-seen order.
#[derive(Debug, Default)]
pub struct HistogramSet {
    histograms: IndexMap<HistogramKey, Histogram>,
    keys_by_name: HashMap<String, HistogramKey>,
}

impl HistogramSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.histograms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histograms.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Histogram> {
        self.keys_by_name
            .get(name)
            .and_then(|key| self.histograms.get(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Histogram> {
        self.histograms.values()
    }

    pub fn into_vec(self) -> Vec<Histogram> {
        self.histograms.into_values().collect()
    }

    /// Checks one file's histograms against the working set without changing it.
    pub fn check(&self, incoming: &[Histogram]) -> Result<(), MergeError> {
        let mut seen: HashMap<&str, HistogramKey> = HashMap::new();
        for hist in incoming {
            hist.validate()?;
            let key = hist.key();
            let expected = self
                .keys_by_name
                .get(&hist.name)
                .or_else(|| seen.get(hist.name.as_str()));
            if let Some(expected) = expected {
                if *expected != key {
                    return Err(MergeError::IncompatibleHistogram {
                        name: hist.name.clone(),
                        expected: expected.to_string(),
                        found: key.to_string(),
                    });
                }
            }
            seen.insert(&hist.name, key);
        }
        Ok(())
    }

    /// Adds one file's histograms. Either all of them are taken or none are.
    pub fn accumulate(&mut self, incoming: &[Histogram]) -> Result<(), MergeError> {
        self.check(incoming)?;
        for hist in incoming {
            let key = hist.key();
            match self.histograms.get_mut(&key) {
                Some(existing) => existing.merge(hist)?,
                None => {
                    self.keys_by_name.insert(hist.name.clone(), key.clone());
                    self.histograms.insert(key, hist.clone());
                }
            }
        }
        Ok(())
    }
}
