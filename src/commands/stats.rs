use std::path::PathBuf;
use std::time::Duration;

use crate::merge::attributes::AttrValue;
use crate::merge::histogram::Histogram;

#[derive(Debug, Clone)]
pub struct HistogramStat {
    pub name: String,
    pub low: f64,
    pub high: f64,
    pub nbins: usize,
    pub log_spaced: bool,
    pub entries: u64,
    pub total: f64,
}

impl From<&Histogram> for HistogramStat {
    fn from(h: &Histogram) -> Self {
        Self {
            name: h.name.clone(),
            low: h.low,
            high: h.high,
            nbins: h.nbins,
            log_spaced: h.log_spaced,
            entries: h.entries,
            total: h.total(),
        }
    }
}

#[derive(Debug)]
pub struct MergeStats {
    pub files_merged: Vec<PathBuf>,
    pub files_skipped: Vec<PathBuf>,
    pub histograms: Vec<HistogramStat>,
    pub count_attribute: String,
    pub total_count: AttrValue,
    pub output: PathBuf,
    pub total_duration: Duration,
}

impl MergeStats {
    pub fn total_entries(&self) -> u64 {
        self.histograms.iter().map(|h| h.entries).sum()
    }
}
