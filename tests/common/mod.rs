#![allow(dead_code)]

use std::path::{Path, PathBuf};

use simbatch::merge::attributes::AttrValue;
use simbatch::merge::container::{ContainerFormat, JsonContainer, SimFile};
use simbatch::merge::histogram::Histogram;
use simbatch::settings::SchedulerSettings;

pub fn histogram(name: &str, nbins: usize, bins: &[f64]) -> Histogram {
    let mut h = Histogram::new(name, 0.1, 100.0, nbins, true);
    h.bins = bins.to_vec();
    h.entries = bins.iter().sum::<f64>() as u64;
    h
}

pub fn sim_file(count: i64, gfu: f64, histograms: Vec<Histogram>) -> SimFile {
    let mut file = SimFile::default();
    file.attributes
        .insert("particle".into(), AttrValue::Str("alpha".into()));
    file.attributes.insert("beamE".into(), AttrValue::Float(5.0));
    file.attributes.insert("nIons".into(), AttrValue::Int(count));
    file.attributes
        .insert("gunFluenceUnit".into(), AttrValue::Float(gfu));
    file.histograms = histograms;
    file
}

pub fn write_sim_file(dir: &Path, name: &str, file: &SimFile) -> PathBuf {
    let path = dir.join(name);
    JsonContainer.write(&path, file).expect("write sim file");
    path
}

pub fn read_sim_file(path: &Path) -> SimFile {
    JsonContainer.read(path).expect("read sim file")
}

pub fn scheduler_in(root: &Path) -> SchedulerSettings {
    SchedulerSettings {
        scratch_root: root.join("scratch").display().to_string(),
        ..SchedulerSettings::default()
    }
}

pub fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}
