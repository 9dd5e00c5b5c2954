use std::fs;

use simbatch::commands::{self, merge_files};
use simbatch::merge::args::MergeOptions;
use simbatch::merge::attributes::AttrValue;
use simbatch::merge::container::JsonContainer;
use simbatch::merge::errors::MergeError;
use simbatch::settings::MergeSettings;

#[path = "common/mod.rs"]
mod common;

#[test]
fn merges_runs_into_prefix_total() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("raw");
    fs::create_dir_all(&input).unwrap();

    common::write_sim_file(
        &input,
        "run_0001.hdf5",
        &common::sim_file(
            1000,
            2.5,
            vec![
                common::histogram("edep", 3, &[1.0, 2.0, 3.0]),
                common::histogram("let", 2, &[5.0, 0.0]),
            ],
        ),
    );
    common::write_sim_file(
        &input,
        "run_0002.hdf5",
        &common::sim_file(
            1500,
            2.5,
            vec![common::histogram("edep", 3, &[10.0, 20.0, 30.0])],
        ),
    );

    let out = tmp.path().join("combined");
    let options = MergeOptions::new(vec![format!("{}/*.hdf5", input.display())], &out);
    let stats = merge_files(&options, &JsonContainer).expect("merge should succeed");

    assert_eq!(stats.output, out.join("runTOTAL.hdf5"));
    assert_eq!(stats.files_merged.len(), 2);
    assert!(stats.files_skipped.is_empty());
    assert_eq!(stats.total_count, AttrValue::Int(2500));
    assert_eq!(stats.histograms.len(), 2);
    assert_eq!(stats.total_entries(), 6 + 60 + 5);

    let merged = common::read_sim_file(&stats.output);
    assert_eq!(merged.attributes["nIons"], AttrValue::Int(2500));
    assert_eq!(merged.attributes["particle"], AttrValue::Str("alpha".into()));
    assert_eq!(merged.attributes["gunFluenceUnit"], AttrValue::Float(2.5));
    assert_eq!(merged.histograms[0].name, "edep");
    assert_eq!(merged.histograms[0].bins, vec![11.0, 22.0, 33.0]);
    assert_eq!(merged.histograms[1].name, "let");
    assert_eq!(merged.histograms[1].bins, vec![5.0, 0.0]);
}

#[test]
fn mixed_prefixes_fall_back_to_default_name() {
    let tmp = tempfile::tempdir().unwrap();
    let a = common::write_sim_file(
        tmp.path(),
        "alpha_1.hdf5",
        &common::sim_file(1, 1.0, vec![common::histogram("edep", 1, &[1.0])]),
    );
    let b = common::write_sim_file(
        tmp.path(),
        "beta_1.hdf5",
        &common::sim_file(2, 1.0, vec![common::histogram("edep", 1, &[1.0])]),
    );

    let out = tmp.path().join("out");
    let options = MergeOptions::new(
        vec![a.display().to_string(), b.display().to_string()],
        &out,
    );
    let stats = merge_files(&options, &JsonContainer).unwrap();
    assert_eq!(stats.output, out.join("defaultSaveName.hdf5"));
    assert_eq!(stats.total_count, AttrValue::Int(3));
}

#[test]
fn explicit_save_name_wins() {
    let tmp = tempfile::tempdir().unwrap();
    let a = common::write_sim_file(
        tmp.path(),
        "run_1.hdf5",
        &common::sim_file(7, 1.0, vec![common::histogram("edep", 1, &[1.0])]),
    );

    let mut options = MergeOptions::new(vec![a.display().to_string()], tmp.path().join("o"));
    options.save_name = Some("custom".to_string());
    let stats = merge_files(&options, &JsonContainer).unwrap();
    assert!(stats.output.ends_with("o/custom.hdf5"));
    assert!(stats.output.is_file());
}

#[test]
fn consistency_mismatch_aborts_without_output() {
    let tmp = tempfile::tempdir().unwrap();
    for (name, gfu) in [("run_1.hdf5", 1.0), ("run_2.hdf5", 2.0)] {
        common::write_sim_file(
            tmp.path(),
            name,
            &common::sim_file(1, gfu, vec![common::histogram("edep", 1, &[1.0])]),
        );
    }

    let out = tmp.path().join("out");
    let pattern = format!("{}/run_*.hdf5", tmp.path().display());
    let options = MergeOptions::new(vec![pattern.clone()], &out);
    let err = merge_files(&options, &JsonContainer).unwrap_err();
    assert!(err.to_string().contains("gunFluenceUnit"));
    assert!(!out.join("runTOTAL.hdf5").exists());

    let mut options = MergeOptions::new(vec![pattern], &out);
    options.check_consistency = false;
    let stats = merge_files(&options, &JsonContainer).unwrap();
    assert_eq!(stats.total_count, AttrValue::Int(2));
}

#[test]
fn incompatible_file_is_skipped_when_requested() {
    let tmp = tempfile::tempdir().unwrap();
    common::write_sim_file(
        tmp.path(),
        "run_1.hdf5",
        &common::sim_file(10, 1.0, vec![common::histogram("edep", 2, &[1.0, 1.0])]),
    );
    common::write_sim_file(
        tmp.path(),
        "run_2.hdf5",
        &common::sim_file(20, 1.0, vec![common::histogram("edep", 4, &[1.0; 4])]),
    );

    let pattern = format!("{}/run_*.hdf5", tmp.path().display());
    let mut options = MergeOptions::new(vec![pattern], tmp.path().join("out"));
    assert!(merge_files(&options, &JsonContainer).is_err());

    options.skip_incompatible = true;
    let stats = merge_files(&options, &JsonContainer).unwrap();
    assert_eq!(stats.files_merged.len(), 1);
    assert_eq!(stats.files_skipped.len(), 1);
    assert!(stats.files_skipped[0].ends_with("run_2.hdf5"));
    assert_eq!(stats.total_count, AttrValue::Int(10));
}

#[test]
fn no_matching_files_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let options = MergeOptions::new(
        vec![format!("{}/*.hdf5", tmp.path().display())],
        tmp.path().join("out"),
    );
    let err = merge_files(&options, &JsonContainer).unwrap_err();
    assert!(matches!(
        err,
        simbatch::error::SimError::Merge(MergeError::NoInputFiles(_))
    ));
}

#[test]
fn command_line_merge() {
    let tmp = tempfile::tempdir().unwrap();
    for (name, count) in [("beam_01.hdf5", 3), ("beam_02.hdf5", 4)] {
        common::write_sim_file(
            tmp.path(),
            name,
            &common::sim_file(count, 1.0, vec![common::histogram("edep", 1, &[2.0])]),
        );
    }
    let save_dir = tmp.path().join("totals");

    let args = common::strings(&[
        "--files",
        &format!("{}/beam_*.hdf5", tmp.path().display()),
        "--saveDir",
        &save_dir.display().to_string(),
        "--init",
    ]);
    let stats = commands::run_merge(&args, &MergeSettings::default()).unwrap();

    assert_eq!(stats.output, save_dir.join("beamTOTAL.hdf5"));
    assert_eq!(stats.total_count, AttrValue::Int(7));
    assert_eq!(common::read_sim_file(&stats.output).histograms[0].bins, vec![4.0]);
}
