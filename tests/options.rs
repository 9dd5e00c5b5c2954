use simbatch::options::{OptionKind, OptionSet, OptionValue};

#[test]
fn re_registering_keeps_first_definition() {
    let mut set = OptionSet::new("test");
    assert!(set.add_int_option("nIons", 100, "number of primaries"));
    assert!(!set.add_str_option("nIons", "many", "redefined"));
    assert!(!set.add_option("--nIons", OptionValue::Float(1.5), "redefined again"));

    let spec = set.get("nIons").unwrap();
    assert_eq!(spec.kind(), OptionKind::Int);
    assert_eq!(spec.default_value(), &OptionValue::Int(100));
    assert_eq!(spec.help(), "number of primaries");

    let (parsed, _) = set.update_options(["--nIons", "250"]).unwrap();
    assert_eq!(parsed.get_int("nIons").unwrap(), 250);
}

#[test]
fn simulation_defaults_parse_alongside_unknown_arguments() {
    let tmp = tempfile::tempdir().unwrap();
    let save_dir = tmp.path().join("out").display().to_string();

    let mut set = OptionSet::new("sim");
    set.add_simulation_defaults();
    let (parsed, remaining) = set
        .update_options([
            "--particle",
            "proton",
            "--beamE=-2.5",
            "--saveDir",
            save_dir.as_str(),
            "--retainAll",
            "--unknown",
            "x",
            "beam.py",
        ])
        .unwrap();

    assert_eq!(parsed.get_str("particle").unwrap(), "proton");
    assert_eq!(parsed.get_float("beamE").unwrap(), -2.5);
    assert!(parsed.get_bool("retainAll").unwrap());
    assert_eq!(parsed.get_str("saveDir").unwrap(), format!("{}/", save_dir));
    assert!(tmp.path().join("out").is_dir());
    assert_eq!(remaining, vec!["--unknown", "x"]);
}
