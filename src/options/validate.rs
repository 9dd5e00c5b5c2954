use std::fs;
use std::path::Path;

use tracing::warn;

use super::{OptionError, OptionValue, ParsedOptions};

/// Name of the option whose directory is created during parsing.
pub const SAVE_DIR: &str = "saveDir";

/// `<cwd>/outputData/`, the fallback location for run output.
pub fn default_save_dir() -> String {
    match std::env::current_dir() {
        Ok(cwd) => format!("{}/outputData/", cwd.display()),
        Err(_) => "outputData/".to_string(),
    }
}

pub(super) fn ensure_save_dir(parsed: &mut ParsedOptions) -> Result<(), OptionError> {
    let Some(OptionValue::Str(dir)) = parsed.get(SAVE_DIR) else {
        return Ok(());
    };

    let mut dir = dir.clone();
    if dir.is_empty() {
        dir = default_save_dir();
    }
    if !dir.ends_with('/') {
        dir.push('/');
    }

    if !Path::new(&dir).is_dir() {
        warn!(
            "Save directory given at startup is not a valid path, attempting to create path: {}",
            dir
        );
        if let Err(e) = fs::create_dir_all(&dir) {
            let fallback = default_save_dir();
            warn!(
                "failed to create save directory {} ({}), defaulting to {}",
                dir, e, fallback
            );
            fs::create_dir_all(&fallback).map_err(|e| {
                OptionError::SaveDirError(format!("failed to create {}: {}", fallback, e))
            })?;
            dir = fallback;
        }
    }

    parsed.set(SAVE_DIR, OptionValue::Str(dir));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::OptionSet;
    use super::*;

    #[test]
    fn save_dir_gets_trailing_separator_and_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("nested").join("run");
        let target_str = target.to_str().unwrap().to_string();

        let mut set = OptionSet::new("test");
        set.add_str_option(SAVE_DIR, "unused", "");
        let (parsed, _) = set
            .update_options(["--saveDir", target_str.as_str()])
            .unwrap();

        assert_eq!(parsed.get_str(SAVE_DIR).unwrap(), format!("{}/", target_str));
        assert!(target.is_dir());
    }

    #[test]
    fn uncreatable_dir_falls_back_to_output_data() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not_a_dir");
        fs::write(&blocker, "").unwrap();
        let target = blocker.join("run").display().to_string();

        let mut set = OptionSet::new("test");
        set.add_str_option(SAVE_DIR, "unused", "");
        let (parsed, _) = set.update_options(["--saveDir", target.as_str()]).unwrap();

        let fallback = default_save_dir();
        assert_eq!(parsed.get_str(SAVE_DIR).unwrap(), fallback);
        assert!(Path::new(&fallback).is_dir());
    }

    #[test]
    fn existing_dir_is_left_alone() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = format!("{}/", tmp.path().display());

        let mut set = OptionSet::new("test");
        set.add_str_option(SAVE_DIR, &dir, "");
        let (parsed, _) = set.update_options(Vec::<String>::new()).unwrap();
        assert_eq!(parsed.get_str(SAVE_DIR).unwrap(), dir);
    }

    #[test]
    fn sets_without_save_dir_are_untouched() {
        let mut set = OptionSet::new("test");
        set.add_str_option("runName", "foo", "");
        let (parsed, _) = set.update_options(Vec::<String>::new()).unwrap();
        assert!(!parsed.contains(SAVE_DIR));
    }
}
