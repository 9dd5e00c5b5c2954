use super::errors::BatchError;
use crate::options::{OptionSet, ParsedOptions};

/// Registers the submitter's options. Parsing stops at the executable name.
pub fn submit_option_set() -> OptionSet {
    let mut set = OptionSet::new("simbatch submit").stop_at_first_positional();
    set.add_str_option("runName", "foo", "Run name");
    set.add_int_option("runTime", 900, "Requested run time (sec)");
    set.add_int_option("nCopies", 1, "Number of batch jobs");
    set.add_int_option("memoryLimit", 16, "Memory limit in GB");
    set.add_str_option("cpuType", "x86", "Allowed CPU type");
    set.add_int_option("ulimit_f", 10000, "Log size limit");
    set.add_str_option(
        "cleanupScriptFile",
        "",
        "Module name in which to find the cleanup function",
    );
    set.add_str_option(
        "cleanupScriptFunction",
        "",
        "Function inside cleanupScriptFile to execute",
    );
    set.add_str_option("configName", "current", "Name of the config for launched jobs to use");
    set.add_str_option(
        "parameters",
        "",
        "toml/yaml/json file with one parameter table per copy",
    );
    set.add_bool_option("dryRun", false, "Write the job scripts without submitting them");
    set
}

#[derive(Debug, Clone)]
pub struct SubmitOptions {
    pub run_name: String,
    /// Requested run time in seconds.
    pub run_time: u64,
    pub n_copies: u32,
    pub memory_limit_gb: u32,
    pub cpu_type: String,
    pub ulimit_f: u64,
    pub cleanup_script_file: String,
    pub cleanup_script_function: String,
    pub config_name: String,
    pub parameters: Option<String>,
    pub dry_run: bool,
    pub executable: String,
    pub executable_args: Vec<String>,
    /// Every parsed submitter option, embedded in the batch variables.
    pub parsed: ParsedOptions,
}

fn positive<T: TryFrom<i64>>(name: &str, value: i64) -> Result<T, BatchError> {
    if value <= 0 {
        return Err(BatchError::InvalidParameter(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }
    T::try_from(value)
        .map_err(|_| BatchError::InvalidParameter(format!("{} out of range: {}", name, value)))
}

/// Values rendered into `#SBATCH` lines must stay on that line as one word.
fn directive_value(name: &str, value: &str) -> Result<String, BatchError> {
    if value.is_empty() || value.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(BatchError::InvalidParameter(format!(
            "{} {:?} must be a single non-empty word",
            name, value
        )));
    }
    Ok(value.to_string())
}

impl SubmitOptions {
    pub fn from_parsed(parsed: ParsedOptions, remaining: Vec<String>) -> Result<Self, BatchError> {
        let mut remaining = remaining.into_iter();
        let executable = remaining.next().ok_or(BatchError::MissingExecutable)?;
        if executable.starts_with('-') {
            return Err(BatchError::UnexpectedOption(executable));
        }

        let run_name = directive_value("runName", parsed.get_str("runName")?)?;
        if run_name.contains('/') || run_name == "." || run_name == ".." {
            return Err(BatchError::InvalidParameter(format!(
                "run name '{}' must name a single directory",
                run_name
            )));
        }

        let parameters = match parsed.get_str("parameters")? {
            "" => None,
            path => Some(path.to_string()),
        };

        Ok(Self {
            run_name,
            run_time: positive("runTime", parsed.get_int("runTime")?)?,
            n_copies: positive("nCopies", parsed.get_int("nCopies")?)?,
            memory_limit_gb: positive("memoryLimit", parsed.get_int("memoryLimit")?)?,
            cpu_type: directive_value("cpuType", parsed.get_str("cpuType")?)?,
            ulimit_f: positive("ulimit_f", parsed.get_int("ulimit_f")?)?,
            cleanup_script_file: parsed.get_str("cleanupScriptFile")?.to_string(),
            cleanup_script_function: parsed.get_str("cleanupScriptFunction")?.to_string(),
            config_name: parsed.get_str("configName")?.to_string(),
            parameters,
            dry_run: parsed.get_bool("dryRun")?,
            executable,
            executable_args: remaining.collect(),
            parsed,
        })
    }

    /// Target arguments with `--runName=<run>` appended unless already given.
    pub fn script_options(&self) -> Vec<String> {
        let has_run_name = self
            .executable_args
            .iter()
            .any(|arg| arg.split('=').next() == Some("--runName"));

        let mut args = self.executable_args.clone();
        if !has_run_name {
            args.push(format!("--runName={}", self.run_name));
        }
        args
    }

    pub fn has_cleanup(&self) -> bool {
        !self.cleanup_script_file.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<SubmitOptions, BatchError> {
        let (parsed, remaining) = submit_option_set().update_options(args.iter().copied())?;
        SubmitOptions::from_parsed(parsed, remaining)
    }

    #[test]
    fn defaults_and_executable_split() {
        let opts = parse(&["mred", "--init", "beam.py", "--nIons", "5"]).unwrap();
        assert_eq!(opts.run_name, "foo");
        assert_eq!(opts.run_time, 900);
        assert_eq!(opts.n_copies, 1);
        assert_eq!(opts.memory_limit_gb, 16);
        assert_eq!(opts.config_name, "current");
        assert_eq!(opts.executable, "mred");
        assert_eq!(opts.executable_args, vec!["--init", "beam.py", "--nIons", "5"]);
        assert!(!opts.has_cleanup());
    }

    #[test]
    fn run_name_is_appended_once() {
        let opts = parse(&["--runName", "alpha", "mred", "beam.py"]).unwrap();
        assert_eq!(opts.script_options(), vec!["beam.py", "--runName=alpha"]);

        let opts = parse(&["--runName", "alpha", "mred", "--runName=beta"]).unwrap();
        assert_eq!(opts.script_options(), vec!["--runName=beta"]);
    }

    #[test]
    fn missing_executable_and_stray_flags_fail() {
        assert!(matches!(parse(&["--nCopies", "3"]), Err(BatchError::MissingExecutable)));
        assert!(matches!(
            parse(&["--bogus", "mred"]),
            Err(BatchError::UnexpectedOption(_))
        ));
    }

    #[test]
    fn non_positive_values_are_rejected() {
        assert!(matches!(
            parse(&["--nCopies", "0", "mred"]),
            Err(BatchError::InvalidParameter(_))
        ));
        assert!(matches!(
            parse(&["--runTime", "-60", "mred"]),
            Err(BatchError::InvalidParameter(_))
        ));
    }

    #[test]
    fn header_values_must_be_single_words() {
        for args in [
            &["--cpuType", "x86\nrm -rf $HOME", "mred"][..],
            &["--cpuType", "x86 skylake", "mred"][..],
            &["--runName", "beam\n#SBATCH --time=1", "mred"][..],
            &["--runName=", "mred"][..],
        ] {
            assert!(
                matches!(parse(args), Err(BatchError::InvalidParameter(_))),
                "accepted {:?}",
                args
            );
        }
    }

    #[test]
    fn dot_run_names_are_rejected() {
        for name in [".", "..", "a/b"] {
            assert!(matches!(
                parse(&["--runName", name, "mred"]),
                Err(BatchError::InvalidParameter(_))
            ));
        }
        assert_eq!(parse(&["--runName", "..beam", "mred"]).unwrap().run_name, "..beam");
    }
}
