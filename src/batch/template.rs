use indexmap::IndexMap;
use serde::Serialize;

use super::args::SubmitOptions;
use super::errors::BatchError;
use super::script::{ScriptBuilder, Word};
use crate::options::ParsedOptions;
use crate::settings::SchedulerSettings;

/// Minutes added on top of the requested run time so CPU lag does not kill jobs.
pub const WALL_TIME_MARGIN_MIN: u64 = 4;

/// Wall time of the final summarization job.
pub const FINAL_JOB_TIME: &str = "15:00";

pub fn run_time_minutes(run_time_s: u64) -> u64 {
    run_time_s.div_ceil(60)
}

/// Scheduler wall time in minutes: `ceil(run_time / 60) + 4`.
pub fn wall_time_minutes(run_time_s: u64) -> u64 {
    run_time_minutes(run_time_s) + WALL_TIME_MARGIN_MIN
}

/// Snapshot of everything known at submission time, handed to the executable
/// as `--batch-variables`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchVariables<'a> {
    pub run_name: &'a str,
    pub run_time: u64,
    pub wall_time: u64,
    pub n_copies: u32,
    pub memory_limit_gb: u32,
    pub cpu_type: &'a str,
    pub ulimit_f: u64,
    pub config_name: &'a str,
    pub isotime: &'a str,
    pub script_name: &'a str,
    pub script_options: &'a [String],
    pub summarize_module: &'a str,
    pub summarize_function: &'a str,
    pub submit_options: &'a ParsedOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<&'a IndexMap<String, serde_json::Value>>,
}

/// Everything shared by the scripts of one submission.
pub struct JobTemplate<'a> {
    pub options: &'a SubmitOptions,
    pub scheduler: &'a SchedulerSettings,
    pub isotime: String,
    pub script_options: Vec<String>,
}

impl<'a> JobTemplate<'a> {
    pub fn new(options: &'a SubmitOptions, scheduler: &'a SchedulerSettings, isotime: &str) -> Self {
        Self {
            options,
            scheduler,
            isotime: isotime.to_string(),
            script_options: options.script_options(),
        }
    }

    pub fn variables<'s>(
        &'s self,
        index: Option<u32>,
        parameters: Option<&'s IndexMap<String, serde_json::Value>>,
    ) -> BatchVariables<'s> {
        let opts = self.options;
        BatchVariables {
            run_name: &opts.run_name,
            run_time: run_time_minutes(opts.run_time),
            wall_time: wall_time_minutes(opts.run_time),
            n_copies: opts.n_copies,
            memory_limit_gb: opts.memory_limit_gb,
            cpu_type: &opts.cpu_type,
            ulimit_f: opts.ulimit_f,
            config_name: &opts.config_name,
            isotime: &self.isotime,
            script_name: &opts.executable,
            script_options: &self.script_options,
            summarize_module: &opts.cleanup_script_file,
            summarize_function: &opts.cleanup_script_function,
            submit_options: &opts.parsed,
            index,
            parameters,
        }
    }

    pub fn log_dir(&self) -> String {
        format!("{}/{}", self.scheduler.log_root, self.options.run_name)
    }

    pub fn scratch_dir(&self, index: u32) -> String {
        format!(
            "{}/sim_{}{:03}",
            self.scheduler.scratch_root.trim_end_matches('/'),
            self.options.run_name,
            index
        )
    }

    fn config_loader(&self) -> String {
        format!(
            "{}/{}",
            self.scheduler.config_root.trim_end_matches('/'),
            self.options.config_name
        )
    }

    /// Renders the script for copy `index`.
    pub fn render_job_script(
        &self,
        index: u32,
        parameters: Option<&IndexMap<String, serde_json::Value>>,
    ) -> Result<String, BatchError> {
        let opts = self.options;
        let variables = serde_json::to_string(&self.variables(Some(index), parameters))
            .map_err(|e| BatchError::SerializeError(e.to_string()))?;
        let log = format!(
            "{}/output.{}.{:03}.txt",
            self.log_dir(),
            self.isotime,
            index
        );

        let mut invocation = vec![
            Word::from(&opts.executable),
            Word::flag("--batch-variables", variables),
        ];
        invocation.extend(self.script_options.iter().map(Word::from));

        let script = ScriptBuilder::new()
            .directive("job-name", format!("{}.{:03}", opts.run_name, index))
            .directive("mem", format!("{}G", opts.memory_limit_gb))
            .directive("nodes", 1)
            .directive("constraint", &opts.cpu_type)
            .directive("time", wall_time_minutes(opts.run_time))
            .blank()
            .comment("node-local scratch space, removed on exit or cancellation")
            .assign("localdir", &self.scratch_dir(index))
            .raw("tmp_cleaner()\n{\n    rm -rf \"${localdir}\"\n    exit 1\n}")
            .raw("trap 'tmp_cleaner' TERM")
            .command([Word::from("mkdir"), Word::from("-p"), Word::var("localdir")])
            .raw("export SIM_SCRATCH_DIR=\"${localdir}\"")
            .raw("echo \"scratch directory: ${localdir}\"")
            .blank()
            .eval_output([self.config_loader(), "bash".to_string()])
            .command(["env"])
            .command(["ulimit".to_string(), "-f".to_string(), opts.ulimit_f.to_string()])
            .blank()
            .command_logged(invocation, &log)
            .blank()
            .raw("echo \"removing scratch directory: ${localdir}\"")
            .command([Word::from("rm"), Word::from("-rf"), Word::var("localdir")])
            .build();

        Ok(script)
    }

    /// Renders the summarization job, if a cleanup module is configured.
    pub fn render_final_script(&self) -> Result<Option<String>, BatchError> {
        let opts = self.options;
        if !opts.has_cleanup() {
            return Ok(None);
        }

        let variables = serde_json::to_string(&self.variables(None, None))
            .map_err(|e| BatchError::SerializeError(e.to_string()))?;
        let log = format!("{}/output.{}.END.txt", self.log_dir(), self.isotime);

        let script = ScriptBuilder::new()
            .directive("job-name", format!("{}.END", opts.run_name))
            .directive("nodes", 1)
            .directive("time", FINAL_JOB_TIME)
            .blank()
            .eval_output([self.config_loader(), "bash".to_string()])
            .command_logged(
                [
                    Word::from(&self.scheduler.summarize_program),
                    Word::from("general_summarize"),
                    Word::flag("--module", opts.cleanup_script_file.clone()),
                    Word::flag("--function", opts.cleanup_script_function.clone()),
                    Word::flag("--batch-variables", variables),
                ],
                &log,
            )
            .build();

        Ok(Some(script))
    }
}
