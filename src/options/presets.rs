use chrono::Local;

use super::{OptionSet, SAVE_DIR, default_save_dir};

impl OptionSet {
    /// Registers the options every simulation run understands.
    pub fn add_simulation_defaults(&mut self) -> &mut Self {
        let run_name = Local::now().format("defaultRunName%Y%m%d.%H%M").to_string();

        self.add_str_option("particle", "neutron", "defines the particle beam species");
        self.add_str_option(
            "beamType",
            "directionalFlux",
            "particle beam flux option (directionalFlux, pointSource, isotropicFlux, ...)",
        );
        self.add_str_option("waferMat", "silicon", "material of the wafer");
        self.add_str_option("runName", &run_name, "defines the run name");
        self.add_str_option(
            SAVE_DIR,
            &default_save_dir(),
            "the directory path for saving output data from the run",
        );

        self.add_float_option("beamE", 1.0, "particle beam energy in MeV");
        self.add_float_option("beamTilt", 0.0, "particle beam tilt (polar angle, degrees)");
        self.add_float_option("beamRoll", 0.0, "particle beam roll (azimuthal angle, degrees)");
        self.add_float_option(
            "rangeCuts",
            1.0,
            "range cuts in um, minimum threshold for secondary production",
        );

        self.add_int_option("beamA", 1, "particle beam atomic mass");
        self.add_int_option("beamZ", 1, "particle beam atomic number");
        self.add_int_option("nIons", 100, "total number of particles to run");
        self.add_int_option("index", 0, "index offset used when numbering saved files");
        self.add_int_option("maxSteps", 20000, "maximum number of steps in a given event");
        self.add_int_option("sBias", 500, "hadronic cross section biasing factor");
        self.add_int_option("nSaves", 10, "number of incremental progress saves");

        self.add_bool_option(
            "retainAll",
            false,
            "keep all of the files generated as incremental saves",
        );
        self.add_bool_option("dx", false, "use the OpenDx view for event-by-event viewing");
        self.add_bool_option("-f", false, "include copies of the scripts in output files");
        self.add_bool_option("suv", false, "use the OpenGL viewer");
        self
    }

    /// Registers the generic scheduler job options.
    pub fn add_scheduler_defaults(&mut self) -> &mut Self {
        self.add_str_option("name", "slurmJobName", "scheduler job name");
        self.add_str_option("errorFile", "", "scheduler error file");
        self.add_str_option("logFile", "", "scheduler log file");
        self.add_int_option("nodes", 1, "number of nodes");
        self.add_int_option("memoryLimit", 1, "memory limit in GB");
        self.add_int_option("runTime", 1, "requested run time");
        self.add_int_option("tasks", 1, "number of tasks");
        self
    }
}
