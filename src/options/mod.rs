//! Registry of typed command-line options shared by the submitter and the merger.
//!
//! Options are registered by name on an [`OptionSet`] and parsed with clap. Tokens
//! that do not belong to a registered option are handed back to the caller so they
//! can be forwarded to the simulation executable.

pub mod errors;
pub mod presets;
mod validate;
pub mod value;

use clap::builder::ValueParser;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

pub use errors::OptionError;
pub use validate::{SAVE_DIR, default_save_dir};
pub use value::{OptionKind, OptionValue};

/// Flags that are accepted on the command line but never reported as unrecognized.
const PASSTHROUGH_FLAGS: [&str; 2] = ["-i", "--init"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Scalar(OptionKind),
    Array(OptionKind),
}

#[derive(Debug, Clone)]
pub struct OptionSpec {
    flag: String,
    shape: Shape,
    default: OptionValue,
    help: String,
}

impl OptionSpec {
    /// The command-line spelling, e.g. `--saveDir` or `-f`.
    pub fn flag(&self) -> &str {
        &self.flag
    }

    pub fn kind(&self) -> OptionKind {
        match self.shape {
            Shape::Scalar(kind) | Shape::Array(kind) => kind,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self.shape, Shape::Array(_))
    }

    pub fn default_value(&self) -> &OptionValue {
        &self.default
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    fn short(&self) -> Option<char> {
        if self.flag.starts_with("--") {
            return None;
        }
        self.flag.chars().nth(1)
    }

    fn to_arg(&self, id: &str) -> Arg {
        let help = if self.help.is_empty() {
            format!("[default: {}]", self.default)
        } else {
            format!("{} [default: {}]", self.help, self.default)
        };
        let arg = Arg::new(id.to_string()).help(help);
        let arg = match self.short() {
            Some(c) => arg.short(c),
            None => arg.long(id.to_string()),
        };

        match self.shape {
            Shape::Scalar(OptionKind::Bool) => arg.action(ArgAction::SetTrue),
            Shape::Scalar(kind) => arg
                .action(ArgAction::Set)
                .num_args(1)
                .allow_negative_numbers(true)
                .value_parser(value_parser_for(kind)),
            Shape::Array(kind) => arg
                .action(ArgAction::Set)
                .num_args(1..)
                .allow_negative_numbers(true)
                .value_parser(value_parser_for(kind)),
        }
    }

    fn extract(&self, id: &str, matches: &ArgMatches) -> OptionValue {
        let parsed = match self.shape {
            Shape::Scalar(OptionKind::Bool) => matches.get_flag(id).then_some(OptionValue::Bool(true)),
            Shape::Scalar(kind) => single_value(kind, id, matches),
            Shape::Array(kind) => many_values(kind, id, matches).map(OptionValue::Array),
        };
        parsed.unwrap_or_else(|| self.default.clone())
    }
}

fn value_parser_for(kind: OptionKind) -> ValueParser {
    match kind {
        OptionKind::Str => ValueParser::string(),
        OptionKind::Int => value_parser!(i64).into(),
        OptionKind::Float => value_parser!(f64).into(),
        OptionKind::Bool => ValueParser::bool(),
    }
}

fn single_value(kind: OptionKind, id: &str, matches: &ArgMatches) -> Option<OptionValue> {
    match kind {
        OptionKind::Str => matches.get_one::<String>(id).cloned().map(OptionValue::Str),
        OptionKind::Int => matches.get_one::<i64>(id).copied().map(OptionValue::Int),
        OptionKind::Float => matches.get_one::<f64>(id).copied().map(OptionValue::Float),
        OptionKind::Bool => matches.get_one::<bool>(id).copied().map(OptionValue::Bool),
    }
}

fn many_values(kind: OptionKind, id: &str, matches: &ArgMatches) -> Option<Vec<OptionValue>> {
    match kind {
        OptionKind::Str => matches
            .get_many::<String>(id)
            .map(|v| v.cloned().map(OptionValue::Str).collect()),
        OptionKind::Int => matches
            .get_many::<i64>(id)
            .map(|v| v.copied().map(OptionValue::Int).collect()),
        OptionKind::Float => matches
            .get_many::<f64>(id)
            .map(|v| v.copied().map(OptionValue::Float).collect()),
        OptionKind::Bool => matches
            .get_many::<bool>(id)
            .map(|v| v.copied().map(OptionValue::Bool).collect()),
    }
}

/// Turns a user supplied option name into `(id, flag)`.
///
/// `saveDir` and `--saveDir` both become `("saveDir", "--saveDir")`, a single dash
/// followed by one character is a short flag (`-f`).
fn normalize_name(name: &str) -> Option<(String, String)> {
    let name = name.trim();
    let id = name.trim_start_matches('-');
    if id.is_empty() || id.contains(char::is_whitespace) {
        return None;
    }

    let single_short = name.starts_with('-') && !name.starts_with("--") && id.chars().count() == 1;
    if single_short {
        Some((id.to_string(), format!("-{id}")))
    } else {
        Some((id.to_string(), format!("--{id}")))
    }
}

fn looks_like_flag(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-') && token.parse::<f64>().is_err()
}

fn is_passthrough(token: &str) -> bool {
    PASSTHROUGH_FLAGS.contains(&token) || (token.len() > 2 && token.ends_with(".py"))
}

/// Ordered set of registered options.
#[derive(Debug, Clone)]
pub struct OptionSet {
    program: String,
    options: IndexMap<String, OptionSpec>,
    interspersed: bool,
}

impl Default for OptionSet {
    fn default() -> Self {
        Self::new("simbatch")
    }
}

impl OptionSet {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            options: IndexMap::new(),
            interspersed: true,
        }
    }

    /// Stop option parsing at the first positional argument.
    ///
    /// Everything from that argument on is returned untouched as the remainder.
    pub fn stop_at_first_positional(mut self) -> Self {
        self.interspersed = false;
        self
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.options.get(name.trim_start_matches('-'))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn add_str_option(&mut self, name: &str, default: &str, help: &str) -> bool {
        self.register(name, Shape::Scalar(OptionKind::Str), default.into(), help)
    }

    pub fn add_int_option(&mut self, name: &str, default: i64, help: &str) -> bool {
        self.register(name, Shape::Scalar(OptionKind::Int), default.into(), help)
    }

    pub fn add_float_option(&mut self, name: &str, default: f64, help: &str) -> bool {
        self.register(name, Shape::Scalar(OptionKind::Float), default.into(), help)
    }

    pub fn add_bool_option(&mut self, name: &str, default: bool, help: &str) -> bool {
        self.register(name, Shape::Scalar(OptionKind::Bool), default.into(), help)
    }

    /// Registers an option taking one or more values of the same kind, e.g.
    /// `--deviceDimensions 10 10 10`.
    pub fn add_array_option(
        &mut self,
        name: &str,
        kind: OptionKind,
        default: Vec<OptionValue>,
        help: &str,
    ) -> bool {
        if let Some(bad) = default.iter().find(|v| v.kind() != Some(kind)) {
            warn!(
                "default {} for array option {} is not of kind {}",
                bad,
                name,
                kind.name()
            );
            return false;
        }
        self.register(name, Shape::Array(kind), OptionValue::Array(default), help)
    }

    /// Registers an option whose kind is inferred from `default`.
    pub fn add_option(&mut self, name: &str, default: OptionValue, help: &str) -> bool {
        match &default {
            OptionValue::Array(items) => {
                let Some(kind) = items.first().and_then(OptionValue::kind) else {
                    warn!("cannot infer element kind of array option {}", name);
                    return false;
                };
                self.add_array_option(name, kind, items.clone(), help)
            }
            scalar => {
                let kind = scalar.kind().unwrap_or(OptionKind::Str);
                self.register(name, Shape::Scalar(kind), default, help)
            }
        }
    }

    fn register(&mut self, name: &str, shape: Shape, default: OptionValue, help: &str) -> bool {
        let Some((id, flag)) = normalize_name(name) else {
            warn!("invalid option name {:?}", name);
            return false;
        };

        if self.options.contains_key(&id) {
            warn!("option {} already created", flag);
            return false;
        }

        debug!("Adding parse option {} with default value {}", flag, default);
        self.options.insert(
            id,
            OptionSpec {
                flag,
                shape,
                default,
                help: help.to_string(),
            },
        );
        true
    }

    /// The clap command used to validate registered options.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(self.program.clone())
            .no_binary_name(true)
            .args_override_self(true);
        for (id, spec) in &self.options {
            cmd = cmd.arg(spec.to_arg(id));
        }
        cmd
    }

    /// Parses `args` against the registered options.
    ///
    /// Returns the parsed values (defaults filled in) and the arguments that did not
    /// belong to any registered option. If a `saveDir` option is registered the
    /// directory is normalized and created.
    pub fn update_options<I, T>(&self, args: I) -> Result<(ParsedOptions, Vec<String>), OptionError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let (known, mut remaining) = self.split_known(&args);

        let matches = self.command().try_get_matches_from(known)?;

        let values = self
            .options
            .iter()
            .map(|(id, spec)| (id.clone(), spec.extract(id, &matches)))
            .collect();
        let mut parsed = ParsedOptions { values };

        if self.interspersed {
            remaining.retain(|token| !is_passthrough(token));
        }

        validate::ensure_save_dir(&mut parsed)?;

        info!("run options: {}", parsed);
        Ok((parsed, remaining))
    }

    fn lookup_flag(&self, flag: &str) -> Option<&OptionSpec> {
        self.options.values().find(|spec| spec.flag == flag)
    }

    fn split_known(&self, args: &[String]) -> (Vec<String>, Vec<String>) {
        let mut known = Vec::new();
        let mut remaining = Vec::new();
        let mut i = 0;

        while i < args.len() {
            let token = &args[i];
            i += 1;

            if token == "--" {
                remaining.extend(args[i..].iter().cloned());
                break;
            }

            if !looks_like_flag(token) {
                if self.interspersed {
                    remaining.push(token.clone());
                    continue;
                }
                remaining.extend(args[i - 1..].iter().cloned());
                break;
            }

            let (flag, has_inline_value) = match token.split_once('=') {
                Some((flag, _)) => (flag, true),
                None => (token.as_str(), false),
            };

            if flag == "-h" || flag == "--help" {
                known.push(token.clone());
                continue;
            }

            let Some(spec) = self.lookup_flag(flag) else {
                remaining.push(token.clone());
                continue;
            };

            known.push(token.clone());
            if has_inline_value {
                continue;
            }

            match spec.shape {
                Shape::Scalar(OptionKind::Bool) => {}
                Shape::Scalar(_) => {
                    if let Some(value) = args.get(i) {
                        known.push(value.clone());
                        i += 1;
                    }
                }
                Shape::Array(_) => {
                    while let Some(value) = args.get(i) {
                        if looks_like_flag(value) || value == "--" {
                            break;
                        }
                        known.push(value.clone());
                        i += 1;
                    }
                }
            }
        }

        (known, remaining)
    }
}

/// Values of every registered option after parsing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParsedOptions {
    values: IndexMap<String, OptionValue>,
}

impl ParsedOptions {
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name.trim_start_matches('-'))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn require(&self, name: &str) -> Result<&OptionValue, OptionError> {
        self.get(name)
            .ok_or_else(|| OptionError::UnknownOption(name.to_string()))
    }

    pub fn get_str(&self, name: &str) -> Result<&str, OptionError> {
        match self.require(name)? {
            OptionValue::Str(s) => Ok(s),
            other => Err(wrong_kind(name, "string", other)),
        }
    }

    pub fn get_int(&self, name: &str) -> Result<i64, OptionError> {
        match self.require(name)? {
            OptionValue::Int(i) => Ok(*i),
            other => Err(wrong_kind(name, "int", other)),
        }
    }

    pub fn get_float(&self, name: &str) -> Result<f64, OptionError> {
        match self.require(name)? {
            OptionValue::Float(f) => Ok(*f),
            OptionValue::Int(i) => Ok(*i as f64),
            other => Err(wrong_kind(name, "float", other)),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, OptionError> {
        match self.require(name)? {
            OptionValue::Bool(b) => Ok(*b),
            other => Err(wrong_kind(name, "bool", other)),
        }
    }

    pub fn get_array(&self, name: &str) -> Result<&[OptionValue], OptionError> {
        match self.require(name)? {
            OptionValue::Array(items) => Ok(items),
            other => Err(wrong_kind(name, "array", other)),
        }
    }

    /// String values of an option that may hold one string or an array of strings.
    pub fn get_strings(&self, name: &str) -> Result<Vec<String>, OptionError> {
        match self.require(name)? {
            OptionValue::Str(s) => Ok(vec![s.clone()]),
            OptionValue::Array(items) => items
                .iter()
                .map(|item| match item {
                    OptionValue::Str(s) => Ok(s.clone()),
                    other => Err(wrong_kind(name, "string", other)),
                })
                .collect(),
            other => Err(wrong_kind(name, "string", other)),
        }
    }

    pub(crate) fn set(&mut self, name: &str, value: OptionValue) {
        self.values.insert(name.trim_start_matches('-').to_string(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.values).unwrap_or(serde_json::Value::Null)
    }
}

fn wrong_kind(name: &str, expected: &'static str, found: &OptionValue) -> OptionError {
    OptionError::WrongKind {
        name: name.to_string(),
        expected,
        found: found.kind_name(),
    }
}

impl fmt::Display for ParsedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .values
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        write!(f, "Namespace({})", parts.join(", "))
    }
}
