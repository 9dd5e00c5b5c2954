use std::borrow::Cow;
use std::fmt::Display;

/// One word of a shell command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Word {
    /// Literal text, quoted when rendered.
    Literal(String),
    /// A shell variable expansion, rendered as `"${name}"`.
    Var(String),
    /// `--flag=<literal>` with only the value quoted.
    Flag(String, String),
}

impl Word {
    pub fn var(name: &str) -> Self {
        Word::Var(name.to_string())
    }

    pub fn flag(flag: &str, value: impl Into<String>) -> Self {
        Word::Flag(flag.to_string(), value.into())
    }

    fn render(&self) -> String {
        match self {
            Word::Literal(text) => quote(text).into_owned(),
            Word::Var(name) => format!("\"${{{}}}\"", name),
            Word::Flag(flag, value) => format!("{}={}", flag, quote(value)),
        }
    }
}

impl From<&str> for Word {
    fn from(value: &str) -> Self {
        Word::Literal(value.to_string())
    }
}

impl From<String> for Word {
    fn from(value: String) -> Self {
        Word::Literal(value)
    }
}

impl From<&String> for Word {
    fn from(value: &String) -> Self {
        Word::Literal(value.clone())
    }
}

/// Quotes `word` for POSIX shells. Words made only of safe characters are left bare.
pub fn quote(word: &str) -> Cow<'_, str> {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c));
    if safe {
        Cow::Borrowed(word)
    } else {
        Cow::Owned(format!("'{}'", word.replace('\'', r"'\''")))
    }
}

/// Line-oriented builder for scheduler job scripts.
#[derive(Debug, Clone)]
pub struct ScriptBuilder {
    lines: Vec<String>,
}

impl Default for ScriptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self {
            lines: vec!["#!/bin/bash".to_string()],
        }
    }

    /// `#SBATCH --<name>=<value>`
    pub fn directive(&mut self, name: &str, value: impl Display) -> &mut Self {
        self.lines.push(format!("#SBATCH --{}={}", name, value));
        self
    }

    pub fn comment(&mut self, text: &str) -> &mut Self {
        for line in text.lines() {
            self.lines.push(format!("# {}", line));
        }
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    pub fn assign(&mut self, var: &str, value: &str) -> &mut Self {
        self.lines.push(format!("{}={}", var, quote(value)));
        self
    }

    /// Appends shell text verbatim. Only for fixed text, never for user input.
    pub fn raw(&mut self, text: &str) -> &mut Self {
        self.lines.extend(text.lines().map(str::to_string));
        self
    }

    pub fn command<I, W>(&mut self, words: I) -> &mut Self
    where
        I: IntoIterator<Item = W>,
        W: Into<Word>,
    {
        self.lines.push(render_words(words));
        self
    }

    /// A command whose stdout and stderr both go to `log`.
    pub fn command_logged<I, W>(&mut self, words: I, log: &str) -> &mut Self
    where
        I: IntoIterator<Item = W>,
        W: Into<Word>,
    {
        self.lines
            .push(format!("{} &> {}", render_words(words), quote(log)));
        self
    }

    /// `eval "$(<loader> <args>)"`, used to pull in a site environment.
    pub fn eval_output<I, W>(&mut self, words: I) -> &mut Self
    where
        I: IntoIterator<Item = W>,
        W: Into<Word>,
    {
        self.lines
            .push(format!("eval \"$({})\"", render_words(words)));
        self
    }

    pub fn build(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

fn render_words<I, W>(words: I) -> String
where
    I: IntoIterator<Item = W>,
    W: Into<Word>,
{
    words
        .into_iter()
        .map(|w| w.into().render())
        .collect::<Vec<_>>()
        .join(" ")
}
