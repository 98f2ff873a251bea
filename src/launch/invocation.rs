//! Argument construction for `boltzgen run`.
//!
//! The launcher never interprets these options. It only places the values
//! behind the right flags, in a fixed order, so the rendered command line is
//! stable from one invocation to the next.

use crate::utils::config::{
    DEFAULT_TOOL, PRESET_BUDGET, PRESET_CONFIG, PRESET_NUM_DESIGNS, PRESET_OUTPUT,
    PRESET_PROTOCOL, RUN_SUBCOMMAND,
};
use std::ffi::OsString;
use std::path::PathBuf;

/// The executable that provides `run`, plus any wrapper arguments
///
/// The default is a bare `boltzgen` resolved through `PATH`. A wrapper such as
/// `conda run -n bg boltzgen` is expressed as program `conda` with leading
/// args `run -n bg boltzgen`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoltzgenTool {
    pub program: OsString,
    pub leading_args: Vec<OsString>,
}

impl Default for BoltzgenTool {
    fn default() -> Self {
        Self::new(DEFAULT_TOOL)
    }
}

impl BoltzgenTool {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a whitespace separated tool spec (`"conda run -n bg boltzgen"`)
    ///
    /// Returns `None` for a blank spec.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut parts = spec.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program).with_leading_args(parts))
    }
}

/// A `--config <section> <key=value>` override
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOverride {
    pub section: String,
    pub assignment: String,
}

impl ConfigOverride {
    pub fn new(section: impl Into<String>, assignment: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            assignment: assignment.into(),
        }
    }
}

/// One `boltzgen run` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInvocation {
    pub tool: BoltzgenTool,
    pub config: PathBuf,
    pub output: PathBuf,
    pub protocol: String,
    pub num_designs: u64,
    pub budget: u64,
    pub overrides: Vec<ConfigOverride>,
}

impl RunInvocation {
    pub fn new(config: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            tool: BoltzgenTool::default(),
            config: config.into(),
            output: output.into(),
            protocol: PRESET_PROTOCOL.to_string(),
            num_designs: PRESET_NUM_DESIGNS,
            budget: PRESET_BUDGET,
            overrides: Vec::new(),
        }
    }

    /// The fixed gpr75 run
    pub fn preset() -> Self {
        Self::new(PRESET_CONFIG, PRESET_OUTPUT)
    }

    pub fn with_override(mut self, section: &str, assignment: impl Into<String>) -> Self {
        self.overrides.push(ConfigOverride::new(section, assignment));
        self
    }

    /// Arguments after the program name, in stable order
    pub fn args(&self) -> Vec<OsString> {
        let mut args = self.tool.leading_args.clone();
        args.push(RUN_SUBCOMMAND.into());
        args.push(self.config.clone().into_os_string());
        args.push("--output".into());
        args.push(self.output.clone().into_os_string());
        args.push("--protocol".into());
        args.push(self.protocol.clone().into());
        args.push("--num_designs".into());
        args.push(self.num_designs.to_string().into());
        args.push("--budget".into());
        args.push(self.budget.to_string().into());

        for o in &self.overrides {
            args.push("--config".into());
            args.push(o.section.clone().into());
            args.push(o.assignment.clone().into());
        }

        args
    }

    pub fn program(&self) -> &OsString {
        &self.tool.program
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_preset_args_order() {
        let inv = RunInvocation::preset();
        assert_eq!(inv.program(), "boltzgen");
        assert_eq!(
            strings(inv.args()),
            vec![
                "run",
                "example/gpr75/gpr75.yaml",
                "--output",
                "workbench/gpr75_run2",
                "--protocol",
                "peptide-anything",
                "--num_designs",
                "10000",
                "--budget",
                "20",
            ]
        );
    }

    #[test]
    fn test_overrides_follow_fixed_flags() {
        let inv = RunInvocation::new("spec.yaml", "out")
            .with_override("design", "sampling.steps=50");
        let args = strings(inv.args());
        assert_eq!(
            &args[args.len() - 3..],
            &["--config", "design", "sampling.steps=50"]
        );
    }

    #[test]
    fn test_leading_args_precede_run() {
        let mut inv = RunInvocation::preset();
        inv.tool = BoltzgenTool::parse("conda run -n bg boltzgen").unwrap();

        assert_eq!(inv.program(), "conda");
        let args = strings(inv.args());
        assert_eq!(&args[..5], &["run", "-n", "bg", "boltzgen", "run"]);
    }

    #[test]
    fn test_parse_blank_tool() {
        assert!(BoltzgenTool::parse("   ").is_none());
    }
}
