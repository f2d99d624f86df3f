//! CLI Argument Structures
//!
//! Command definitions and the value enums that map CLI flags onto the
//! library's configuration types.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use binomen_rs::core::config::{FamilyPolicy, GrammarProfile};
use binomen_rs::io::reports::ReportFormat;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Constrained generation and evaluation of Latin binomial names
#[derive(Parser)]
#[command(name = "binomen")]
#[command(version = VERSION)]
#[command(about = "Binomen - Evaluate machine-generated Latin species names")]
#[command(long_about = "
Check generated two-word species names for Latin format, family membership
and semantic consistency with the description they were generated from.

Common Usage:

  # Evaluate a dataset of generated names
  binomen evaluate cases.jsonl

  # Write a Markdown report under strict Latin morphology
  binomen evaluate cases.json --format markdown --out reports --profile strict

  # Check a single name against its family
  binomen check \"Panthera crinita\" --family Felidae

  # Explain how an epithet relates to a description
  binomen score \"Panthera crinita\" --description \"a lion with a flowing mane\"
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a dataset of generated names
    Evaluate(Box<EvaluateArgs>),

    /// Check the format and family of a single name
    Check(CheckArgs),

    /// Score the semantic consistency of a name with a description
    Score(ScoreArgs),

    /// Print the generation prompt for a description and family
    Prompt(PromptArgs),

    /// List the families and genera of the reference table
    #[command(name = "list-families")]
    ListFamilies(ListFamiliesArgs),

    /// Print default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// Initialize a configuration file with defaults
    #[command(name = "init-config")]
    InitConfig(InitConfigArgs),

    /// Validate a binomen configuration file
    #[command(name = "validate-config")]
    ValidateConfig(ValidateConfigArgs),
}

/// Configuration source shared by the evaluating commands
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Configuration file (YAML, or JSON by extension)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Grammar profile, overriding the configuration file
    #[arg(long, value_enum)]
    pub profile: Option<ProfileArg>,
}

#[derive(Args)]
pub struct EvaluateArgs {
    /// Dataset of cases (.json, .jsonl or .yaml)
    pub input: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Directory to write the report into
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// How cases with an unknown family count toward family accuracy
    #[arg(long, value_enum)]
    pub family_policy: Option<FamilyPolicyArg>,

    /// Evaluate cases one at a time instead of in parallel
    #[arg(long)]
    pub sequential: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Generated name, markup allowed
    pub name: String,

    /// Expected family; enables the family check
    #[arg(long)]
    pub family: Option<String>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args)]
pub struct ScoreArgs {
    /// Generated name, markup allowed
    pub name: String,

    /// Description the name was generated from
    #[arg(short, long)]
    pub description: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args)]
pub struct PromptArgs {
    /// Free-text description
    #[arg(short, long)]
    pub description: String,

    /// Taxonomic family
    #[arg(short, long)]
    pub family: String,

    /// Target name; prints the full training text instead of the bare prompt
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct ListFamiliesArgs {
    /// Configuration file naming a taxonomy override
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct InitConfigArgs {
    /// Output configuration file name
    #[arg(short, long, default_value = "binomen.yml")]
    pub output: PathBuf,

    /// Overwrite existing configuration file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ValidateConfigArgs {
    /// Path to configuration file to validate
    pub config: PathBuf,

    /// Show every setting
    #[arg(long)]
    pub detailed: bool,
}

/// Evaluation output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored terminal tables
    Table,
    /// JSON report
    Json,
    /// YAML report
    Yaml,
    /// Markdown report
    Markdown,
}

impl OutputFormat {
    /// Report encoding for file formats; `None` for terminal output
    pub fn report_format(self) -> Option<ReportFormat> {
        match self {
            Self::Table => None,
            Self::Json => Some(ReportFormat::Json),
            Self::Yaml => Some(ReportFormat::Yaml),
            Self::Markdown => Some(ReportFormat::Markdown),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    /// Capitalised genus and lowercase epithet
    Permissive,
    /// Epithet must end in a Latin suffix
    Strict,
}

impl From<ProfileArg> for GrammarProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Permissive => GrammarProfile::Permissive,
            ProfileArg::Strict => GrammarProfile::Strict,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FamilyPolicyArg {
    /// Unknown families count as failures
    CountAsFailure,
    /// Unknown families are left out of family accuracy
    ExcludeUnknown,
}

impl From<FamilyPolicyArg> for FamilyPolicy {
    fn from(arg: FamilyPolicyArg) -> Self {
        match arg {
            FamilyPolicyArg::CountAsFailure => FamilyPolicy::CountAsFailure,
            FamilyPolicyArg::ExcludeUnknown => FamilyPolicy::ExcludeUnknown,
        }
    }
}
