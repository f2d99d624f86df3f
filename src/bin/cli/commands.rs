//! Command Execution Logic
//!
//! Each subcommand resolves its configuration (defaults, then the optional
//! config file, then explicit flags), builds an engine and renders results.

use std::path::Path;

use anyhow::{bail, Context};
use owo_colors::OwoColorize;
use tracing::{debug, info};

use binomen_rs::generation::prompt::{format_prompt, TrainingExample};
use binomen_rs::io::dataset::{parse_cases, DatasetFormat};
use binomen_rs::io::reports::{ReportFormat, ReportGenerator};
use binomen_rs::{BinomenConfig, BinomenEngine, EvaluationCase};

use crate::cli::args::*;
use crate::cli::output::*;

/// Evaluate a dataset and print or write the report
pub async fn evaluate_command(args: EvaluateArgs) -> anyhow::Result<()> {
    let mut config = resolve_configuration(&args.config).await?;
    if let Some(policy) = args.family_policy {
        config.evaluation.family_policy = policy.into();
    }
    if args.sequential {
        config.evaluation.parallel = false;
    }

    let cases = load_dataset(&args.input).await?;
    let engine = BinomenEngine::new(config)?;
    let report = tokio::task::spawn_blocking(move || engine.evaluate(&cases)).await??;

    match (args.format.report_format(), args.out.as_deref()) {
        (None, None) => display_report(&report),
        (None, Some(out)) => {
            display_report(&report);
            let path = ReportGenerator::new(ReportFormat::Json).write(&report, out)?;
            println!();
            println!("{} {}", "📄 Report written:".bright_green().bold(), path.display());
        }
        (Some(format), None) => {
            print!("{}", ReportGenerator::new(format).render(&report)?);
        }
        (Some(format), Some(out)) => {
            let path = ReportGenerator::new(format).write(&report, out)?;
            println!("{} {}", "📄 Report written:".bright_green().bold(), path.display());
        }
    }

    Ok(())
}

/// Check the format, and optionally the family, of one name
pub async fn check_command(args: CheckArgs) -> anyhow::Result<()> {
    let config = resolve_configuration(&args.config).await?;
    let engine = BinomenEngine::new(config)?;

    let verdict = engine.validate_format(&args.name);
    display_format_verdict(&args.name, &verdict);

    if let Some(family) = &args.family {
        let check = engine.validate_family(&args.name, family)?;
        display_family_check(&check);
    }

    Ok(())
}

/// Score one name against a description
pub async fn score_command(args: ScoreArgs) -> anyhow::Result<()> {
    let config = resolve_configuration(&args.config).await?;
    let engine = BinomenEngine::new(config)?;

    let assessment = engine.score_semantics(&args.description, &args.name)?;
    display_assessment(&args.name, &assessment);

    Ok(())
}

/// Print the generation prompt, or the full training text when a name is given
pub async fn prompt_command(args: PromptArgs) -> anyhow::Result<()> {
    match &args.name {
        None => println!("{}", format_prompt(&args.description, &args.family)),
        Some(name) => {
            let Some(example) =
                TrainingExample::from_species(Some(name), None, &args.description, &args.family)
            else {
                bail!("Training text needs a two-word name and a non-empty description");
            };
            println!("{}", example.full_text());
        }
    }
    Ok(())
}

/// List the families of the active reference table
pub async fn list_families(args: ListFamiliesArgs) -> anyhow::Result<()> {
    let config = load_configuration(args.config.as_deref()).await?;
    let engine = BinomenEngine::new(config)?;
    display_families(engine.taxonomy());
    Ok(())
}

/// Print default configuration
pub async fn print_default_config() -> anyhow::Result<()> {
    println!("{}", "# Default binomen configuration".dimmed());
    println!("{}", "# Save this to a file and customize as needed".dimmed());
    println!("{}", "# Usage: binomen evaluate --config your-config.yml <INPUT>".dimmed());
    println!();

    let yaml_output = serde_yaml::to_string(&BinomenConfig::default())?;
    println!("{yaml_output}");

    Ok(())
}

/// Initialize a configuration file with defaults
pub async fn init_config(args: InitConfigArgs) -> anyhow::Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "Configuration file already exists: {} (use --force to overwrite)",
            args.output.display()
        );
    }

    BinomenConfig::default().to_yaml_file(&args.output)?;

    println!(
        "{} {}",
        "✅ Configuration saved to:".bright_green().bold(),
        args.output.display().to_string().cyan()
    );
    println!();
    println!("{}", "📝 Next steps:".bright_blue().bold());
    println!("   1. Edit the grammar, evaluation and reference sections");
    println!(
        "   2. Run evaluation with: {}",
        format!("binomen evaluate --config {} <INPUT>", args.output.display()).cyan()
    );

    Ok(())
}

/// Validate a configuration file, including any reference overrides it names
pub async fn validate_config(args: ValidateConfigArgs) -> anyhow::Result<()> {
    println!(
        "{} {}",
        "🔍 Validating configuration:".bright_blue().bold(),
        args.config.display().to_string().cyan()
    );
    println!();

    let validated = match load_configuration(Some(&args.config)).await {
        Ok(config) => BinomenEngine::new(config.clone())
            .map(|_| config)
            .map_err(anyhow::Error::from),
        Err(e) => Err(e),
    };

    let config = match validated {
        Ok(config) => {
            println!("{}", "✅ Configuration file is valid!".bright_green().bold());
            println!();
            config
        }
        Err(e) => {
            eprintln!("{} {:#}", "❌ Configuration validation failed:".red(), e);
            println!();
            println!("{}", "🔧 Common issues:".bright_blue().bold());
            println!("   • Check YAML syntax (indentation, colons, quotes)");
            println!("   • Profiles are 'permissive' or 'strict'");
            println!("   • Suffix lists must not contain blank or non-alphabetic entries");
            println!("   • Reference override paths must exist and be YAML or JSON");
            println!();
            println!(
                "{}",
                "💡 Tip: Use 'binomen print-default-config' to see valid format".dimmed()
            );
            std::process::exit(1);
        }
    };

    display_config_summary(&config, args.detailed);
    Ok(())
}

/// Load configuration from file or use defaults
pub async fn load_configuration(config_path: Option<&Path>) -> anyhow::Result<BinomenConfig> {
    let Some(path) = config_path else {
        return Ok(BinomenConfig::default());
    };

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content)?,
        _ => serde_yaml::from_str(&content)?,
    };

    debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Load the configuration file and apply the grammar profile flag
async fn resolve_configuration(args: &ConfigArgs) -> anyhow::Result<BinomenConfig> {
    let mut config = load_configuration(args.config.as_deref()).await?;
    if let Some(profile) = args.profile {
        config.grammar.profile = profile.into();
    }
    Ok(config)
}

async fn load_dataset(path: &Path) -> anyhow::Result<Vec<EvaluationCase>> {
    let format = DatasetFormat::from_path(path)?;
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;
    let cases = parse_cases(&content, format, &path.display().to_string())?;

    info!(cases = cases.len(), path = %path.display(), "dataset loaded");
    Ok(cases)
}
