//! Command implementations

use super::{ConfigArgs, KnownArgs, OutputFormat, ScanArgs};
use crate::extract::{ExtractionPipeline, ExtractionReport, HookRecord, ScanStats, SkippedFile};
use crate::reference::ReferenceHookSet;
use crate::source::{user_config_path, ScanConfig, SourceArchive, CONFIG_FILE};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything a finished scan hands to the output layer
pub struct ScanOutcome {
    /// Archive display name
    pub source: String,
    pub report: ExtractionReport,
    /// Reference set the scan filtered against
    pub known: ReferenceHookSet,
    pub search: Option<String>,
}

impl ScanOutcome {
    /// Records matching the search term, in discovery order
    pub fn visible(&self) -> Vec<&HookRecord> {
        let term = self.search.as_deref().unwrap_or("");
        self.report
            .records
            .iter()
            .filter(|r| r.matches_search(term))
            .collect()
    }
}

/// JSON export document
#[derive(Serialize)]
struct ExportDocument<'a> {
    tool: &'static str,
    version: &'static str,
    generated_at: DateTime<Utc>,
    source: &'a str,
    search: Option<&'a str>,
    stats: &'a ScanStats,
    total_records: usize,
    shown_records: usize,
    skipped: &'a [SkippedFile],
    records: Vec<&'a HookRecord>,
}

/// Load the configuration from an explicit path or the default locations
pub fn load_config(explicit: Option<&Path>) -> Result<ScanConfig> {
    let config = match explicit {
        Some(path) => ScanConfig::load(path)?,
        None => ScanConfig::load_or_default(Path::new("."))?,
    };
    Ok(config)
}

/// Build the reference set described by a configuration
pub fn build_reference(config: &ScanConfig) -> Result<ReferenceHookSet> {
    let mut known = if config.include_builtin_hooks {
        ReferenceHookSet::builtin().clone()
    } else {
        ReferenceHookSet::empty()
    };

    for path in &config.known_hooks_files {
        let extra = ReferenceHookSet::load(path)?;
        debug!("Loaded {} known hooks from {:?}", extra.len(), path);
        known.extend_from(&extra);
    }

    known.extend_from(&ReferenceHookSet::from_names(config.known_hooks.iter().cloned()));
    Ok(known)
}

/// Scan an archive for custom hooks
pub fn scan(args: &ScanArgs, config: &ScanConfig) -> Result<ScanOutcome> {
    let mut config = config.clone();
    if !args.callee.is_empty() {
        config.callees = args.callee.clone();
    }
    if args.no_builtin {
        config.include_builtin_hooks = false;
    }
    config.known_hooks_files.extend(args.known.iter().cloned());
    config.validate()?;

    let known = build_reference(&config)?;

    let archive = SourceArchive::open(&args.archive, &config)
        .with_context(|| format!("Failed to open {:?}", args.archive))?;
    let report = ExtractionPipeline::new(&config, &known)
        .run(&archive)
        .with_context(|| format!("Failed to analyze {:?}", args.archive))?;

    Ok(ScanOutcome {
        source: archive.name(),
        report,
        known,
        search: args.search.clone(),
    })
}

/// Write a scan report in the requested format
pub fn write_report<W: Write>(out: &mut W, outcome: &ScanOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => write_report_text(out, outcome)?,
        OutputFormat::Json => write_report_json(out, outcome)?,
        OutputFormat::Markdown => write_report_markdown(out, outcome)?,
    }
    Ok(())
}

/// Write the report to `path`, or stdout when no path is given
pub fn emit_report(outcome: &ScanOutcome, format: OutputFormat, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {:?}", path))?;
            write_report(&mut file, outcome, format)?;
            eprintln!("✓ Report written to {:?}", path);
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            write_report(&mut lock, outcome, format)?;
        }
    }
    Ok(())
}

/// Print the report in JSON format
pub fn write_report_json<W: Write>(out: &mut W, outcome: &ScanOutcome) -> Result<()> {
    let visible = outcome.visible();
    let doc = ExportDocument {
        tool: crate::APP_NAME,
        version: crate::VERSION,
        generated_at: Utc::now(),
        source: &outcome.source,
        search: outcome.search.as_deref(),
        stats: &outcome.report.stats,
        total_records: outcome.report.records.len(),
        shown_records: visible.len(),
        skipped: &outcome.report.skipped,
        records: visible,
    };

    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out)?;
    Ok(())
}

/// Print the report in text format
pub fn write_report_text<W: Write>(out: &mut W, outcome: &ScanOutcome) -> Result<()> {
    let stats = &outcome.report.stats;
    let visible = outcome.visible();

    let title = format!("Custom hooks in {}", outcome.source);
    writeln!(out, "{}", title)?;
    writeln!(out, "{}\n", "=".repeat(title.chars().count()))?;

    writeln!(
        out,
        "Processed {} files ({} not source, {} skipped)",
        stats.files_processed,
        stats.files_rejected,
        outcome.report.skipped.len()
    )?;
    writeln!(
        out,
        "Found {} hooks, {} already known",
        stats.hooks_found, stats.known_filtered
    )?;
    writeln!(
        out,
        "Showing {} of {} custom hooks\n",
        visible.len(),
        outcome.report.records.len()
    )?;

    if visible.is_empty() {
        writeln!(out, "✓ No custom hooks found.")?;
    }

    for record in &visible {
        writeln!(out, "🪝 {} [{}]", record.hook_name, record.id)?;
        writeln!(out, "   Function: {}", record.function_name())?;
        writeln!(out, "   File: {} (line {})", record.source_file, record.line_number)?;
        writeln!(out, "   Call: {}", record.call_text)?;

        if record.function.is_some() {
            writeln!(out, "   Definition:")?;
            for line in record.function_definition().lines() {
                writeln!(out, "      {}", line)?;
            }
        }

        let defaults = outcome.known.default_params(&record.hook_name);
        writeln!(out, "   Usage: {}", record.usage_example(defaults))?;
        writeln!(out)?;
    }

    if !outcome.report.skipped.is_empty() {
        writeln!(out, "Skipped files:")?;
        for skipped in &outcome.report.skipped {
            writeln!(out, "  ⚠ {}: {}", skipped.path, skipped.reason)?;
        }
    }

    Ok(())
}

/// Print the report as a Markdown document
pub fn write_report_markdown<W: Write>(out: &mut W, outcome: &ScanOutcome) -> Result<()> {
    let visible = outcome.visible();

    writeln!(out, "# Custom hooks in {}\n", outcome.source)?;
    writeln!(
        out,
        "{} of {} custom hooks shown, {} files processed.\n",
        visible.len(),
        outcome.report.records.len(),
        outcome.report.stats.files_processed
    )?;

    if visible.is_empty() {
        return Ok(());
    }

    writeln!(out, "| Hook | Function | File | Line |")?;
    writeln!(out, "|------|----------|------|------|")?;
    for record in &visible {
        writeln!(
            out,
            "| `{}` | {} | {} | {} |",
            escape_cell(&record.hook_name),
            escape_cell(record.function_name()),
            escape_cell(&record.source_file),
            record.line_number
        )?;
    }

    for record in &visible {
        writeln!(out, "\n## {}\n", record.hook_name)?;
        writeln!(
            out,
            "**File:** {} (line {})\n",
            record.source_file, record.line_number
        )?;
        writeln!(out, "```php\n{}\n```", record.call_text)?;

        if record.function.is_some() {
            writeln!(out, "\n**Function definition:**\n")?;
            writeln!(out, "```php\n{}\n```", record.function_definition())?;
        }

        let defaults = outcome.known.default_params(&record.hook_name);
        writeln!(out, "\n**Usage:** `{}`", record.usage_example(defaults))?;
    }

    Ok(())
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// List the reference hook set
pub fn known<W: Write>(out: &mut W, args: &KnownArgs, config: &ScanConfig, format: OutputFormat) -> Result<()> {
    let known = build_reference(config)?;
    let term = args.search.as_deref().unwrap_or("").to_lowercase();
    let hooks: Vec<_> = known
        .iter()
        .filter(|(name, _)| name.to_lowercase().contains(&term))
        .collect();

    match format {
        OutputFormat::Json => {
            let map: std::collections::BTreeMap<&str, &[String]> = hooks.into_iter().collect();
            serde_json::to_writer_pretty(&mut *out, &map)?;
            writeln!(out)?;
        }
        OutputFormat::Markdown => {
            writeln!(out, "| Hook | Parameters |")?;
            writeln!(out, "|------|------------|")?;
            for (name, params) in hooks {
                writeln!(out, "| `{}` | {} |", name, escape_cell(&params.join(", ")))?;
            }
        }
        OutputFormat::Text => {
            writeln!(out, "Known hooks ({} of {}):\n", hooks.len(), known.len())?;
            for (name, params) in hooks {
                if params.is_empty() {
                    writeln!(out, "  {}", name)?;
                } else {
                    writeln!(out, "  {} ({})", name, params.join(", "))?;
                }
            }
        }
    }

    Ok(())
}

/// Show or initialize configuration
pub fn config(args: &ConfigArgs, explicit: Option<&Path>) -> Result<()> {
    if args.init {
        let path = PathBuf::from(CONFIG_FILE);
        if path.exists() && !args.force {
            anyhow::bail!("{} already exists. Use --force to overwrite.", CONFIG_FILE);
        }
        ScanConfig::default().save(&path)?;
        println!("✓ Wrote default configuration to {:?}", path);
        return Ok(());
    }

    let source = match explicit {
        Some(path) => path.display().to_string(),
        None if Path::new(CONFIG_FILE).exists() => CONFIG_FILE.to_string(),
        None => match user_config_path() {
            Some(user) if user.exists() => user.display().to_string(),
            _ => "defaults".to_string(),
        },
    };

    let config = load_config(explicit)?;

    println!("HookFinder Configuration");
    println!("========================\n");
    println!("Source: {}\n", source);

    let rendered = toml::to_string_pretty(&config).context("Failed to serialize configuration")?;
    println!("{}", rendered);

    Ok(())
}
