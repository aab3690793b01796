//! CLI command definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flsub_core::{Expression, ReasonerError, Subsumption, SubsumptionQueryProcessor};
use flsub_syntax::{Symbols, TextExpressionParser};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main CLI structure
#[derive(Parser, Debug)]
#[command(name = "flsub")]
#[command(about = "Concept normalization and structural subsumption for description logic expressions")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Output format [default: text]
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// JSON file overriding the operator spellings
    #[arg(short, long, global = true)]
    pub symbols: Option<PathBuf>,

    /// Starts the interactive shell when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Print the normal form of an expression
    Normalize {
        expression: String,
    },

    /// Is SUB subsumed by SUPER?
    Subsumes {
        sub: String,
        #[arg(value_name = "SUPER")]
        sup: String,
    },

    /// Do two expressions subsume each other?
    Equivalent {
        left: String,
        right: String,
    },

    /// Is the intersection of two expressions unsatisfiable?
    Disjoint {
        left: String,
        right: String,
    },

    /// Is an expression satisfiable?
    Satisfiable {
        expression: String,
    },

    /// Find all subsumption relations among named concepts
    Classify {
        /// JSON object mapping concept names to expression text
        #[arg(long)]
        file: PathBuf,
    },

    /// Show system information
    Info,
}

/// Output format options
#[derive(Clone, Debug, Default, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// Command execution result
#[derive(Debug)]
pub struct CommandResult {
    pub success: bool,
    /// Rendered in the requested output format
    pub message: String,
    pub data: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct QueryReport<'a> {
    query: &'a str,
    arguments: Vec<String>,
    result: bool,
}

/// Execute CLI commands
pub struct CommandExecutor {
    parser: TextExpressionParser,
    processor: SubsumptionQueryProcessor,
}

impl CommandExecutor {
    pub fn new() -> Self {
        Self {
            parser: TextExpressionParser::new(),
            processor: SubsumptionQueryProcessor::default(),
        }
    }

    pub fn with_symbols(symbols: Symbols) -> Result<Self> {
        Ok(Self {
            parser: TextExpressionParser::with_symbols(symbols)?,
            processor: SubsumptionQueryProcessor::default(),
        })
    }

    /// Executor for the `--symbols` flag, default spellings when absent.
    pub fn from_symbols_file(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let symbols = Symbols::from_file(path)
                    .with_context(|| format!("Failed to load symbols from {}", path.display()))?;
                info!(path = %path.display(), "loaded symbol table");
                Self::with_symbols(symbols)
            }
            None => Ok(Self::new()),
        }
    }

    /// Execute a CLI command
    pub fn execute(&self, command: Commands, format: &OutputFormat) -> Result<CommandResult> {
        debug!(?command, "executing command");

        match command {
            Commands::Normalize { expression } => self.execute_normalize(&expression, format),
            Commands::Subsumes { sub, sup } => {
                let (a, b) = (self.parse(&sub)?, self.parse(&sup)?);
                self.report("subsumes", vec![sub, sup], self.processor.subsumed_by(&a, &b), format)
            }
            Commands::Equivalent { left, right } => {
                let (a, b) = (self.parse(&left)?, self.parse(&right)?);
                self.report("equivalent", vec![left, right], self.processor.equivalent(&a, &b), format)
            }
            Commands::Disjoint { left, right } => {
                let (a, b) = (self.parse(&left)?, self.parse(&right)?);
                self.report("disjoint", vec![left, right], self.processor.disjoint(&a, &b), format)
            }
            Commands::Satisfiable { expression } => {
                let a = self.parse(&expression)?;
                self.report("satisfiable", vec![expression], self.processor.satisfiable(&a), format)
            }
            Commands::Classify { file } => self.execute_classify(&file, format),
            Commands::Info => self.execute_info(format),
        }
    }

    fn parse(&self, text: &str) -> Result<Expression> {
        self.parser
            .parse_line(text)
            .with_context(|| format!("Failed to parse expression {:?}", text))
    }

    fn execute_normalize(&self, text: &str, format: &OutputFormat) -> Result<CommandResult> {
        let normalized = self.parse(text)?;
        let data = serde_json::json!({
            "input": text,
            "normalized": normalized.to_string(),
            "expression": normalized,
        });

        Ok(CommandResult {
            success: true,
            message: render(format, &data, || normalized.to_string())?,
            data: Some(data),
        })
    }

    fn report(
        &self,
        query: &str,
        arguments: Vec<String>,
        answer: Result<bool, ReasonerError>,
        format: &OutputFormat,
    ) -> Result<CommandResult> {
        match answer {
            Ok(result) => {
                let data = serde_json::to_value(QueryReport {
                    query,
                    arguments,
                    result,
                })?;

                Ok(CommandResult {
                    success: true,
                    message: render(format, &data, || result.to_string())?,
                    data: Some(data),
                })
            }
            Err(err) => unsupported(query, err, format),
        }
    }

    fn execute_classify(&self, file: &Path, format: &OutputFormat) -> Result<CommandResult> {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read concepts from {}", file.display()))?;
        let definitions: BTreeMap<String, String> = serde_json::from_str(&content)
            .with_context(|| format!("{} must be a JSON object of name to expression", file.display()))?;

        let mut concepts = BTreeMap::new();
        for (name, text) in &definitions {
            let expression = self
                .parser
                .parse_line(text)
                .with_context(|| format!("Failed to parse concept {}", name))?;
            concepts.insert(name.clone(), expression);
        }

        let classification = match self
            .processor
            .classify(concepts.iter().map(|(name, expression)| (name.clone(), expression)))
        {
            Ok(classification) => classification,
            Err(err) => return unsupported("classify", err, format),
        };

        info!(
            concepts = concepts.len(),
            pairs = classification.pairs.len(),
            "classified concepts"
        );

        let data = serde_json::to_value(&classification)?;
        let message = render(format, &data, || {
            let mut lines: Vec<String> = classification
                .pairs
                .iter()
                .map(|(sub, sup)| format!("{} is subsumed by {}", sub, sup))
                .collect();
            for group in &classification.equivalences {
                let names: Vec<&str> = group.iter().map(String::as_str).collect();
                lines.push(format!("equivalent: {}", names.join(", ")));
            }
            if lines.is_empty() {
                lines.push("no subsumption relations".to_string());
            }
            lines.join("\n")
        })?;

        Ok(CommandResult {
            success: true,
            message,
            data: Some(data),
        })
    }

    fn execute_info(&self, format: &OutputFormat) -> Result<CommandResult> {
        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "authors": env!("CARGO_PKG_AUTHORS"),
            "matcher": self.processor.matcher().name(),
            "symbols": self.parser.symbols(),
        });

        Ok(CommandResult {
            success: true,
            message: render(format, &info, || serde_json::to_string_pretty(&info).unwrap_or_default())?,
            data: Some(info),
        })
    }
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// A construct the matcher cannot decide is a failed command, never `false`.
fn unsupported(query: &str, err: ReasonerError, format: &OutputFormat) -> Result<CommandResult> {
    let data = match &err {
        ReasonerError::UnsupportedConstruct { construct, reason } => serde_json::json!({
            "query": query,
            "error": err.to_string(),
            "construct": construct.to_string(),
            "reason": reason,
        }),
    };

    Ok(CommandResult {
        success: false,
        message: render(format, &data, || err.to_string())?,
        data: Some(data),
    })
}

fn render(format: &OutputFormat, data: &serde_json::Value, text: impl FnOnce() -> String) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => text(),
        OutputFormat::Json => serde_json::to_string(data)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(data)?,
    })
}
