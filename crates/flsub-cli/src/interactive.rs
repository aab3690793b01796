//! Interactive CLI mode

use crate::commands::{Cli, CommandExecutor, CommandResult, OutputFormat};
use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead, Write};

const PROMPT: &str = "flsub> ";

/// What one line of input asks the session to do.
#[derive(Debug)]
pub enum LineOutcome {
    Skip,
    Quit,
    Help,
    Clear,
    /// Argument errors, rendered by clap
    Usage(String),
    Executed(CommandResult),
}

/// Interactive CLI session
pub struct InteractiveSession {
    executor: CommandExecutor,
    format: OutputFormat,
}

impl InteractiveSession {
    pub fn new(executor: CommandExecutor, format: OutputFormat) -> Self {
        Self { executor, format }
    }

    /// Start interactive session on stdin/stdout
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    /// Read-eval loop over any line source, until `quit` or end of input.
    pub fn run_with<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> Result<()> {
        writeln!(output, "Welcome to flsub Interactive Mode")?;
        writeln!(output, "Type 'help' for available commands, 'quit' to exit")?;
        writeln!(output, "{}", "=".repeat(50))?;

        loop {
            write!(output, "{}", PROMPT)?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break;
            }

            match self.execute_line(&line) {
                Ok(LineOutcome::Skip) => {}
                Ok(LineOutcome::Quit) => {
                    writeln!(output, "Goodbye!")?;
                    break;
                }
                Ok(LineOutcome::Help) => write_help(&mut output)?,
                Ok(LineOutcome::Clear) => {
                    // Clear screen (ANSI terminals)
                    write!(output, "\x1B[2J\x1B[1;1H")?;
                }
                Ok(LineOutcome::Usage(usage)) => writeln!(output, "{}", usage.trim_end())?,
                Ok(LineOutcome::Executed(result)) => {
                    if !result.message.is_empty() {
                        writeln!(output, "{}", result.message)?;
                    }
                }
                Err(e) => writeln!(output, "Error: {:#}", e)?,
            }
        }

        Ok(())
    }

    /// Split one line with shell quoting rules and dispatch it through the
    /// session's executor. `--symbols` on the line applies to that line only.
    pub fn execute_line(&self, line: &str) -> Result<LineOutcome> {
        let line = line.trim();

        match line {
            "" => return Ok(LineOutcome::Skip),
            "quit" | "exit" | "q" => return Ok(LineOutcome::Quit),
            "help" | "h" => return Ok(LineOutcome::Help),
            "clear" => return Ok(LineOutcome::Clear),
            _ => {}
        }

        let args = shell_words::split(line)?;
        let cli = match Cli::try_parse_from(std::iter::once("flsub".to_string()).chain(args)) {
            Ok(cli) => cli,
            Err(e) => return Ok(LineOutcome::Usage(e.to_string())),
        };

        let Some(command) = cli.command else {
            return Ok(LineOutcome::Help);
        };
        let format = cli.format.unwrap_or_else(|| self.format.clone());

        let result = match cli.symbols.as_deref() {
            Some(path) => CommandExecutor::from_symbols_file(Some(path))?.execute(command, &format)?,
            None => self.executor.execute(command, &format)?,
        };

        Ok(LineOutcome::Executed(result))
    }
}

impl Default for InteractiveSession {
    fn default() -> Self {
        Self::new(CommandExecutor::new(), OutputFormat::Text)
    }
}

fn write_help<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(output, "Available commands:")?;
    writeln!(output, "  normalize <EXPR>            Print the normal form")?;
    writeln!(output, "  subsumes <SUB> <SUPER>      Is SUB subsumed by SUPER?")?;
    writeln!(output, "  equivalent <A> <B>          Do A and B subsume each other?")?;
    writeln!(output, "  disjoint <A> <B>            Is A and B unsatisfiable?")?;
    writeln!(output, "  satisfiable <EXPR>          Is EXPR satisfiable?")?;
    writeln!(output, "  classify --file <FILE>      Subsumption among named concepts")?;
    writeln!(output, "  info                        Show system information")?;
    writeln!(output, "  help                        Show this help")?;
    writeln!(output, "  clear                       Clear screen")?;
    writeln!(output, "  quit                        Exit interactive mode")?;
    writeln!(output)?;
    writeln!(output, "Quote expressions containing spaces: subsumes \"Cow and Meat\" Cow")?;
    writeln!(output, "Use '<command> --help' for detailed help on each command")
}

/// Start interactive mode
pub fn start_interactive(executor: CommandExecutor, format: OutputFormat) -> Result<()> {
    let mut session = InteractiveSession::new(executor, format);
    session.run()
}
