use clap::{Parser, Subcommand};
use margin_template::cli;
use margin_template::error::TemplateResult;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "margin-template")]
#[command(about = "Generate the per-item profit-margin tracking template (.xlsx)")]
#[command(long_about = "Margin Template - profit-margin tracking workbook generator

Writes a ready-to-fill Excel template: styled 27-column header, store and
category dropdowns, currency/percent/date formats and per-row formulas for
total cost, platform commission, payment fee, tax, gross/net profit and margins.

Run without a command to generate the template at the default location:
  <repo_root>/模板与示例/财务模板/商品利润率模板.xlsx

COMMANDS:
  generate  - Write the template (default)
  inspect   - Check the layout of a generated template

EXAMPLES:
  margin-template
  margin-template generate --repo-root ../shop -o out/template.xlsx
  margin-template inspect 模板与示例/财务模板/商品利润率模板.xlsx --json

Logging goes to stderr; set RUST_LOG (e.g. RUST_LOG=margin_template=debug) to tune it.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Write the profit-margin template.

Store names for the store dropdown are the immediate subdirectories of
<repo_root>/店铺档案. When that directory is missing or empty, the single
store 杭州-首店 is used. Parent directories of the output are created and an
existing file is overwritten.")]
    /// Write the profit-margin template
    Generate {
        /// Output Excel file path (.xlsx) [default: <repo_root>/模板与示例/财务模板/商品利润率模板.xlsx]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Repository root holding the store archive [default: current directory]
        #[arg(short, long)]
        repo_root: Option<PathBuf>,
    },

    #[command(long_about = "Read a generated template back and check its layout.

Reports the header row, lookup lists and formula coverage. Fails when the
workbook does not match the template layout, e.g. a missing formula or a
formula referencing another row.")]
    /// Check the layout of a generated template
    Inspect {
        /// Path to the template (.xlsx)
        file: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "margin_template=debug"
    } else {
        "margin_template=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> TemplateResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        None => cli::generate(None, None, cli.verbose),

        Some(Commands::Generate { output, repo_root }) => {
            cli::generate(output, repo_root, cli.verbose)
        }

        Some(Commands::Inspect { file, json }) => cli::inspect(file, json, cli.verbose),
    }
}
