use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use formfill::resolve::aliases::AliasTable;
use formfill::{Error, FieldDictionary, FillOptions, ResolverConfig, docx, placeholder};

#[derive(Parser)]
#[command(name = "formfill")]
#[command(version)]
#[command(about = "Fill DOCX form templates from extracted field data", long_about = None)]
struct Cli {
    /// Log progress (repeat for debug output)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the placeholders in a template
    Placeholders {
        /// Template file (.docx)
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Print a JSON object of every placeholder with an empty value
        #[arg(long)]
        json: bool,
    },

    /// Print the template as plain text with placeholders in place
    Text {
        /// Template file (.docx)
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,
    },

    /// Fill a template from a JSON field dictionary
    Fill {
        /// Template file (.docx)
        #[arg(short, long, value_name = "TEMPLATE")]
        template: PathBuf,

        /// Extracted fields as a flat JSON object
        #[arg(short, long, value_name = "FIELDS")]
        fields: PathBuf,

        /// Output file (.docx)
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Extra alias table (JSON: placeholder -> field or null)
        #[arg(long, value_name = "FILE")]
        aliases: Option<PathBuf>,

        /// Ignore the built-in alias table
        #[arg(long)]
        no_default_aliases: bool,

        /// Manual values (JSON: placeholder -> value) applied after resolution
        #[arg(long, value_name = "FILE")]
        overrides: Option<PathBuf>,

        /// Write the mapping report as JSON
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },
}

fn read_overrides(path: &Path) -> Result<BTreeMap<String, String>, Error> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display()))))?;
    serde_json::from_str(&json)
        .map_err(|e| Error::Config(format!("overrides must map placeholders to strings: {e}")))
}

fn run(command: Commands) -> Result<(), Error> {
    match command {
        Commands::Placeholders { template, json } => {
            let doc = docx::parse(&template)?;
            let names = placeholder::extract(&doc);
            if json {
                let template = placeholder::mapping_template(&names);
                println!("{}", serde_json::to_string_pretty(&template)?);
            } else {
                for name in &names {
                    println!("{name}");
                }
            }
        }
        Commands::Text { template } => {
            let doc = docx::parse(&template)?;
            println!("{}", doc.plain_text());
        }
        Commands::Fill {
            template,
            fields,
            output,
            aliases,
            no_default_aliases,
            overrides,
            report,
        } => {
            let fields = FieldDictionary::from_json_file(&fields)?;

            let mut table = if no_default_aliases {
                AliasTable::new()
            } else {
                AliasTable::builtin()
            };
            if let Some(path) = aliases {
                table.extend(AliasTable::from_json_file(&path)?);
            }
            let options = FillOptions {
                resolver: ResolverConfig::default().with_aliases(table),
                overrides: match overrides {
                    Some(path) => read_overrides(&path)?,
                    None => BTreeMap::new(),
                },
            };

            let result = formfill::fill_template_file(&template, &fields, &output, &options)?;
            match report {
                Some(path) => {
                    std::fs::write(&path, result.to_json()?)?;
                    println!("{} (report: {})", result.summary(), path.display());
                }
                None => {
                    println!("{}", result.summary());
                    for name in &result.unresolved {
                        println!("  unresolved: [{name}]");
                    }
                }
            }
            println!("Output: {}", output.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
