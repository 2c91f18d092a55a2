use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use jsonschema_xsd_core::{convert, write_xsd, ConvertOptions, XsdMetadata, XsdSchema};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "jsonschema-xsd")]
#[command(about = "Convert a JSON Schema with XML extension keywords into an XSD document")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a JSON Schema to XSD
    Convert {
        /// Input JSON Schema file
        input: PathBuf,

        /// Type classification table (message name, inline-root flag, shapes per pointer)
        #[arg(short, long)]
        metadata: PathBuf,

        /// Output file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the root message element name from the metadata file
        #[arg(long)]
        message_name: Option<String>,

        /// Max nesting depth for inline types
        #[arg(long, default_value_t = 50)]
        max_depth: usize,

        /// Reject unknown @xsdSchemaAttributes instead of warning
        #[arg(long)]
        strict_schema_attributes: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Xsd)]
        format: OutputFormat,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    /// XML Schema text
    Xsd,
    /// The XSD tree as pretty-printed JSON
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for the document
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Convert {
            input,
            metadata,
            output,
            message_name,
            max_depth,
            strict_schema_attributes,
            format,
        } => {
            let schema: serde_json::Value = read_json(&input, "schema")?;
            let mut classifier: XsdMetadata = read_json(&metadata, "metadata")?;
            if let Some(name) = message_name {
                classifier.message_name = name;
            }

            let options = ConvertOptions {
                max_depth,
                strict_schema_attributes,
            };

            let xsd = convert(&schema, &classifier, &options)
                .map_err(|e| anyhow::Error::from(e).context("Conversion failed"))?;

            write_output(&xsd, output.as_deref(), format)?;
        }
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {what} file: {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {what} from: {}", path.display()))
}

fn write_output(xsd: &XsdSchema, path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let mut writer: Box<dyn Write> = if let Some(p) = path {
        let file = File::create(p)
            .with_context(|| format!("Failed to create output file: {}", p.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    match format {
        OutputFormat::Xsd => {
            write_xsd(xsd, &mut writer).context("Failed to write XSD")?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, xsd).context("Failed to write JSON")?;
            writeln!(writer).context("Failed to write trailing newline")?;
        }
    }

    writer.flush().context("Failed to flush output")?;
    Ok(())
}
