use clap::Parser;
use errmapper::{
    PositionScanner, RemapError, RemapReport, RemapResult, SourceMapFile, SourceMapTable,
    read_source_map, remap_with,
};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Map JavaScript error positions back to their original sources
#[derive(Parser, Debug)]
#[command(name = "errmapper")]
#[command(version)]
#[command(about = "Maps file.js:line:column positions in error messages to original sources using a source map", long_about = None)]
#[command(after_help = "Examples:\n  errmapper \"Error at app.js:10:5\" ./dist/app.js.map\n  errmapper \"TypeError: Cannot read property 'x' at /dist/app.js:25:12\" ./dist/app.js.map\n  node app.js 2>&1 | errmapper - ./dist/app.js.map")]
struct Args {
    /// Error message containing compiled file positions ('-' reads stdin)
    message: String,

    /// Path to the .map source map file
    sourcemap: PathBuf,

    /// Compiled file extension to recognize (repeatable)
    #[arg(short, long = "ext", value_name = "EXT", default_value = "js")]
    ext: Vec<String>,

    /// Output structured JSON instead of the remapped message
    #[arg(short, long)]
    json: bool,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "errmapper=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let sourcemap = display_path(&args.sourcemap);

    match run(&args) {
        Ok((result, file)) => {
            let output = if args.json {
                let report = RemapReport::success(sourcemap, file.checksum, &result);
                to_json(&report)
            } else {
                result.text
            };
            write_output(&output, args.output.as_deref());
        }
        Err(err) => {
            if args.json {
                let report = RemapReport::failure(sourcemap, err.to_string());
                write_output(&to_json(&report), args.output.as_deref());
            } else {
                eprintln!("Error: {}", err);
            }
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<(RemapResult, SourceMapFile), RemapError> {
    let scanner = PositionScanner::new(args.ext.as_slice())?;

    // Validate the map before blocking on stdin
    let file = read_source_map(&args.sourcemap)?;
    let table = SourceMapTable::from_file(&file)?;

    let message = read_message(&args.message)?;
    let result = remap_with(&message, &scanner, &table)?;

    tracing::info!(
        mapped = result.mapped_count,
        unmapped = result.unmapped_count,
        "remapped message"
    );

    Ok((result, file))
}

/// Take the message from the argument, or from stdin when it is `-`
fn read_message(arg: &str) -> Result<String, RemapError> {
    if arg != "-" {
        return Ok(arg.to_string());
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|source| RemapError::Io {
            path: PathBuf::from("<stdin>"),
            source,
        })?;

    let trimmed = buffer
        .strip_suffix("\r\n")
        .or_else(|| buffer.strip_suffix('\n'))
        .unwrap_or(&buffer);
    Ok(trimmed.to_string())
}

fn display_path(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

fn to_json(report: &RemapReport) -> String {
    serde_json::to_string_pretty(report)
        .unwrap_or_else(|_| r#"{"success": false, "error": "Failed to serialize report"}"#.to_string())
}

/// Write to file or stdout
fn write_output(output: &str, output_path: Option<&Path>) {
    if let Some(path) = output_path {
        if let Err(e) = fs::write(path, output) {
            eprintln!("Failed to write output to '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    } else {
        println!("{}", output);
    }
}
