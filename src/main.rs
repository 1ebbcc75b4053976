//! Enrollstat CLI - analyze course enrollment rosters
//!
//! # Main Commands
//!
//! ```bash
//! enrollstat serve                      # Start HTTP server (port 3000)
//! enrollstat analyze roster.csv        # Print metrics + summary table
//! enrollstat report roster.csv         # Write the 4-sheet xlsx report
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! enrollstat parse roster.csv          # Just parse CSV to JSON rows
//! enrollstat default-config            # Print the default policy as JSON
//! ```

use clap::{Parser, Subcommand};
use enrollstat::{
    analyze_file, parse_file_auto, write_report_file, AnalysisResult, DedupKey, ReportConfig,
};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "enrollstat")]
#[command(about = "Analyze course enrollment rosters: dedup, per-subject statistics, xlsx report", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a CSV file and output the raw rows as JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the analysis pipeline and print metrics + summary
    Analyze {
        /// Input CSV file
        input: PathBuf,

        /// Policy config JSON file (default: built-in policy)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the dedup key (student-id | student-subject)
        #[arg(long)]
        dedup_key: Option<String>,

        /// Also write the xlsx report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the 4-sheet xlsx report
    Report {
        /// Input CSV file
        input: PathBuf,

        /// Policy config JSON file (default: built-in policy)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output xlsx path
        #[arg(short, long, default_value = enrollstat::REPORT_FILE_NAME)]
        output: PathBuf,
    },

    /// Print the default policy configuration as JSON
    DefaultConfig,

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Policy config JSON file (default: built-in policy)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Analyze {
            input,
            config,
            dedup_key,
            output,
        } => cmd_analyze(&input, config.as_deref(), dedup_key.as_deref(), output.as_deref()),

        Commands::Report {
            input,
            config,
            output,
        } => cmd_report(&input, config.as_deref(), &output),

        Commands::DefaultConfig => cmd_default_config(),

        Commands::Serve { port, config } => cmd_serve(port, config.as_deref()).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<ReportConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            let config = ReportConfig::from_file(p)?;
            eprintln!("Using config: {}", p.display());
            Ok(config)
        }
        None => Ok(ReportConfig::default()),
    }
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Parsing CSV: {}", input.display());

    let result = parse_file_auto(input)?;

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!(
        "   Delimiter: '{}'",
        match result.delimiter {
            '\t' => "\\t".to_string(),
            c => c.to_string(),
        }
    );
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("Parsed {} rows", result.rows.len());

    let rows: Vec<serde_json::Value> = result
        .rows
        .iter()
        .map(|row| {
            let obj: serde_json::Map<String, serde_json::Value> = result
                .headers
                .iter()
                .zip(row.iter())
                .map(|(h, v)| (h.clone(), json!(v)))
                .collect();
            serde_json::Value::Object(obj)
        })
        .collect();

    let json = serde_json::to_string_pretty(&rows)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_analyze(
    input: &Path,
    config_path: Option<&Path>,
    dedup_key: Option<&str>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config_path)?;

    if let Some(code) = dedup_key {
        config.dedup_key = DedupKey::from_code(code)
            .ok_or_else(|| format!("Unknown dedup key: {} (try student-id | student-subject)", code))?;
    }

    eprintln!("Analyzing: {}", input.display());
    let result = analyze_file(input, &config)?;

    print_summary(&result);

    if let Some(path) = output {
        write_report_file(&result, &config, path)?;
        eprintln!("\nReport written to: {}", path.display());
    }

    Ok(())
}

fn cmd_report(
    input: &Path,
    config_path: Option<&Path>,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;

    eprintln!("Analyzing: {}", input.display());
    let result = analyze_file(input, &config)?;

    write_report_file(&result, &config, output)?;
    eprintln!("Report written to: {}", output.display());

    Ok(())
}

fn cmd_default_config() -> Result<(), Box<dyn std::error::Error>> {
    let config = ReportConfig::default();
    println!("{}", config.to_json()?);
    Ok(())
}

async fn cmd_serve(
    port: u16,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    enrollstat::server::start_server(port, config).await
}

fn print_summary(result: &AnalysisResult) {
    let m = &result.metrics;

    eprintln!();
    eprintln!("Metrics");
    eprintln!("   Enrollment rows:       {}", m.total_rows);
    eprintln!("   Distinct completers:   {}", m.unique_students);
    eprintln!("   First-year completers: {}", m.freshman_students);
    eprintln!("   Subjects:              {}", m.subject_count);
    eprintln!("   Sections offered:      {}", m.total_sections);

    eprintln!();
    eprintln!("Per-subject summary");
    eprintln!(
        "   {:<40} {:>8} {:>8} {:>8}",
        "subject", "sections", "total", "1st-year"
    );
    for row in &result.summary.rows {
        eprintln!(
            "   {:<40} {:>8} {:>8} {:>8}",
            row.subject, row.sections, row.total, row.freshmen
        );
    }
    let totals = &result.summary.totals;
    eprintln!(
        "   {:<40} {:>8} {:>8} {:>8}",
        totals.subject, totals.sections, totals.total, totals.freshmen
    );
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
