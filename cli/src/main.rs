//! retex CLI - wiki-flavored LaTeX rewriting tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use retex::PipelineOptions;

#[derive(Parser)]
#[command(name = "retex")]
#[command(author = "retexlab")]
#[command(version)]
#[command(about = "Rewrite converter-generated wiki LaTeX into compilable LaTeX", long_about = None)]
struct Cli {
    /// Input .tex file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (input is overwritten if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Template to splice the processed body into
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a document (default when a file is given)
    Process {
        /// Input .tex file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (input is overwritten if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Template to splice the processed body into; becomes the default
        /// output path
        #[arg(long, value_name = "FILE")]
        template: Option<PathBuf>,

        /// Source note whose filename namespaces same-document labels
        #[arg(long, value_name = "FILE")]
        source_note: Option<PathBuf>,

        /// Copy image assets from the search roots into figures/ first
        #[arg(long)]
        copy_assets: bool,

        /// Do not insert page breaks before sections
        #[arg(long)]
        no_page_breaks: bool,
    },

    /// Process every .tex file in a directory, in place
    Batch {
        /// Directory containing .tex files
        #[arg(value_name = "DIR", default_value = "content")]
        dir: PathBuf,

        /// Do not insert page breaks before sections
        #[arg(long)]
        no_page_breaks: bool,
    },

    /// Splice an already-processed body into a template
    Inject {
        /// Processed body file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Template with injection markers
        #[arg(long, value_name = "FILE")]
        template: PathBuf,

        /// Output file (template is overwritten if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Report artifact counts without rewriting
    Info {
        /// Input .tex file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Process {
            input,
            output,
            template,
            source_note,
            copy_assets,
            no_page_breaks,
        }) => cmd_process(
            &input,
            output.as_deref(),
            template.as_deref(),
            source_note.as_deref(),
            copy_assets,
            no_page_breaks,
        ),
        Some(Commands::Batch {
            dir,
            no_page_breaks,
        }) => cmd_batch(&dir, no_page_breaks),
        Some(Commands::Inject {
            input,
            template,
            output,
        }) => cmd_inject(&input, &template, output.as_deref()),
        Some(Commands::Info { input, json }) => cmd_info(&input, json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: process if an input is provided
            if let Some(input) = cli.input {
                cmd_process(
                    &input,
                    cli.output.as_deref(),
                    cli.template.as_deref(),
                    None,
                    false,
                    false,
                )
            } else {
                println!("{}", "Usage: retex <FILE> [-o OUTPUT]".yellow());
                println!("       retex --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_process(
    input: &Path,
    output: Option<&Path>,
    template: Option<&Path>,
    source_note: Option<&Path>,
    copy_assets: bool,
    no_page_breaks: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if copy_assets {
        let roots: Vec<String> = retex::IMAGE_ROOTS.iter().map(|root| root.to_string()).collect();
        let copied = retex::copy_assets(&roots, Path::new(retex::IMAGE_DEFAULT_ROOT))?;
        println!(
            "{} {} assets into {}/",
            "Copied".green(),
            copied,
            retex::IMAGE_DEFAULT_ROOT
        );
    }

    let mut options = PipelineOptions::new().with_page_breaks(!no_page_breaks);
    if let Some(note) = source_note {
        options = options.with_source_note(note);
    }

    let text = retex::read_document(input)?;
    let processed = retex::Pipeline::new(options).process(&text);

    match template {
        Some(template_path) => {
            let template_text = retex::read_document(template_path)?;
            let merged = retex::inject_body(&template_text, &processed)?;
            let out = output.unwrap_or(template_path);
            fs::write(out, merged)?;
            println!("{} {}", "Updated".green(), out.display());
        }
        None => {
            let out = output.unwrap_or(input);
            fs::write(out, processed)?;
            println!("{} {}", "Processed".green(), out.display());
        }
    }

    Ok(())
}

fn cmd_batch(dir: &Path, no_page_breaks: bool) -> Result<(), Box<dyn std::error::Error>> {
    let options = PipelineOptions::new().with_page_breaks(!no_page_breaks);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Processing {}", dir.display()));

    let files = retex::process_dir(dir, &options)?;
    pb.finish_and_clear();

    for file in &files {
        println!("  {} {}", "✓".green(), file.display());
    }
    println!(
        "\n{} {} documents processed",
        "Done!".green().bold(),
        files.len()
    );

    Ok(())
}

fn cmd_inject(
    input: &Path,
    template: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let body = retex::read_document(input)?;
    let template_text = retex::read_document(template)?;
    let merged = retex::inject_body(&template_text, &body)?;

    let out = output.unwrap_or(template);
    fs::write(out, merged)?;
    println!("{} {}", "Updated".green(), out.display());

    Ok(())
}

fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = retex::read_document(input)?;
    let stats = retex::scan_artifacts(&text);

    if json {
        println!("{}", stats.to_json()?);
        return Ok(());
    }

    println!("{}", "Wiki Artifacts".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    print_stat("Escaped brackets", stats.escaped_brackets);
    print_stat("Embedded images", stats.embedded_images);
    print_stat("Wiki links", stats.wiki_links);
    print_stat("Long tables", stats.long_tables);
    print_stat("Literal headings", stats.literal_headings);
    print_stat("Arrow glyphs", stats.arrow_glyphs);
    print_stat("Display math", stats.display_math);
    println!();

    if stats.is_clean() {
        println!("{}", "Document is clean, nothing to rewrite".green());
    } else {
        println!(
            "{} {} artifacts to rewrite",
            "Found".yellow(),
            stats.total()
        );
    }

    Ok(())
}

fn print_stat(name: &str, count: usize) {
    println!("{}: {}", name.bold(), count);
}

fn cmd_version() {
    println!("{} {}", "retex".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Wiki-flavored LaTeX rewriting tool");
    println!();
    println!(
        "Repository: {}",
        "https://github.com/retexlab/retex".dimmed()
    );
    println!("License: MIT");
}
