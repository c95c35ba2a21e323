//! hocrflow CLI - hOCR column reconstruction tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use hocrflow::render::{self, JsonFormat, RenderOptions};
use hocrflow::{PageSelection, ParseOptions, Volume};

#[derive(Parser)]
#[command(name = "hocrflow")]
#[command(version)]
#[command(about = "Repair and segment bilingual hOCR pages into XML, text, and JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Input hOCR page file, or a directory of page files
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Page range for directories (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Keep fused lines as the OCR engine produced them
    #[arg(long)]
    no_repair: bool,

    /// Skip malformed pages and attributes instead of failing
    #[arg(long)]
    lenient: bool,

    /// Load pages one at a time instead of in parallel
    #[arg(long)]
    sequential: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render primary-script columns as XML
    Xml {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Render every non-empty column, not only primary-script ones
        #[arg(long)]
        all_columns: bool,
    },

    /// Render primary-script columns as plain text
    Text {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Render every non-empty column, not only primary-script ones
        #[arg(long)]
        all_columns: bool,
    },

    /// Write a JSON layout report
    Json {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show page, line and column statistics
    Info {
        #[command(flatten)]
        input: InputArgs,
    },

    /// List detected titles and names
    Titles {
        #[command(flatten)]
        input: InputArgs,

        /// Output titles as JSON
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
        Commands::Xml {
            input,
            output,
            all_columns,
        } => cmd_xml(&input, output.as_deref(), all_columns),
        Commands::Text {
            input,
            output,
            all_columns,
        } => cmd_text(&input, output.as_deref(), all_columns),
        Commands::Json {
            input,
            output,
            compact,
        } => cmd_json(&input, output.as_deref(), compact),
        Commands::Info { input } => cmd_info(&input),
        Commands::Titles { input, json } => cmd_titles(&input, json),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn parse_options(args: &InputArgs) -> Result<ParseOptions, Box<dyn std::error::Error>> {
    let page_selection = if let Some(p) = args.pages.as_deref() {
        PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?
    } else {
        PageSelection::All
    };

    let mut options = ParseOptions::new()
        .with_pages(page_selection)
        .with_repair(!args.no_repair);
    if args.lenient {
        options = options.lenient();
    }
    if args.sequential {
        options = options.sequential();
    }
    Ok(options)
}

/// Load INPUT as a volume: a directory of pages, or a single page file.
fn load(args: &InputArgs, options: &ParseOptions) -> Result<Volume, Box<dyn std::error::Error>> {
    let input = args.input.as_path();

    if input.is_dir() {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Loading {}...", input.display()));

        let volume = Volume::from_dir(input, options);
        pb.finish_and_clear();
        Ok(volume?)
    } else {
        let name = input
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();
        let page = hocrflow::parse_file_with_options(input, options.clone())?;
        debug!("Parsed {} as a single page", input.display());
        Ok(Volume::from_pages(name, vec![page]))
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn render_options(all_columns: bool) -> RenderOptions {
    if all_columns {
        RenderOptions::new().all_columns()
    } else {
        RenderOptions::new()
    }
}

fn cmd_xml(
    input: &InputArgs,
    output: Option<&Path>,
    all_columns: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = parse_options(input)?;
    let volume = load(input, &options)?;
    let render_options = render_options(all_columns);

    let xml = if input.input.is_dir() {
        render::volume_to_xml(&volume, &render_options)?
    } else {
        let mut out = String::new();
        for page in volume.pages() {
            out.push_str(&render::to_xml(page, &render_options)?);
        }
        out
    };

    write_output(output, xml.trim_end())
}

fn cmd_text(
    input: &InputArgs,
    output: Option<&Path>,
    all_columns: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = parse_options(input)?;
    let volume = load(input, &options)?;

    let text = render::volume_to_text(&volume, &render_options(all_columns))?;

    write_output(output, &text)
}

fn cmd_json(
    input: &InputArgs,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = parse_options(input)?;
    let volume = load(input, &options)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = if input.input.is_dir() {
        render::volume_to_json(&volume, format)?
    } else {
        match volume.pages().first() {
            Some(page) => render::to_json(page, format)?,
            None => render::volume_to_json(&volume, format)?,
        }
    };

    write_output(output, &json)
}

fn cmd_info(input: &InputArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Repair after loading so the number of repaired lines can be reported
    let options = parse_options(input)?.with_repair(false);
    let mut volume = load(input, &options)?;

    let detected: usize = volume.pages().iter().map(|p| p.fused_lines().len()).sum();
    let repaired = if input.no_repair {
        0
    } else {
        volume.repair_fused_lines()?
    };

    println!("{}", "Volume Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Input".bold(), input.input.display());
    println!("{}: {}", "Name".bold(), volume.name());
    println!("{}: {}", "Pages".bold(), volume.page_count());

    let blank = volume.pages().iter().filter(|p| p.is_blank()).count();
    let lines: usize = volume.pages().iter().map(|p| p.lines().len()).sum();
    let words: usize = volume.pages().iter().map(|p| p.words().len()).sum();

    println!("{}: {}", "Blank pages".bold(), blank);
    println!("{}: {}", "Lines".bold(), lines);
    println!("{}: {}", "Words".bold(), words);
    println!("{}: {}", "Fused lines detected".bold(), detected);
    println!("{}: {}", "Fused lines repaired".bold(), repaired);

    println!();
    println!("{}", "Pages".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for page in volume.pages() {
        if page.is_blank() {
            println!("{} {}", format!("{:>5}", page.number()).bold(), "blank".dimmed());
            continue;
        }

        let columns: Vec<String> = page
            .columns()
            .iter()
            .filter(|c| !c.is_empty())
            .map(|c| {
                let percent = c.percent_primary(page.tree(), page.options().primary_threshold);
                format!(
                    "{} {} lines {}%{}",
                    c.side,
                    c.len(),
                    percent,
                    c.number
                        .as_deref()
                        .map(|n| format!(" [{}]", n))
                        .unwrap_or_default()
                )
            })
            .collect();

        println!(
            "{} {} lines | {}",
            format!("{:>5}", page.number()).bold(),
            page.lines().len(),
            columns.join(" | ")
        );
        if let Some(head) = page.running_head_text() {
            println!("      {} {}", "head:".dimmed(), head);
        }
    }

    Ok(())
}

fn cmd_titles(input: &InputArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let options = parse_options(input)?;
    let volume = load(input, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&titles_report(&volume))?);
        return Ok(());
    }

    let mut count = 0;
    for page in volume.pages() {
        for title in page.title_strings() {
            println!("{} {}", format!("{:>5}", page.number()).bold(), title);
            count += 1;
        }
        for name in page.names_in_titles() {
            println!(
                "{} {} {}",
                format!("{:>5}", page.number()).bold(),
                "name:".dimmed(),
                page.line_text(name).trim()
            );
        }
    }

    println!("\n{} {} titles found", "Done!".green().bold(), count);

    Ok(())
}

/// Titles and names per page, skipping pages with neither.
fn titles_report(volume: &Volume) -> Vec<serde_json::Value> {
    volume
        .pages()
        .iter()
        .filter_map(|p| {
            let titles = p.title_strings();
            let names: Vec<String> = p
                .names_in_titles()
                .into_iter()
                .map(|l| p.line_text(l).trim().to_string())
                .collect();
            if titles.is_empty() && names.is_empty() {
                return None;
            }
            Some(serde_json::json!({
                "page": p.number(),
                "titles": titles,
                "names": names,
            }))
        })
        .collect()
}

fn cmd_version() {
    println!("{} {}", "hocrflow".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("hOCR column reconstruction tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const NAME_ONLY: &str = "<div class='ocr_page' title='bbox 0 0 2000 3000'>\
        <span class='ocr_line' title='bbox 100 100 600 130'>\
          <span class='ocrx_word' title='bbox 100 100 600 130'>ΒΑΣΙΛΕΙΟΥ</span></span>\
        <span class='ocr_line' style='font-size:12pt;font-style:bold' title='bbox 750 150 1250 190'>\
          <span class='ocrx_word' title='bbox 750 150 980 190'>SANCTI</span> \
          <span class='ocrx_word' title='bbox 1000 150 1250 190'>BASILII</span></span>\
        <span class='ocr_line' title='bbox 100 700 1900 740'>\
          <span class='ocrx_word' title='bbox 100 700 1900 740'>λόγος</span></span>\
        </div>";
    const BLANK: &str = "<div class='ocr_page' title='bbox 0 0 2000 3000'></div>";

    #[test]
    fn test_titles_report_keeps_name_only_pages() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("page_0001.html"), NAME_ONLY).unwrap();
        fs::write(dir.path().join("page_0002.html"), BLANK).unwrap();

        let volume = Volume::from_dir(dir.path(), &ParseOptions::default()).unwrap();
        let report = titles_report(&volume);

        assert_eq!(report.len(), 1);
        assert_eq!(report[0]["page"], 1);
        assert_eq!(report[0]["titles"], serde_json::json!([]));
        assert_eq!(report[0]["names"], serde_json::json!(["SANCTI BASILII"]));
    }

    #[test]
    fn test_parse_options_from_flags() {
        let cli = Cli::parse_from([
            "hocrflow",
            "text",
            "vol",
            "--pages",
            "2-3",
            "--no-repair",
            "--lenient",
        ]);
        let Commands::Text { input, .. } = cli.command else {
            panic!("expected the text command");
        };
        let options = parse_options(&input).unwrap();

        assert!(!options.repair_fused_lines);
        assert!(options.pages.includes(2));
        assert!(!options.pages.includes(4));
    }
}
