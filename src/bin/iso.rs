/// ISO image extraction tool and interactive console

use clap::Parser;
use isoextract::*;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Extract the contents of an ISO9660 image
#[derive(Debug, Parser)]
#[command(name = "iso", version, about)]
struct Args {
    /// Image to extract; starts the interactive console when omitted
    image: Option<PathBuf>,

    /// Output directory (default: <name>_extracted_<timestamp>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip entries that fail to extract instead of aborting
    #[arg(long)]
    skip_errors: bool,

    /// Maximum directory nesting depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Do not overwrite existing files in the output directory
    #[arg(long)]
    no_clobber: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn options(&self) -> ExtractOptions {
        ExtractOptions::builder()
            .max_depth(self.max_depth)
            .skip_errors(self.skip_errors)
            .overwrite(!self.no_clobber)
            .build()
    }
}

/// Command completer for the REPL
struct CommandCompleter {
    commands: Vec<&'static str>,
}

impl CommandCompleter {
    fn new() -> Self {
        Self {
            commands: vec![
                "cat", "dir", "exit", "export", "extract", "help", "info", "load", "ls", "open",
                "quit", "tree",
            ],
        }
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Only complete the first word (command name)
        let line_to_cursor = &line[..pos];
        if line_to_cursor.contains(' ') {
            return Ok((pos, vec![]));
        }

        let prefix = line_to_cursor.to_lowercase();
        let matches: Vec<Pair> = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(&prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// An image opened in the console
struct OpenImage {
    path: PathBuf,
    fs: IsoFileSystem<File>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match &args.image {
        Some(image) => run_extract(image, &args),
        None => run_console(args.options()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Extract a whole image and print a summary
fn run_extract(image: &Path, args: &Args) -> Result<()> {
    let out_dir = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_dir(image));

    let mut fs = IsoFileSystem::open(image)?;
    let image_size = fs.info().image_size;

    let mut extractor = Extractor::new(args.options()).on_file(print_extracted);
    let result = extractor.extract_image(&mut fs, &out_dir);
    let summary = extractor.into_summary();
    result?;

    print_summary(image_size, &summary, &out_dir);
    Ok(())
}

fn print_extracted(file: &ExtractedFile) {
    println!("Extracted: {} ({} bytes)", file.path.display(), file.size);
}

/// `<stem>_extracted_<YYYYmmdd_HHMMSS>` in the current directory
fn default_output_dir(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("{}_extracted_{}", stem, timestamp))
}

fn print_summary(image_size: u64, summary: &ExtractSummary, out_dir: &Path) {
    let ratio = summary.ratio(image_size);

    println!("\nExtraction Summary");
    println!(
        "Original ISO size: {:.3} GB ({} bytes)",
        image_size as f64 / BYTES_PER_GB,
        image_size
    );
    println!(
        "Total extracted size: {:.3} GB ({} bytes)",
        summary.total_bytes as f64 / BYTES_PER_GB,
        summary.total_bytes
    );
    println!("Files: {}, directories: {}", summary.files.len(), summary.directories);
    println!("Extraction ratio: {:.4} ({:.2}%)", ratio, ratio * 100.0);
    println!("Output folder: {}", out_dir.display());

    if !summary.skipped.is_empty() {
        println!("\nSkipped {} entries:", summary.skipped.len());
        for skipped in &summary.skipped {
            println!("  {}: {}", skipped.path.display(), skipped.error);
        }
    }
}

/// Get the path to the history file
fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|mut p| {
        p.push(".isoextract_history");
        p
    })
}

fn run_console(options: ExtractOptions) -> Result<()> {
    println!("=== ISO Extract ===");
    println!("Interactive console for exploring ISO9660 disc images.");
    println!("Type 'help' for available commands\n");

    let mut rl = Editor::new().map_err(|e| {
        IsoError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
    })?;
    rl.set_helper(Some(CommandCompleter::new()));

    if let Some(history_path) = history_path() {
        let _ = rl.load_history(&history_path);
    }

    let mut image: Option<OpenImage> = None;

    loop {
        let input = match rl.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let _ = rl.add_history_entry(input);

        let parts = parse_command_line(input);
        if parts.is_empty() {
            continue;
        }
        let command = parts[0].to_lowercase();

        match command.as_str() {
            "help" => print_help(),
            "quit" | "exit" => break,
            "open" | "load" => {
                if parts.len() < 2 {
                    println!("Usage: open <path>");
                    continue;
                }
                match IsoFileSystem::open(&parts[1]) {
                    Ok(fs) => {
                        println!("Opened: {}", parts[1]);
                        image = Some(OpenImage {
                            path: PathBuf::from(&parts[1]),
                            fs,
                        });
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "info" => match image {
                Some(ref img) => print_info(img),
                None => println!("No image loaded."),
            },
            "ls" | "dir" => match image {
                Some(ref mut img) => {
                    let path = parts.get(1).map(String::as_str).unwrap_or("/");
                    match img.fs.read_dir(path) {
                        Ok(entries) => list_entries(&entries),
                        Err(e) => println!("Error: {}", e),
                    }
                }
                None => println!("No image loaded."),
            },
            "tree" => match image {
                Some(ref mut img) => match img.fs.load_tree(options.max_depth) {
                    Ok(root) => {
                        print_tree(&root, 0);
                        println!(
                            "\n{} files, {} bytes",
                            root.file_count(),
                            root.total_size()
                        );
                    }
                    Err(e) => println!("Error: {}", e),
                },
                None => println!("No image loaded."),
            },
            "cat" => match image {
                Some(ref mut img) => {
                    if parts.len() < 2 {
                        println!("Usage: cat <path>");
                        continue;
                    }
                    let result = img.fs.lookup(&parts[1]).and_then(|entry| {
                        let mut data = Vec::new();
                        img.fs.entry_reader(&entry)?.take(512).read_to_end(&mut data)?;
                        Ok((data, entry.byte_length as usize))
                    });
                    match result {
                        Ok((data, size)) => print_hex_dump(&data, size),
                        Err(e) => println!("Error: {}", e),
                    }
                }
                None => println!("No image loaded."),
            },
            "export" => match image {
                Some(ref mut img) => {
                    if parts.len() < 2 {
                        println!("Usage: export <path> [host_path]");
                        continue;
                    }
                    let target = match parts.get(2) {
                        Some(p) => PathBuf::from(p),
                        None => {
                            let name = parts[1].rsplit('/').next().unwrap_or(&parts[1]);
                            PathBuf::from(name)
                        }
                    };
                    let result = img.fs.lookup(&parts[1]).and_then(|entry| {
                        let source = img.fs.entry_reader(&entry)?;
                        io::write_host_file(&target, source, options.overwrite)
                    });
                    match result {
                        Ok(size) => println!("Exported {} bytes to {}", size, target.display()),
                        Err(e) => println!("Error: {}", e),
                    }
                }
                None => println!("No image loaded."),
            },
            "extract" => match image {
                Some(ref mut img) => {
                    let out_dir = parts
                        .get(1)
                        .map(PathBuf::from)
                        .unwrap_or_else(|| default_output_dir(&img.path));
                    let image_size = img.fs.info().image_size;

                    let mut extractor = Extractor::new(options.clone()).on_file(print_extracted);
                    let result = extractor.extract_image(&mut img.fs, &out_dir);
                    let summary = extractor.into_summary();
                    match result {
                        Ok(_) => print_summary(image_size, &summary, &out_dir),
                        Err(e) => println!(
                            "Error after {} files: {}",
                            summary.files.len(),
                            e
                        ),
                    }
                }
                None => println!("No image loaded."),
            },
            _ => {
                println!("Unknown command: {}. Type 'help' for available commands.", command);
            }
        }
    }

    if let Some(history_path) = history_path() {
        let _ = rl.save_history(&history_path);
    }
    println!("Goodbye!");
    Ok(())
}

/// Parse command line input, respecting quoted strings
fn parse_command_line(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
            }
            ' ' | '\t' if !in_quotes => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            _ => {
                current.push(ch);
            }
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }

    parts
}

fn print_help() {
    println!("Available commands:");
    println!("  open <path>                 - Open an ISO image (use quotes for paths with spaces)");
    println!("  info                        - Show volume information");
    println!("  ls [path]                   - List a directory (default: /)");
    println!("  tree                        - Show the full directory tree");
    println!("  cat <path>                  - Hex dump the start of a file");
    println!("  export <path> [host_path]   - Copy one file to the host filesystem");
    println!("  extract [output_dir]        - Extract the whole image");
    println!("  help                        - Show this help");
    println!("  quit, exit                  - Exit");
}

fn print_info(image: &OpenImage) {
    let info = image.fs.info();
    println!("Filename: {}", image.path.display());
    println!("Volume ID: {}", info.volume_id);
    println!("System ID: {}", info.system_id);
    println!(
        "Volume size: {} blocks of {} bytes",
        info.volume_space_size, info.logical_block_size
    );
    println!("Image size: {} bytes", info.image_size);
    println!(
        "Root directory: sector {}, {} bytes",
        image.fs.root().extent_location,
        image.fs.root().byte_length
    );
}

fn list_entries(entries: &[DirectoryEntry]) {
    for entry in entries {
        if entry.is_directory {
            println!("  <DIR>       {}", entry.name);
        } else {
            println!("  {:>10}  {}", entry.byte_length, entry.name);
        }
    }
    println!("\n{} entries.", entries.len());
}

fn print_tree(entry: &DirectoryEntry, depth: usize) {
    for child in &entry.children {
        let indent = "  ".repeat(depth);
        if child.is_directory {
            println!("{}{}/", indent, child.name);
            print_tree(child, depth + 1);
        } else {
            println!("{}{} ({} bytes)", indent, child.name, child.byte_length);
        }
    }
}

/// Dump `data`, the first bytes of a `total`-byte file
fn print_hex_dump(data: &[u8], total: usize) {
    for (row, chunk) in data.chunks(16).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{:02X}", b)).collect();
        let ascii: String = chunk
            .iter()
            .map(|&b| if (0x20..0x7F).contains(&b) { b as char } else { '.' })
            .collect();
        println!("{:04X}: {:<48} {}", row * 16, hex.join(" "), ascii);
    }

    if total > data.len() {
        println!("... ({} more bytes)", total - data.len());
    }
}
