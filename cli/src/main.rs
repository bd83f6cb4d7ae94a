mod config;
mod output;
mod test_runner;

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

use emitter::{DEFAULT_TITLE, RenderOptions, StylesheetMode};
use marksmith::MarkupError;

use crate::config::Config;

const SUBCOMMANDS: &[&str] = &["render", "test", "help"];

#[derive(Parser)]
#[command(name = "marksmith", version, about = "Render marksmith documents to HTML")]
struct Cli {
    /// Disable colored diagnostic output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a document to an HTML file
    Render(RenderArgs),

    /// Run .test.md fixture files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Source document
    input: PathBuf,

    /// Stylesheets to link to (or embed), in order
    stylesheets: Vec<PathBuf>,

    /// Copy stylesheet contents into the page instead of linking them
    #[arg(short, long)]
    embed_styles: bool,

    /// Never replace an existing output file; pick name_1.htm, name_2.htm, ...
    #[arg(short, long)]
    no_overwrite: bool,

    /// Write the page to stdout instead of a file
    #[arg(short = 'o', long, conflicts_with = "output")]
    stdout: bool,

    /// Report what is being linked, embedded and written
    #[arg(short, long)]
    verbose: bool,

    /// Output file (default: the input path with an .htm extension)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Config file (default: marksmith.toml in the working directory, if any)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.md file or directory containing them
    path: PathBuf,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    let cli = Cli::parse_from(with_default_subcommand(std::env::args().collect()));

    let verbose = matches!(&cli.command, Command::Render(args) if args.verbose);
    init_logging(verbose);

    match cli.command {
        Command::Render(render_args) => do_render(render_args, cli.no_color),
        Command::Test(test_args) => {
            if test_args.list_categories {
                test_runner::list_categories(&test_args.path);
                return;
            }
            let exit_code =
                test_runner::run_tests(&test_args.path, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

/// `marksmith page.md style.css` means `marksmith render page.md style.css`.
fn with_default_subcommand(mut args: Vec<String>) -> Vec<String> {
    let first_positional = args.iter().skip(1).find(|arg| !arg.starts_with('-'));
    if first_positional.is_some_and(|arg| !SUBCOMMANDS.contains(&arg.as_str())) {
        args.insert(1.min(args.len()), "render".to_string());
    }
    args
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn do_render(args: RenderArgs, no_color: bool) {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };
    let options = render_options(&args, &config);

    let source = match fs::read(&args.input) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(args.input.display().to_string(), source.clone());

    let result = if args.stdout {
        let stdout = io::stdout();
        emitter::render_document(source.as_bytes(), &mut stdout.lock(), &options, file_id)
    } else {
        let path = output_target(&args, &config);
        let file = match File::create(&path) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("error: cannot open '{}' for writing: {}", path.display(), e);
                process::exit(1);
            }
        };
        tracing::info!(
            path = %path.display(),
            embed = options.stylesheet_mode == StylesheetMode::Embed,
            "writing output"
        );
        emitter::render_document(source.as_bytes(), &mut BufWriter::new(file), &options, file_id)
    };

    match result {
        Ok(diagnostics) => {
            let writer = StandardStream::stderr(color_choice);
            emit_diagnostics(&writer, &files, &diagnostics);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

/// Command-line flags switch features on over the config file; stylesheets
/// from both are combined, config first.
fn render_options(args: &RenderArgs, config: &Config) -> RenderOptions {
    let stylesheets = config
        .stylesheets
        .iter()
        .chain(&args.stylesheets)
        .cloned()
        .collect();
    let stylesheet_mode = if args.embed_styles || config.embed_styles {
        StylesheetMode::Embed
    } else {
        StylesheetMode::Link
    };
    RenderOptions {
        default_title: config
            .default_title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        stylesheets,
        stylesheet_mode,
    }
}

fn output_target(args: &RenderArgs, config: &Config) -> PathBuf {
    if let Some(path) = &args.output {
        return path.clone();
    }
    let extension = config
        .extension
        .as_deref()
        .map(|ext| ext.trim_start_matches('.'))
        .unwrap_or(output::DEFAULT_EXTENSION);
    if args.no_overwrite || config.no_overwrite {
        output::free_output_path(&args.input, extension)
    } else {
        output::output_path(&args.input, extension)
    }
}

fn emit_diagnostics(
    writer: &StandardStream,
    files: &SimpleFiles<String, String>,
    diagnostics: &[MarkupError],
) {
    let config = term::Config::default();
    for diagnostic in diagnostics {
        let _ = term::emit_to_write_style(
            &mut writer.lock(),
            &config,
            files,
            &diagnostic.to_diagnostic(),
        );
    }
}
