use clap::{Args, Parser, Subcommand};
use spanlight_scan::{highlight, HighlightError, HighlightOptions, Lang, Token, TokenSink};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spanlight")]
#[command(about = "spanlight: lexical syntax highlighting for XML, HTML, C, C++, JavaScript and JSON")]
#[command(version)]
struct Cli {
    /// Log scanner decisions (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ScanArgs {
    /// Input file
    path: String,

    /// Language selector; defaults to the file extension
    #[arg(short, long)]
    lang: Option<String>,

    /// Only recognize the canonical grammar of the language
    #[arg(long)]
    strict: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the tokens of a file, one per line
    Tokens {
        #[command(flatten)]
        scan: ScanArgs,

        /// Merge adjacent tokens of the same type
        #[arg(long)]
        coalesce: bool,
    },

    /// Check that a file can be fully highlighted; exits with the status
    /// code, or 4 if the file cannot be read
    Check {
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// List supported languages and their selectors
    Langs,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Tokens { scan, coalesce } => cmd_tokens(&scan, coalesce),
        Command::Check { scan } => cmd_check(&scan),
        Command::Langs => cmd_langs(),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Exit code for an input file that cannot be read. Codes 0 to 3 are the
/// highlighting statuses.
const EXIT_IO_ERROR: i32 = 4;

fn load_source(path: &str) -> Result<String, String> {
    let p = Path::new(path);
    if !p.exists() {
        return Err(format!("file not found: {path}"));
    }
    std::fs::read_to_string(p).map_err(|e| format!("reading {path}: {e}"))
}

fn read_source(path: &str) -> String {
    load_source(path).unwrap_or_else(|message| {
        eprintln!("Error: {message}");
        std::process::exit(EXIT_IO_ERROR);
    })
}

/// The `--lang` selector if given, otherwise the file extension.
fn resolve_lang(scan: &ScanArgs) -> Result<Lang, HighlightError> {
    let selector = match &scan.lang {
        Some(lang) => lang.as_str(),
        None => Path::new(&scan.path)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default(),
    };
    Ok(selector.parse()?)
}

/// Report `err` and exit with its status code.
fn fail(err: &HighlightError, path: &str) -> ! {
    eprintln!("Error: {path}: {err}");
    std::process::exit(i32::from(err.status() as u8));
}

/// `begin<TAB>length<TAB>id<TAB>text`, with the text escaped so that each
/// token stays on one line.
fn format_token(source: &str, token: &Token) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        token.begin,
        token.length,
        token.kind.as_str(),
        token.text(source).escape_debug()
    )
}

fn scan(scan: &ScanArgs, coalescing: bool) -> (String, TokenSink, Result<(), HighlightError>) {
    let lang = resolve_lang(scan).unwrap_or_else(|e| fail(&e, &scan.path));
    let source = read_source(&scan.path);
    tracing::debug!(path = %scan.path, %lang, bytes = source.len(), "highlighting file");
    let options = HighlightOptions {
        coalescing,
        strict: scan.strict,
    };

    let mut sink = TokenSink::with_capacity(source.len() / 4);
    let result = highlight(&mut sink, &source, lang, options);
    (source, sink, result)
}

fn cmd_tokens(args: &ScanArgs, coalesce: bool) {
    let (source, sink, result) = scan(args, coalesce);

    // On failure the tokens before the offending construct are still printed.
    let mut out = String::new();
    for token in &sink {
        out.push_str(&format_token(&source, token));
        out.push('\n');
    }
    print!("{out}");

    if let Err(e) = result {
        fail(&e, &args.path);
    }
}

fn cmd_check(args: &ScanArgs) {
    let (_, sink, result) = scan(args, false);
    if let Err(e) = result {
        fail(&e, &args.path);
    }
    eprintln!("OK: {} ({} tokens)", args.path, sink.len());
}

fn cmd_langs() {
    for lang in Lang::all() {
        println!("{lang}\t{}", lang.selectors().join(", "));
    }
}
