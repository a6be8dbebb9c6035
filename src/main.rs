use std::fs;
use std::path::Path;
use std::process::ExitCode;

use script_pad::app::domain::language;
use script_pad::app::services::highlight::to_ansi;
use script_pad::app::services::share::{document_from_share_url, share_url};
use script_pad::app::{Document, EditorSession, EditorSettings, JsonFileStore, Result};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: ScriptPad [FILE | --open LINK] [--lang TAG] [--share]";

#[derive(Default)]
struct Args {
    file: Option<String>,
    link: Option<String>,
    lang: Option<String>,
    share: bool,
}

fn parse_args() -> std::result::Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--lang" => args.lang = Some(iter.next().ok_or("--lang needs a value")?),
            "--open" => args.link = Some(iter.next().ok_or("--open needs a link")?),
            "--share" => args.share = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ if args.file.is_none() && !arg.starts_with('-') => args.file = Some(arg),
            _ => return Err(format!("unexpected argument: {}\n{}", arg, USAGE)),
        }
    }
    Ok(args)
}

fn load_file(path: &str, lang: Option<String>) -> Result<Document> {
    let content = fs::read_to_string(path)?;
    let language = lang
        .or_else(|| {
            Path::new(path)
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(language::language_for_extension)
                .map(|tag| tag.to_string())
        })
        .unwrap_or_else(|| language::DEFAULT_LANGUAGE.to_string());
    Ok(Document::new(content, language))
}

fn run(args: Args) -> Result<()> {
    let settings = EditorSettings::load();
    let store = JsonFileStore::default_location();

    let explicit = match (&args.file, &args.link) {
        (Some(path), _) => Some(load_file(path, args.lang.clone())?),
        (None, Some(link)) => document_from_share_url(link)?,
        (None, None) => None,
    };
    let mut session = match explicit {
        Some(doc) => EditorSession::with_document(doc, store, settings)?,
        None => EditorSession::open(store, settings)?,
    };
    if args.file.is_none() {
        if let Some(lang) = &args.lang {
            session.change_language(lang);
        }
    }

    if args.share {
        let url = share_url(&session.settings().share_base_url, session.document())?;
        println!("{}", url);
        return Ok(());
    }

    println!("== {} ==", session.file_name());
    session.run();
    for entry in session.output().all() {
        println!("{}", to_ansi(&entry.text));
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
