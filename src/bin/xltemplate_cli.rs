//! CLI tool for xltemplate - renders a template to XLSX
//!
//! Usage:
//!   xltemplate_cli <template.xml> -o out.xlsx                 # Render with an empty model
//!   xltemplate_cli <template.xml> --model data.json -o out.xlsx
//!   xltemplate_cli <template.xml> --options opts.json --json  # Dump the grids as JSON
//!   xltemplate_cli <template.xml> -o out.xlsx -vv             # Debug logging

#![allow(clippy::exit)]

use std::env;
use std::fs;
use std::io::{self, Write};

use tracing::metadata::LevelFilter;
use xltemplate::{export, render_document, EmptyModel, RenderOptions};

struct Args {
    template: String,
    model: Option<String>,
    options: Option<String>,
    output: Option<String>,
    json: bool,
    verbosity: u8,
}

fn usage() -> ! {
    eprintln!(
        "Usage: xltemplate_cli <template.xml> [--model data.json] [--options opts.json] \
         [-o out.xlsx] [--json] [-v|-vv]"
    );
    std::process::exit(1);
}

fn parse_args() -> Args {
    let mut args = env::args().skip(1);
    let mut parsed = Args {
        template: String::new(),
        model: None,
        options: None,
        output: None,
        json: false,
        verbosity: 0,
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--model" => parsed.model = Some(args.next().unwrap_or_else(|| usage())),
            "--options" => parsed.options = Some(args.next().unwrap_or_else(|| usage())),
            "-o" => parsed.output = Some(args.next().unwrap_or_else(|| usage())),
            "--json" => parsed.json = true,
            "-v" => parsed.verbosity = parsed.verbosity.max(1),
            "-vv" => parsed.verbosity = 2,
            "-h" | "--help" => usage(),
            _ if parsed.template.is_empty() && !arg.starts_with('-') => parsed.template = arg,
            _ => usage(),
        }
    }
    if parsed.template.is_empty() {
        usage();
    }
    parsed
}

fn read(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn main() {
    let args = parse_args();

    let level = match args.verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    tracing_subscriber::fmt()
        .without_time()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let options = match args.options.as_deref().map(read) {
        Some(json) => match RenderOptions::from_json(&json) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("Error reading options: {e}");
                std::process::exit(1);
            }
        },
        None => RenderOptions::default(),
    };

    let model: Option<serde_json::Value> = match args.model.as_deref().map(read) {
        Some(json) => match serde_json::from_str(&json) {
            Ok(v) => Some(v),
            Err(e) => {
                eprintln!("Error parsing model: {e}");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let template = read(&args.template);
    let rendered = match &model {
        Some(model) => render_document(&template, model, &options),
        None => render_document(&template, &EmptyModel, &options),
    };
    let document = match rendered {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error rendering {}: {e}", args.template);
            std::process::exit(1);
        }
    };

    let bytes = if args.json {
        document.to_json().map(String::into_bytes)
    } else {
        export::write_xlsx(&document)
    };
    let bytes = match bytes {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error writing output: {e}");
            std::process::exit(1);
        }
    };

    match args.output {
        Some(path) => {
            if let Err(e) = fs::write(&path, &bytes) {
                eprintln!("Error writing {path}: {e}");
                std::process::exit(1);
            }
            eprintln!("Written: {path}");
        }
        None if args.json => {
            let mut stdout = io::stdout();
            if stdout.write_all(&bytes).and_then(|()| writeln!(stdout)).is_err() {
                std::process::exit(1);
            }
        }
        None => {
            eprintln!("Refusing to write XLSX to stdout; pass -o <file>");
            std::process::exit(1);
        }
    }
}
