use std::process;

use clap::Parser;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use blockgraph::Program;
use blockgraph::block::Block;
use generator::Generator;

#[derive(Parser)]
#[command(name = "hotblocks", version, about = "AutoHotkey code generator for block programs")]
struct Cli {
    /// Workspace file to generate code from (JSON block-graph export)
    file: String,

    /// Write the generated code to a file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Validate the workspace only (exit 0 if every block kind is known)
    #[arg(long)]
    check: bool,

    /// Count list and text indices from 1 instead of 0
    #[arg(long)]
    one_based_index: bool,

    /// Dump the parsed block graph
    #[arg(long)]
    dump: bool,

    /// Disable colored error output
    #[arg(long)]
    no_color: bool,
}

fn main() {
    let cli = Cli::parse();
    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    // Read source
    let source = match std::fs::read_to_string(&cli.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", cli.file, e);
            process::exit(1);
        }
    };

    // Set up codespan file database
    let mut files = SimpleFiles::new();
    files.add(cli.file.clone(), source.clone());

    // Parse
    let program = match Program::from_json(&source) {
        Ok(p) => p,
        Err(error) => {
            let writer = StandardStream::stderr(color_choice);
            let config = term::Config::default();
            let diagnostic = error.to_diagnostic();
            let _ = term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
            process::exit(1);
        }
    };

    // --dump: print the parsed graph
    if cli.dump {
        println!("{:#?}", program);
        return;
    }

    // --check: verify every block kind has a rule, generate nothing
    if cli.check {
        let mut unknown = Vec::new();
        for block in &program.blocks {
            collect_unknown_kinds(block, &mut unknown);
        }
        if unknown.is_empty() {
            eprintln!("ok: {} validated successfully", cli.file);
            return;
        }
        for kind in &unknown {
            eprintln!("error: no rule to generate code for block kind '{}'", kind);
        }
        process::exit(1);
    }

    // Generate
    let mut generator = Generator::new();
    generator.one_based_index = cli.one_based_index;
    let code = match generator.workspace_to_code(&program) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("generation error: {}", error);
            process::exit(1);
        }
    };

    match cli.output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, code) {
                eprintln!("error: cannot write '{}': {}", path, e);
                process::exit(1);
            }
        }
        None => print!("{}", code),
    }
}

/// Walk a chain and everything connected to it, recording block kinds the
/// rule table does not know.
fn collect_unknown_kinds(block: &Block, out: &mut Vec<String>) {
    if generator::rules::rule_for(&block.kind).is_none() && !out.contains(&block.kind) {
        out.push(block.kind.clone());
    }
    for child in block.values.values() {
        collect_unknown_kinds(child, out);
    }
    for child in block.statements.values() {
        collect_unknown_kinds(child, out);
    }
    if let Some(next) = block.next_block() {
        collect_unknown_kinds(next, out);
    }
}
