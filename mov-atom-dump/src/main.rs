// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use mov_atom::errors::Result;
use mov_atom::tree::walk;
use mov_atom::{write_file, Atom, AtomReader, ReaderOptions};

use clap::Parser;
use log::{error, info};

mod summary;

use summary::{kind_name, summarize, AtomNode};

/// Print the atom tree of a QuickTime or MP4 file.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Print the tree as JSON
    #[arg(long)]
    json: bool,

    /// The maximum number of nested containers
    #[arg(long, value_name = "N", default_value_t = 64)]
    max_depth: usize,

    /// The maximum size of an atom body held in memory
    #[arg(long, value_name = "BYTES")]
    max_payload: Option<u64>,

    /// Write the tree that was read to a new file, and verify it reads back identically
    #[arg(long, value_name = "OUT")]
    rewrite: Option<PathBuf>,

    /// The input file path
    input: PathBuf,
}

fn print_text(atoms: &[Atom]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let mut result = Ok(());

    walk(atoms, |node| {
        if result.is_err() {
            return;
        }

        let atom = node.atom();
        let indent = node.depth() * 2;

        let offset = match atom.header() {
            Some(header) => format!("@{:<10}", header.pos),
            None => String::new(),
        };

        let mut line = format!(
            "{}{:indent$}{} [{}, {} bytes]",
            offset,
            "",
            atom.code(),
            kind_name(atom),
            atom.header().map(|header| header.atom_len).unwrap_or_else(|| atom.size()),
            indent = indent
        );

        if atom.header().map(|header| header.clamped).unwrap_or(false) {
            line.push_str(" (clamped)");
        }

        if let Some(summary) = summarize(atom) {
            line.push_str(": ");
            line.push_str(&summary);
        }

        result = writeln!(out, "{}", line);
    });

    result
}

fn print_json(atoms: &[Atom]) -> io::Result<()> {
    let nodes: Vec<AtomNode> = atoms.iter().map(AtomNode::new).collect();

    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &nodes)?;
    writeln!(out)
}

fn run(args: &Args) -> Result<i32> {
    let options = ReaderOptions { max_depth: args.max_depth, max_payload_len: args.max_payload };

    let mut reader = AtomReader::with_options(options);
    let atoms = reader.read_all(File::open(&args.input)?)?;

    info!("read {} atoms, flavor {:?}", reader.atoms_read(), reader.flavor());

    if args.json {
        print_json(&atoms)?;
    }
    else {
        print_text(&atoms)?;
    }

    if let Some(path) = &args.rewrite {
        write_file(path, &atoms)?;

        let rewritten = AtomReader::with_options(options).read_all(File::open(path)?)?;

        if rewritten != atoms {
            error!("{} does not read back identically", path.display());
            return Ok(1);
        }

        info!("rewrote {}", path.display());
    }

    Ok(0)
}

fn main() {
    pretty_env_logger::init();

    let args = Args::parse();

    // Unsupported input exits with 2, any other error with 1.
    let code = match run(&args) {
        Ok(code) => code,
        Err(err) => {
            error!("{}: {}", args.input.display(), err);
            if err.is_unsupported() {
                2
            }
            else {
                1
            }
        }
    };

    std::process::exit(code)
}
