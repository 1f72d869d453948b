//! darray - build, query and cross-check double-array word dictionaries

use clap::Parser;
use colored::Colorize;
use std::process;

use libdarray::cli::commands;
use libdarray::cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = commands::execute(cli.command, cli.config) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        process::exit(1);
    }
}
