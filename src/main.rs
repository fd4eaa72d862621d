mod add;
mod branch;
mod branches;
mod checkout;
mod commit;
mod fsutil;
mod huffman;
mod init;
mod log;
mod merge;
mod msg;
mod repo;
mod revert;
mod status;
mod store;

#[cfg(test)]
mod test_helpers;

use std::io::IsTerminal;

use clap::{Parser, Subcommand};
use colored::control;

#[derive(Parser)]
#[command(name = "vcs", about = "A lightweight local version control system")]
struct Cli {
    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize a new repository in the current directory
    Init,
    /// Copy files into the staging area ("." stages everything)
    Add {
        /// Files or directories to stage, or "." for everything
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Record the staged files as a new commit on the current branch
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
    },
    /// Show staged, modified, and untracked files
    Status,
    /// List branches, or create one starting at the current commit
    Branch {
        /// Name of the branch to create
        name: Option<String>,
    },
    /// Switch to a branch and rewrite the working directory from its tip
    Checkout {
        /// Branch to switch to
        branch: String,
    },
    /// Merge a branch into the current branch
    Merge {
        /// Branch to merge into the current branch
        branch: String,
    },
    /// Create a commit restoring the state of an earlier commit
    Revert {
        /// "HEAD" or a commit id
        commit: String,
    },
    /// Show commit history from the current branch tip, newest first
    Log,
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color
        || std::env::var_os("NO_COLOR").is_some()
        || std::env::var_os("TERM").is_some_and(|v| v == "dumb")
        || !std::io::stdout().is_terminal()
    {
        control::set_override(false);
    }

    let result = match cli.command {
        Command::Init => init::run(),
        Command::Add { paths } => add::run(paths),
        Command::Commit { message } => commit::run(message),
        Command::Status => status::run(),
        Command::Branch { name } => branch::run(name),
        Command::Checkout { branch } => checkout::run(branch),
        Command::Merge { branch } => merge::run(branch),
        Command::Revert { commit } => revert::run(commit),
        Command::Log => log::run(),
    };

    if let Err(e) = result {
        msg::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
