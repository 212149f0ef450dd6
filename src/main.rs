#![allow(dead_code)]

use crate::areas::repository::Repository;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod areas;
mod artifacts;
mod commands;
mod errors;

#[derive(Parser)]
#[command(
    name = "silt",
    version = "0.1.0",
    about = "A Git-compatible object store and reference layer",
    long_about = "Silt reads and writes the on-disk repository layout defined by Git, \
    so its object files, refs and SHA-1 identities are byte-compatible \
    with a stock Git install.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command resolves a name to an object of the requested type and prints its raw payload."
    )]
    CatFile {
        #[arg(index = 1, help = "The expected object type")]
        object_type: String,
        #[arg(index = 2, help = "The object name to print")]
        object: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally write it to the object database",
        long_about = "This command hashes a file as an object of the given type and can write it to the object database."
    )]
    HashObject {
        #[arg(
            short,
            long,
            required = false,
            help = "Write the object to the object database"
        )]
        write: bool,
        #[arg(
            short = 't',
            long = "type",
            default_value = "blob",
            help = "The object type"
        )]
        fmt: String,
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(
        name = "log",
        about = "Show the commit history",
        long_about = "This command walks the parent chain from the given commit (HEAD by default) and prints each commit once."
    )]
    Log {
        #[arg(index = 1, default_value = "HEAD", help = "The commit to start at")]
        commit: String,
    },
    #[command(
        name = "ls-tree",
        about = "List the contents of a tree object",
        long_about = "This command pretty-prints the tree a name resolves to; commits resolve to their tree."
    )]
    LsTree {
        #[arg(short, long, help = "Recurse into subtrees")]
        recursive: bool,
        #[arg(index = 1, help = "The tree-ish name to list")]
        tree: String,
    },
    #[command(
        name = "checkout",
        about = "Instantiate a commit inside an empty directory",
        long_about = "This command materializes the tree of the given commit inside the target directory, \
        which must be empty or absent."
    )]
    Checkout {
        #[arg(index = 1, help = "The commit or tree to check out")]
        commit: String,
        #[arg(index = 2, help = "The empty directory to populate")]
        path: PathBuf,
    },
    #[command(
        name = "show-ref",
        about = "List references",
        long_about = "This command lists every reference under .git/refs with the object id it resolves to."
    )]
    ShowRef,
    #[command(
        name = "tag",
        about = "List or create tags",
        long_about = "Without arguments this command lists tags; with a name it creates a lightweight tag, \
        or a full tag object when -a is given."
    )]
    Tag {
        #[arg(short = 'a', long, help = "Create an annotated tag object")]
        annotate: bool,
        #[arg(index = 1, help = "The tag name to create")]
        name: Option<String>,
        #[arg(
            index = 2,
            default_value = "HEAD",
            help = "The object the tag points at"
        )]
        object: String,
    },
    #[command(
        name = "rev-parse",
        about = "Resolve a name to a full object id",
        long_about = "This command resolves any revision name (HEAD, short hash, tag, branch) to a full object id."
    )]
    RevParse {
        #[arg(long = "silt-type", help = "Coerce the result to this object type")]
        fmt: Option<String>,
        #[arg(index = 1, help = "The name to resolve")]
        name: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let path = match path {
                Some(path) => path.clone(),
                None => std::env::current_dir()?,
            };

            Repository::init(&path, Box::new(std::io::stdout()))?;
        }
        Commands::CatFile {
            object_type,
            object,
        } => current_repository()?.cat_file(object_type, object)?,
        Commands::HashObject { write, fmt, file } => {
            current_repository()?.hash_object(file, fmt, *write)?
        }
        Commands::Log { commit } => current_repository()?.log(commit)?,
        Commands::LsTree { recursive, tree } => current_repository()?.ls_tree(tree, *recursive)?,
        Commands::Checkout { commit, path } => current_repository()?.checkout(commit, path)?,
        Commands::ShowRef => current_repository()?.show_ref()?,
        Commands::Tag {
            annotate,
            name,
            object,
        } => current_repository()?.tag(name.as_deref(), object, *annotate)?,
        Commands::RevParse { fmt, name } => {
            current_repository()?.rev_parse(name, fmt.as_deref())?
        }
    }

    Ok(())
}

/// Open the repository enclosing the current directory.
fn current_repository() -> Result<Repository> {
    let pwd = std::env::current_dir()?;

    Repository::find(&pwd, true, Box::new(std::io::stdout()))?
        .ok_or_else(|| anyhow::anyhow!("not a silt repository: {}", pwd.display()))
}
