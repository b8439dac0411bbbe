use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fo", about = concat!("[~] folio v", env!("CARGO_PKG_VERSION"), " - your manuscript stays local"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different data directory root
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a folio data directory here
    Init(InitArgs),
    /// List projects
    Projects,
    /// Create a new project
    New(NewArgs),
    /// Show a project's folder/document tree
    Tree(TreeArgs),
    /// Add a document to a project
    Add(AddArgs),
    /// Create a folder in a project
    Mkdir(MkdirArgs),
    /// Compile a project's enabled documents into one markdown file
    Export(ExportArgs),
    /// Write an unencrypted backup of everything
    Backup(BackupArgs),
    /// Replace all data from a backup file
    Restore(RestoreArgs),
    /// Show word-count statistics for a project
    Stats(StatsArgs),
    /// Find a literal string across a project's documents
    Search(SearchArgs),
    /// Get or set a settings key
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Reinitialize even if folio/ already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct NewArgs {
    /// Project title
    pub title: String,
    #[arg(long, default_value = "")]
    pub genre: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Target word count
    #[arg(long, default_value_t = 0)]
    pub target: u32,
}

#[derive(Args)]
pub struct AddArgs {
    pub project: String,
    /// Document title
    pub title: String,
    /// Document kind (Chapter, Synopsis, Characters, Notes, ...)
    #[arg(long, default_value = "Chapter")]
    pub kind: String,
    /// Folder to file it under (by name)
    #[arg(long)]
    pub folder: Option<String>,
}

#[derive(Args)]
pub struct MkdirArgs {
    pub project: String,
    /// Folder name
    pub name: String,
    /// Parent folder (by name); top level when omitted
    #[arg(long)]
    pub parent: Option<String>,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Project title (or a unique prefix of it)
    pub project: String,
}

#[derive(Args)]
pub struct ExportArgs {
    pub project: String,
    /// Output directory (default: current directory)
    #[arg(long)]
    pub out: Option<String>,
}

#[derive(Args)]
pub struct BackupArgs {
    /// Output directory (default: current directory)
    #[arg(long)]
    pub out: Option<String>,
}

#[derive(Args)]
pub struct RestoreArgs {
    /// Backup file to restore from
    pub file: String,
}

#[derive(Args)]
pub struct StatsArgs {
    pub project: String,
}

#[derive(Args)]
pub struct SearchArgs {
    pub project: String,
    /// Literal query (no regex)
    pub query: String,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Settings key (e.g. highlight_color, model, api_key)
    pub key: String,
    /// New value; omit to print the current one
    pub value: Option<String>,
}
