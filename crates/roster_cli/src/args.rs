use clap::{Args, Parser, Subcommand};
use roster_core::{AgeBucket, SortKey};

#[derive(Debug, Parser)]
#[command(name = "roster", version, about = "Manage the user roster")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List records, filtered, sorted and paginated
    List {
        /// Case-insensitive match on name, email and address
        #[arg(short, long)]
        search: Option<String>,
        /// all | under20 | 20to40 | over40
        #[arg(short, long, default_value = "all")]
        bucket: AgeBucket,
        /// name-asc | age-asc | age-desc
        #[arg(long, default_value = "name-asc")]
        sort: SortKey,
        /// 1-based page number, clamped to the available pages
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Create a record
    Add(RecordFieldArgs),
    /// Update a record; omitted fields keep their values
    Edit {
        id: String,
        #[command(flatten)]
        fields: RecordFieldArgs,
    },
    /// Delete a record
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Print the core version
    Version,
}

#[derive(Debug, Args)]
pub struct RecordFieldArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub age: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    /// Empty string clears the stored email
    #[arg(long)]
    pub email: Option<String>,
    /// Empty string clears the stored phone
    #[arg(long)]
    pub phone: Option<String>,
}
