pub mod extract;
pub mod find;
pub mod list;

#[derive(clap::Subcommand)]
pub enum ArchiveCommands {
    /// List every valid path served by a set of PAK files
    List(list::ListArgs),
    /// Extract the contents of a set of PAK files into a directory
    Extract(extract::ExtractArgs),
    /// Search a pattern over packed entries and loose files
    Find(find::FindArgs),
}

impl ArchiveCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            ArchiveCommands::List(list) => list.handle(),
            ArchiveCommands::Extract(extract) => extract.handle(),
            ArchiveCommands::Find(find) => find.handle(),
        }
    }
}
