pub mod archive;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle PAK archives
    Archive {
        #[command(subcommand)]
        command: archive::ArchiveCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Archive { command } => command.handle(),
        }
    }
}
