use clap::Args;
use miette::{Context, Result};
use owo_colors::OwoColorize;
use pak_vfs::PakInterface;
use std::path::PathBuf;

#[derive(Args)]
pub struct FindArgs {
    /// Input PAK files, loaded in order
    #[arg(short, long, value_name = "FILE", num_args = 1..)]
    files: Vec<PathBuf>,

    /// A glob pattern matched over packed entries and loose files
    #[arg(short, long, value_name = "PATTERN")]
    pattern: String,
}

impl FindArgs {
    pub fn handle(&self) -> Result<()> {
        let mut vfs = PakInterface::new();
        for file in &self.files {
            vfs.add_pak_file(file)
                .context(format!("loading {}", file.display()))?;
        }

        for entry in vfs.find(&self.pattern)? {
            if entry.is_packed() {
                println!("{} {:>12} {}", "pak ".cyan(), entry.size(), entry.path());
            } else {
                println!("{} {:>12} {}", "disk".green(), entry.size(), entry.path());
            }
        }

        Ok(())
    }
}
