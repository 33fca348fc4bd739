use clap::Args;
use miette::{Context, Result};
use pak_vfs::{ListOutcome, PakInterface};
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct ListArgs {
    /// Input PAK files, loaded in order
    #[arg(short, long, value_name = "FILE", num_args = 1..)]
    files: Vec<PathBuf>,
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let mut vfs = PakInterface::new();
        for file in &self.files {
            vfs.add_pak_file(file)
                .context(format!("loading {}", file.display()))?;
        }

        let ListOutcome::NeedsCapacity { required } = vfs.list_all_file_paths(None) else {
            unreachable!("a capacity probe never fills");
        };
        info!("serving {} paths", required);

        let mut paths = vec![""; required];
        if vfs.list_all_file_paths(Some(&mut paths)).is_filled() {
            for path in paths {
                println!("{path}");
            }
        }

        Ok(())
    }
}
