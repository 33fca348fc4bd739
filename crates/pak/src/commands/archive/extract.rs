use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use pak_vfs::PakInterface;
use std::{fs::File, path::PathBuf};
use tracing::info;

#[derive(Args)]
pub struct ExtractArgs {
    /// Input PAK files, loaded in order
    #[arg(short, long, value_name = "FILE", num_args = 1..)]
    files: Vec<PathBuf>,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let mut vfs = PakInterface::new();
        for file in &self.files {
            vfs.add_pak_file(file)
                .context(format!("loading {}", file.display()))?;
        }

        for path in vfs.paths() {
            let mut entry = vfs.open(path, "rb")?;

            let p = self.directory.join(path);
            info!("writing {}", p.display());

            let _ = std::fs::create_dir_all(p.parent().unwrap());
            let mut out = if !self.overwrite {
                File::create_new(&p)
                    .into_diagnostic()
                    .context(format!("creating {}", &p.display()))?
            } else {
                File::create(&p)
                    .into_diagnostic()
                    .context(format!("creating {}", &p.display()))?
            };

            std::io::copy(&mut entry, &mut out).into_diagnostic()?;
        }

        Ok(())
    }
}
