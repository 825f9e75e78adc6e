use anyhow::{anyhow, Result};
use std::fs;
use std::path::PathBuf;

pub struct AppPaths;

impl AppPaths {
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("cannot determine data directory"))?
            .join("fingrid");

        fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn log_file() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("fingrid.log"))
    }
}
