use lazy_static::lazy_static;
use std::path::PathBuf;
use tokio::runtime::Runtime;

pub mod trace;

lazy_static! {
   pub static ref RT: Runtime = Runtime::new().expect("Failed to start the tokio runtime");
}

/// Application data directory
pub fn data_dir() -> Result<PathBuf, anyhow::Error> {
   let dir = std::env::current_dir()?.join("data");

   if !dir.exists() {
      std::fs::create_dir_all(dir.clone())?;
   }

   Ok(dir)
}
