pub mod file;
pub mod interface;
pub mod memory;

use crate::config::Config;
use ::anyhow::Result;

pub fn make_provider(config: &Config) -> Result<Box<dyn interface::ItemStore>> {
    match config.store_interface.as_str() {
        "file" => {
            ::log::info!("Storing items in {}", config.items_file);
            Ok(Box::new(file::JsonFileStore::new(config.items_file.clone())))
        }
        "memory" => {
            ::log::warn!("Storing items in memory, nothing will persist");
            Ok(Box::new(memory::MemoryStore::new()))
        }
        _ => Err(anyhow::anyhow!(
            "Unknown store interface: {}",
            config.store_interface
        )),
    }
}
