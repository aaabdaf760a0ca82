pub mod catalog;
pub mod preview;
pub mod settings;
pub mod settings_types;

pub use catalog::{load_catalog, parse_catalog};
pub use preview::{FrameStats, PreviewScene};
pub use settings_types::{PreviewSettings, Settings};

pub fn storage_dir() -> std::path::PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    path.push("Tileview");
    let _ = std::fs::create_dir_all(&path);
    path
}
