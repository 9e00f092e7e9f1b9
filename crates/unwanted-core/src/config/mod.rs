//! Tool settings loading

mod loader;
mod settings;

pub use loader::SettingsLoader;
pub use settings::{DiscoverySettings, DisplaySettings, InstalledSettings, Settings, StateSettings};
