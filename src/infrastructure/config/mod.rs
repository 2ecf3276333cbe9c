//! Infrastructure configuration modules.

pub mod adapter;
pub mod logging;
pub mod properties;
pub mod settings;

pub use adapter::AdapterConfiguration;
pub use logging::LoggingConfig;
pub use properties::Properties;
pub use settings::Settings;
