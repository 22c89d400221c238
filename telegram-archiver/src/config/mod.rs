//! Archiver configuration loaded from the environment.

mod archiver_config;


pub use archiver_config::ArchiverConfig;
