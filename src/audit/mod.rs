pub mod logger;

pub use logger::ActivityLog;
