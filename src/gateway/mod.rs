pub mod launcher;
pub mod protocol;
pub mod server;

pub use launcher::{Launcher, RecordingLauncher, SystemLauncher};
pub use server::{GatewayServer, GatewayState};
