pub mod check;
pub mod folder;
pub mod init;
pub mod serve;
