pub mod columns;
pub mod init;
pub mod serve;
