pub mod init;
pub mod run;
pub mod survival;
pub mod validate;
