mod init;

pub use init::{init_file_logger, init_logger};
