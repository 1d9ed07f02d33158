//! Database helpers shared by connector services

pub mod init;
