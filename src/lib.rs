pub mod app;
pub mod command;
pub mod config;
pub mod domain;
pub mod entrez;
pub mod error;
pub mod fasta;
pub mod fs_util;
pub mod input;
pub mod output;
