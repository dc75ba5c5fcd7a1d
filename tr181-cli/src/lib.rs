//! Command-line utilities for TR-181 data-model definition files
//!
//! # tr181dump
//!
//! Loads a definition file and prints every parameter name matching a query, one per line.
//!
//! Usage example: `tr181dump tr-181-2-16-0-cwmp-full.xml wifi --access read-write`
//!
//! # tr181-cli
//!
//! A REPL-style interactive shell for searching a definition file. Commands are `open`, `find`,
//! `case`, `access`, `list`, `select`, `copy`, `info` and `exit`; `help` lists them.
//!

pub mod command;
pub mod shell;
