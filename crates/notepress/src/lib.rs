//! # NotePress
//!
//! Command-line front end for the NotePress publishing pipeline. The library
//! part carries the host collaborators the binary wires into a
//! [`notepress_publish::Processor`]: a filesystem document source, a terminal
//! notifier, and a terminal confirmation gate.

pub mod host;

pub use host::{FsDocumentSource, TerminalConfirmGate, TerminalNotifier};
