//! lmsctl: scripting client for Logitech Media Server players.
//!
//! lms   -> JSON-RPC transport, player lookup, typed command protocol
//! cmd   -> verb dispatch, output rendering, status line
//! utils -> diagnostic logging

pub mod cmd;
pub mod lms;
pub mod utils;

#[cfg(test)]
mod testing;
