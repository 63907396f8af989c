//! Report output: the dated text file and the optional alert email.
//!
//! # Submodules
//!
//! - [`report`]: Renders mentions to text and writes `<prefix>_<YYYYMMDD>.txt`
//! - [`email`]: Sends the rendered report over authenticated SMTP
//!
//! # Output Structure
//!
//! ```text
//! results/
//! ├── nvcc_hits_20250506.txt
//! └── nvcc_hits_20250513.txt
//! ```
//!
//! A rerun on the same day overwrites that day's file. A run with no
//! mentions writes nothing.

pub mod email;
pub mod report;
