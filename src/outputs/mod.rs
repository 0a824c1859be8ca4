//! Output generation.
//!
//! - [`report`]: renders the run's debriefings into one flat text file
//!
//! # Output Structure
//!
//! ```text
//! ~/Materials/
//! ├── 18-10-2026.csv   # input links
//! ├── 18-10-2026.txt   # report
//! └── 18-10-2026.mp3   # optional narration of the report
//! ```

pub mod report;
