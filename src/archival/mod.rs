pub mod engine;
pub mod report;
pub mod resolver;
pub mod scanner;
pub mod windows;

pub use engine::{ArchivalEngine, Decision, RunOutcome, RunStats};
pub use report::{Report, ReportWriter};
pub use resolver::ActiveUserResolver;
pub use scanner::CandidateScanner;
pub use windows::ArchiveWindows;
