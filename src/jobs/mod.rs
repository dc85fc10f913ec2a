pub mod internship_postings;

pub use internship_postings::{process_markdown, run_internship_postings, sync, RunSummary};
