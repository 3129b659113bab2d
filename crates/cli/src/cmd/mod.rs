mod scan;

pub use scan::{ScanOptions, cmd_scan};
