pub mod scenario;
pub mod storage;
pub mod util;

pub use storage::JsonDirStorage;
pub use util::{parse_seeds, report_timestamp, split_csv};
