pub mod dispatcher;
pub mod result_set;

pub use dispatcher::{control_output, render_plain, render_pretty, to_csv, OutputTarget};
pub use result_set::ResultSet;
