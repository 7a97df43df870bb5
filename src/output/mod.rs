pub mod formatter;

pub use formatter::{
    format_artifact_summary, format_contribution, format_json, format_probability,
    format_report, format_tsv, should_use_colors,
};
