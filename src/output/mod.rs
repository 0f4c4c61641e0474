pub mod formatter;

pub use formatter::{
    format_category, format_json, format_ranked_table, format_region_detail, format_score,
    format_tsv, should_use_colors,
};
