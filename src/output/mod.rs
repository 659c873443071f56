pub mod formatter;

pub use formatter::{
    format_item_detail, format_json, format_multiplier, format_rank, format_ranked_table,
    format_score, format_tsv, should_use_colors,
};
