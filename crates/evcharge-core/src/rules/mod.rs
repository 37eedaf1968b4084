//! Tolerant text rules shared by the brand plugins.

pub mod amounts;
pub mod dates;
pub mod labels;
pub mod patterns;

pub use amounts::{
    extract_cost, extract_kw_rating, extract_kwh, extract_miles, extract_percentage,
    parse_decimal,
};
pub use dates::{find_date, find_time_in, parse_long_date, parse_numeric_date, parse_time_of_day};
pub use labels::{extract_label_value, find_line, find_percentage, find_time, split_lines};
