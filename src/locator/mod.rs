pub mod finder;
pub mod tag_filter;

pub use finder::{find_all_tags, find_tag, next_sibling_element, text_of};
pub use tag_filter::{AttrConstraint, TagFilter};
