//! XML utilities.

mod utils;

pub use utils::{
    find_all_by_path, find_by_path, find_child, find_children, get_attribute, get_tag_name,
    text_content,
};
