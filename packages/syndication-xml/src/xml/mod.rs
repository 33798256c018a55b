//! XML reading, writing and navigation.

mod element;
mod reader;
mod utils;
mod writer;

pub use element::{XmlAttribute, XmlElement, XmlName, XmlNode};
pub use reader::{decode_bytes, from_node, parse_bytes, parse_str, sniff_encoding};
pub use utils::{
    element_children, find_by_path, find_child, find_children, get_attribute, get_tag_name,
    get_text, has_tag,
};
pub use writer::XmlWriter;
