//! SVG output: in-place template patching and fresh profile rendering

pub mod builder;
pub mod template;

pub use builder::SvgBuilder;
pub use template::{
    format_thousands, patch_template_file, patch_template_str, PatchValues, TemplateSlots,
};
