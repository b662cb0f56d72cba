pub mod svg_export;
pub mod ui;
