pub mod filter_field;
pub mod help_widget;
