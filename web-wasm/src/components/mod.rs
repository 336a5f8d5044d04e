pub mod data_table;
pub mod export_buttons;
pub mod header;
pub mod status_banner;
pub mod upload_form;
