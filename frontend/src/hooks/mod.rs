pub mod use_data_table;
pub mod use_viewport;
