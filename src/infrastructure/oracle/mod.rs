pub mod apex_export_adapter;
pub mod sql_utils;
