pub mod json_import;
