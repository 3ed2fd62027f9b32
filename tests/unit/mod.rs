mod config_tests;
mod document_tests;
mod file_discovery_tests;
mod model_tests;
mod output_tests;
