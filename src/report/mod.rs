//! Report assembly and generation.

pub mod assembler;
pub mod generator;
pub mod template;

pub use assembler::{assemble_report, title_env, ReportContext, ReportEnv};
pub use generator::{
    export_file_name, generate_json_report, generate_text_report, write_report, OutputFormat,
};
pub use template::render_template;
