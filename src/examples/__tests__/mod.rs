mod engine_agreement;
mod json_parsing;
