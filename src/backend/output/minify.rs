//! Minification of generated JavaScript.
//!
//! [`Minifier`] is the seam for the minifier. [`OxcMinifier`] is the default: it parses the text as a script with
//! `oxc`, compresses it and prints it back in the compact form with every statement terminated by `;`.

use miette::Diagnostic;
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions};
use oxc::minifier::MinifierOptions;
use oxc::parser::Parser;
use oxc::span::SourceType;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum MinifyError {
    #[error("generated JavaScript does not parse: {0}")]
    #[diagnostic(code(bridgejs::write), help("this is an emitter defect; the beautified output shows the offending code"))]
    Parse(String),
}

/// Produces the minified rendering of a JavaScript text.
pub trait Minifier {
    fn minify(&self, code: &str) -> Result<String, MinifyError>;
}

/// Minifier backed by the `oxc` parser, compressor and code generator. Local names are kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct OxcMinifier;

impl Minifier for OxcMinifier {
    fn minify(&self, code: &str) -> Result<String, MinifyError> {
        let allocator = Allocator::default();
        let parsed = Parser::new(&allocator, code, SourceType::cjs()).parse();
        if parsed.panicked || !parsed.errors.is_empty() {
            let messages: Vec<String> = parsed.errors.iter().map(ToString::to_string).collect();
            return Err(MinifyError::Parse(messages.join("; ")));
        }
        let mut program = parsed.program;

        let options = MinifierOptions {
            mangle: None,
            ..MinifierOptions::default()
        };
        let minified = oxc::minifier::Minifier::new(options).minify(&allocator, &mut program);
        let printed = Codegen::new()
            .with_options(CodegenOptions::minify())
            .with_scoping(minified.scoping)
            .build(&program);
        Ok(printed.code.trim_end().to_string())
    }
}
