//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `treelog_core` linkage.
//! - Check one entry-form value: `treelog_cli <field> <value>`.

use std::process::ExitCode;
use treelog_core::{validate, FieldName, ValidationResult};

fn main() -> ExitCode {
    println!("treelog_core version={}", treelog_core::core_version());

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let [field, value] = args.as_slice() else {
        if !args.is_empty() {
            eprintln!("usage: treelog_cli [<field> <value>]");
            return ExitCode::from(2);
        }
        return ExitCode::SUCCESS;
    };

    let field = match field.parse::<FieldName>() {
        Ok(field) => field,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };

    match validate(field, value) {
        ValidationResult::Valid => {
            println!("{field}: valid");
            ExitCode::SUCCESS
        }
        ValidationResult::Invalid(message) => {
            println!("{field}: {message}");
            ExitCode::FAILURE
        }
    }
}
