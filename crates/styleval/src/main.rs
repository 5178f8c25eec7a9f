//! Styleval - style property validator
//!
//! Usage: styleval [--definitions FILE] <name> <value>

use std::env;
use std::fs;
use std::process::ExitCode;

use log::info;

use styleval_style::{StyleValidator, ValidationStatus};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("styleval");
    let mut rest: Vec<&str> = args.iter().skip(1).map(String::as_str).collect();

    let definitions = if rest.first() == Some(&"--definitions") {
        let Some(path) = rest.get(1).map(|p| p.to_string()) else {
            eprintln!("Usage: {} --definitions <FILE> ...", program);
            return ExitCode::FAILURE;
        };
        rest.drain(..2);
        Some(path)
    } else {
        None
    };

    match rest.as_slice() {
        ["--help" | "-h"] => {
            print_usage(program);
            ExitCode::SUCCESS
        }
        ["--version" | "-V"] => {
            println!("Styleval {}", VERSION);
            ExitCode::SUCCESS
        }
        ["--check", path] => run(definitions.as_deref(), |validator| check_file(validator, path)),
        ["--check"] => {
            eprintln!("Usage: {} --check <FILE>", program);
            ExitCode::FAILURE
        }
        [name, value] => run(definitions.as_deref(), |validator| Ok(check_one(validator, name, value))),
        _ => {
            print_usage(program);
            ExitCode::FAILURE
        }
    }
}

fn print_usage(program: &str) {
    println!(
        r##"Styleval {} - style property validator

USAGE:
    {} [OPTIONS] <NAME> <VALUE>
    {} [OPTIONS] --check <FILE>

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    --definitions <FILE>    Load property definitions from a JSON file
    --check <FILE>          Validate every 'name: value' line of a file

EXAMPLES:
    {} width 10px
    {} --check button.uss.txt
    {} --definitions properties.json color "#336699"
"##,
        VERSION, program, program, program, program, program
    );
}

/// Build the validator and run `task`; `Ok(true)` means no errors were found
fn run(definitions: Option<&str>, task: impl FnOnce(&StyleValidator) -> Result<bool, String>) -> ExitCode {
    let result = load_validator(definitions).and_then(|validator| task(&validator));
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_validator(definitions: Option<&str>) -> Result<StyleValidator, String> {
    match definitions {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
            let validator = StyleValidator::new();
            validator
                .load_json(&text)
                .map_err(|e| format!("Failed to load {}: {}", path, e))?;
            info!("using property definitions from {}", path);
            Ok(validator)
        }
        None => StyleValidator::with_default_definitions().map_err(|e| e.to_string()),
    }
}

fn check_one(validator: &StyleValidator, name: &str, value: &str) -> bool {
    let result = validator.validate_property(name, value);
    println!("{}: {}", name, result);
    result.status != ValidationStatus::Error
}

/// Validate a file of `name: value` declarations, one per line
fn check_file(validator: &StyleValidator, path: &str) -> Result<bool, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;

    let mut clean = true;
    let mut checked = 0;
    for (number, line) in text.lines().enumerate() {
        let number = number + 1;
        let (name, value) = match parse_declaration(line) {
            Some(Ok(declaration)) => declaration,
            Some(Err(())) => {
                println!("{}:{}: error: expected 'name: value'", path, number);
                clean = false;
                continue;
            }
            None => continue,
        };

        checked += 1;
        let result = validator.validate_property(name, value);
        if result.status == ValidationStatus::Error {
            clean = false;
        }
        if !result.is_success() {
            println!("{}:{}: {}: {}", path, number, name, result);
        }
    }

    info!("checked {} declarations in {}", checked, path);
    Ok(clean)
}

/// Split one line into a declaration. Blank lines and `#` comments give
/// `None`; a trailing `;` is dropped.
fn parse_declaration(line: &str) -> Option<Result<(&str, &str), ()>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let Some((name, value)) = line.split_once(':') else {
        return Some(Err(()));
    };
    let name = name.trim();
    if name.is_empty() {
        return Some(Err(()));
    }
    let value = value.trim();
    let value = value.strip_suffix(';').unwrap_or(value).trim_end();
    Some(Ok((name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_declaration() {
        assert_eq!(parse_declaration("width: 10px;"), Some(Ok(("width", "10px"))));
        assert_eq!(parse_declaration("  color :#fff  "), Some(Ok(("color", "#fff"))));
        assert_eq!(parse_declaration("margin: ;"), Some(Ok(("margin", ""))));
        assert_eq!(parse_declaration("# comment"), None);
        assert_eq!(parse_declaration("   "), None);
        assert_eq!(parse_declaration("width 10px"), Some(Err(())));
        assert_eq!(parse_declaration(": 10px"), Some(Err(())));
    }
}
