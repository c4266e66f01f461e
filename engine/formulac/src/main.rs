//! Formula demo CLI.
//!
//! Parses an expression, binds variables from `name=value` arguments, and
//! prints the calculated value.

use formulac::{FormulaParser, ParseError};

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        std::process::exit(1);
    }

    let expression = &args[0];
    let formula = match FormulaParser::new().parse(expression) {
        Ok(formula) => formula,
        Err(err) => {
            report_parse_error(expression, &err);
            std::process::exit(1);
        }
    };
    let mut formula = formula;

    for argument in &args[1..] {
        let Some((name, value)) = parse_binding(argument) else {
            eprintln!("error: bindings look like `x=1.5`, got `{argument}`");
            std::process::exit(1);
        };
        if let Err(err) = formula.set_variable(name, value) {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }

    match formula.calculate() {
        Ok(value) => println!("{value}"),
        Err(err) => {
            eprintln!("error: {err}");
            let names: String = formula
                .variables()
                .iter()
                .map(|name| format!(" {name}"))
                .collect();
            eprintln!("variables in this formula:{names}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: formula <expression> [name=value]...");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  formula \"2 + 3*4\"");
    eprintln!("  formula \"x + sin(2) + y/2.5\" x=1 y=5");
}

/// Point at the failing offset underneath the echoed expression.
fn report_parse_error(expression: &str, err: &ParseError) {
    eprintln!("error: {err}");
    let offset = err.offset() as usize;
    if offset <= expression.len() {
        let column = expression[..offset].chars().count();
        eprintln!("  {expression}");
        eprintln!("  {}^", " ".repeat(column));
    }
}

fn parse_binding(argument: &str) -> Option<(char, f64)> {
    let (name, value) = argument.split_once('=')?;
    let mut chars = name.chars();
    let name = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some((name, value.parse().ok()?))
}
