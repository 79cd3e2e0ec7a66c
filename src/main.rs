use std::fs;
use std::io::{self, Read, Write};
use std::process;

use anyhow::{Context, Result, anyhow, bail};
use num_traits::ToPrimitive;
use tracing_subscriber::EnvFilter;

use plc::interpreter::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Run,
    Check,
    Transpile,
}

impl Mode {
    fn from_name(name: &str) -> Result<Self> {
        match name {
            "run" => Ok(Mode::Run),
            "check" => Ok(Mode::Check),
            "transpile" => Ok(Mode::Transpile),
            other => bail!("Unknown mode '{other}' (expected run, check or transpile)"),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let mut mode = Mode::Run;
    let mut input_path: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mode" | "-m" => {
                let name = args
                    .next()
                    .ok_or_else(|| anyhow!("Missing mode name after {arg}"))?;
                mode = Mode::from_name(&name)?;
            }
            _ => {
                input_path = Some(arg);
                if args.next().is_some() {
                    bail!("Only one input file is supported");
                }
                break;
            }
        }
    }

    let text = if let Some(path) = input_path {
        fs::read_to_string(&path).with_context(|| format!("Reading {path}"))?
    } else {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Reading stdin")?;
        buffer
    };

    match mode {
        Mode::Check => {
            plc::check(&text)?;
        }
        Mode::Transpile => {
            print!("{}", plc::transpile(&text)?);
        }
        Mode::Run => {
            let mut stdout = io::stdout().lock();
            let result = plc::run(&text, &mut stdout)?;
            let code = match &result.value {
                Value::Integer(value) => value
                    .to_i32()
                    .ok_or_else(|| anyhow!("Exit code {value} does not fit in 32 bits"))?,
                other => bail!("main returned {} instead of an Integer", other.kind_name()),
            };
            stdout.flush().context("Flushing stdout")?;
            process::exit(code);
        }
    }
    Ok(())
}
