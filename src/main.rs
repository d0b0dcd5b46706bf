use std::io::{self, Read};
use syntrellis::{Config, Sexp, default_registry};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let config = Config { constraint_set_factory: cli.factory };
    let registry = default_registry(&config);

    let trees = match Sexp::parse_all(&cli.input) {
        Ok(trees) => trees,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };
    if trees.is_empty() {
        eprintln!("error: no trees provided\n\n{}", help_text());
        std::process::exit(2);
    }

    for tree in &trees {
        match registry.get_tree(tree) {
            Ok(set) => match set.to_sexp() {
                Some(rendered) => println!("{rendered}"),
                None => println!("()"),
            },
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
    }
}

struct CliConfig {
    input: String,
    factory: String,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut factory = "unlexicalized".to_string();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("syntrellis {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--factory" | "-f" => {
                factory = args.next().ok_or_else(|| "error: --factory expects a value".to_string())?;
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--factory=") => {
                factory = arg.trim_start_matches("--factory=").to_string();
            }
            _ if arg.starts_with("--input=") => {
                let value = arg.trim_start_matches("--input=");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value.to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    Ok(CliConfig { input, factory })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn help_text() -> String {
    format!(
        "syntrellis {version}

Builds a constraint tree per reference parse tree and prints it as an
S-expression with span-annotated labels.

Usage:
  syntrellis [OPTIONS] [--] <tree...>
  syntrellis [OPTIONS] --input <tree>

Options:
  -i, --input <tree>      Reference tree(s) in parenthesized notation. If
                          omitted, reads remaining args or stdin when no
                          args are provided.
  -f, --factory <name>    Constraint-set factory: unlexicalized (default),
                          lexicalized, partial-lexicalized, or
                          partial-bracket. Unknown names fall back to
                          unlexicalized with a diagnostic.
  -h, --help              Show this help message.
  -V, --version           Print version information.

Exit codes:
  0  Success.
  1  Malformed tree or internal error.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION")
    )
}
