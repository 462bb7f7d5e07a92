//! Demo binary for streamfmt E2E testing.
//!
//! This binary exercises streamfmt's public API for PTY-based integration tests.
//! Each subcommand demonstrates a specific feature.

use colored::Colorize;
use std::env;
use std::fs::File;
use std::io;
use std::process;
use std::sync::Arc;
use streamfmt::{Json, Printer, StreamInsert, TraceSink, can_insert, set_trace_sink};

/// Simple stdout sink for trace events.
struct StdoutTrace;

impl TraceSink for StdoutTrace {
    fn emit(&self, message: &str) {
        println!("[trace] {}", message);
    }

    fn emit_line(&self, message: &str) {
        println!("[trace] {}", message);
    }
}

/// A point whose only text form is stream insertion.
struct Point {
    x: i64,
    y: i64,
}

impl StreamInsert for Point {
    fn insert(&self, stream: &mut dyn io::Write) -> io::Result<()> {
        write!(stream, "({},{})", self.x, self.y)
    }
}

/// `len` letters cycling through the alphabet.
struct Letters {
    len: usize,
}

impl StreamInsert for Letters {
    fn insert(&self, stream: &mut dyn io::Write) -> io::Result<()> {
        for i in 0..self.len {
            stream.write_all(&[b'a' + (i % 26) as u8])?;
        }
        Ok(())
    }
}

fn parse_arg<T: std::str::FromStr>(args: &[String], index: usize, default: T) -> T {
    args.get(index)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn run(args: &[String]) -> Result<(), streamfmt::PrintError> {
    let stdout = io::stdout();

    match args[1].as_str() {
        "point" => {
            let point = Point {
                x: parse_arg(args, 2, 1),
                y: parse_arg(args, 3, 2),
            };
            streamfmt::print!(stdout.lock(), "point={}\n", point)
        }

        "colored-point" => {
            let point = Point {
                x: parse_arg(args, 2, 1),
                y: parse_arg(args, 3, 2),
            };
            let label = "point".cyan();
            streamfmt::print!(stdout.lock(), "{}={}\n", label, point)
        }

        "padded" => {
            let width: usize = parse_arg(args, 2, 10);
            let point = Point {
                x: parse_arg(args, 3, 1),
                y: parse_arg(args, 4, 2),
            };
            let text = streamfmt::arg!(point);
            streamfmt::vprint(stdout.lock(), format_args!("[{:>width$}]\n", text))
        }

        "json" => {
            let raw = args.get(2).map(|s| s.as_str()).unwrap_or("{}");
            let value: serde_json::Value =
                serde_json::from_str(raw).unwrap_or(serde_json::Value::Null);
            let json = Json::new(value);
            streamfmt::print!(stdout.lock(), "json={}\n", json)
        }

        "letters" => {
            let letters = Letters {
                len: parse_arg(args, 2, 26),
            };
            let len = letters.len;
            streamfmt::print!(stdout.lock(), "{}:{}\n", len, letters)
        }

        "probe" => {
            let point = can_insert!(Point);
            let letters = can_insert!(Letters);
            let string = can_insert!(String);
            let number = can_insert!(u64);
            streamfmt::print!(
                stdout.lock(),
                "Point={} Letters={} String={} u64={}\n",
                point,
                letters,
                string,
                number
            )
        }

        "empty" => streamfmt::print!(stdout.lock(), ""),

        "trace" => {
            // Report buffer growth while capturing a long value
            set_trace_sink(Arc::new(StdoutTrace));
            let letters = Letters {
                len: parse_arg(args, 2, 1200),
            };
            let line = Printer::with_capacity(8)
                .format(format_args!("{}", streamfmt::arg!(letters)))?;
            let units = line.as_str().map_or(0, str::len);
            streamfmt::print!(stdout.lock(), "captured {} units\n", units)
        }

        "file" => {
            let Some(path) = args.get(2) else {
                eprintln!("file requires a path");
                process::exit(1);
            };
            let file = File::create(path)?;
            let point = Point {
                x: parse_arg(args, 3, 1),
                y: parse_arg(args, 4, 2),
            };
            streamfmt::print!(file, "point={}", point)
        }

        other => {
            eprintln!("Unknown command: {}", other);
            process::exit(1);
        }
    }
}

fn main() {
    // Force color output even in non-TTY (for test capture)
    colored::control::set_override(true);

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: streamfmt-demo <command> [args...]");
        eprintln!("Commands:");
        eprintln!("  point [x] [y]");
        eprintln!("  colored-point [x] [y]");
        eprintln!("  padded [width] [x] [y]");
        eprintln!("  json [json]");
        eprintln!("  letters [len]");
        eprintln!("  probe");
        eprintln!("  empty");
        eprintln!("  trace [len]");
        eprintln!("  file <path> [x] [y]");
        process::exit(1);
    }

    if let Err(err) = run(&args) {
        eprintln!("error: {}", err);
        process::exit(2);
    }
}
