// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path;

use textlayout::{Alignment, Direction, Fixed, Flags, Glyph, Locale, Options, Parameters, Shaper};

fn main() {
    if let Err(e) = process() {
        eprintln!("Error: {}.", e);
        std::process::exit(1);
    }
}

fn process() -> Result<(), String> {
    let args = match collect_args() {
        Ok(args) => args,
        Err(e) => {
            println!("{}", HELP);
            return Err(e.to_string());
        }
    };

    if !args.quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            log::set_max_level(log::LevelFilter::Warn);
        }
    }

    let fontdb = load_fonts(&args);
    if fontdb.is_empty() {
        return Err("no fonts were loaded".to_string());
    }

    let mut shaper = Shaper::new(Options {
        collection: textlayout::collection_from_database(&fontdb),
        ..Options::default()
    });

    let params = Parameters {
        alignment: args.align,
        px_per_em: Fixed::from_f32(args.size),
        max_lines: args.max_lines,
        truncator: args.truncator.clone().unwrap_or_default(),
        max_width: args.width,
        locale: Locale {
            language: args.language.clone(),
            direction: if args.rtl { Direction::RightToLeft } else { Direction::LeftToRight },
        },
        ..Parameters::default()
    };

    let res = if args.text == "-" {
        let stdin = std::io::stdin();
        shaper.layout_reader(&params, stdin.lock())
    } else {
        shaper.layout_str(&params, &args.text)
    };
    res.map_err(|e| e.to_string())?;

    if args.svg {
        print_paths(&mut shaper);
    } else {
        print_glyphs(&mut shaper);
    }

    Ok(())
}

const HELP: &str = "\
textlayout shapes and wraps text and prints the resulting glyphs.

USAGE:
  textlayout [OPTIONS] <text>   # shape a text
  textlayout [OPTIONS] -        # shape stdin

  textlayout 'Hello, world!'
  textlayout --width 200 --max-lines 2 --svg 'Lorem ipsum dolor sit amet'

OPTIONS:
      --help                    Prints this help
  -V, --version                 Prints version

  -s, --size PX                 Sets the font size in pixels per em
                                [default: 16]
  -w, --width PX                Sets the maximum line width
                                [default: 400]
      --max-lines N             Truncates the text after N lines.
                                Zero disables truncation
                                [default: 0]
      --truncator TEXT          Sets the text that replaces truncated content
                                [default: …]
      --align ALIGN             Sets the line alignment
                                [default: start] [possible values: start, middle, end]
      --rtl                     Lays out paragraphs right-to-left
      --lang LANG               Sets the text language
                                [default: en]

      --font PATH               Loads a font file.
                                This option can be set multiple times
      --system-fonts            Loads installed fonts after the --font ones.
                                Always set when no --font is given

      --svg                     Prints an SVG path for each line
                                instead of the glyph stream
      --quiet                   Disables warnings

ARGS:
  <text>                        Text to shape
";

#[derive(Debug)]
struct Args {
    size: f32,
    width: i32,
    max_lines: usize,
    truncator: Option<String>,
    align: Alignment,
    rtl: bool,
    language: String,

    font_files: Vec<path::PathBuf>,
    system_fonts: bool,

    svg: bool,
    quiet: bool,

    text: String,
}

fn collect_args() -> Result<Args, pico_args::Error> {
    let mut input = pico_args::Arguments::from_env();

    if input.contains("--help") {
        print!("{}", HELP);
        std::process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    Ok(Args {
        size:           input.opt_value_from_fn(["-s", "--size"], parse_size)?.unwrap_or(16.0),
        width:          input.opt_value_from_fn(["-w", "--width"], parse_width)?.unwrap_or(400),
        max_lines:      input.opt_value_from_str("--max-lines")?.unwrap_or(0),
        truncator:      input.opt_value_from_str("--truncator")?,
        align:          input.opt_value_from_fn("--align", parse_align)?.unwrap_or_default(),
        rtl:            input.contains("--rtl"),
        language:       input.opt_value_from_str("--lang")?.unwrap_or_else(|| "en".to_string()),

        font_files:     input.values_from_str("--font")?,
        system_fonts:   input.contains("--system-fonts"),

        svg:            input.contains("--svg"),
        quiet:          input.contains("--quiet"),

        text:           input.free_from_str()?,
    })
}

fn parse_size(s: &str) -> Result<f32, String> {
    let n: f32 = s.parse().map_err(|_| "invalid font size")?;

    if n > 0.0 && n <= 1000.0 {
        Ok(n)
    } else {
        Err("font size out of bounds".to_string())
    }
}

fn parse_width(s: &str) -> Result<i32, String> {
    let n: i32 = s.parse().map_err(|_| "invalid width")?;

    if n > 0 {
        Ok(n)
    } else {
        Err("width should be positive".to_string())
    }
}

fn parse_align(s: &str) -> Result<Alignment, String> {
    match s {
        "start" => Ok(Alignment::Start),
        "middle" => Ok(Alignment::Middle),
        "end" => Ok(Alignment::End),
        _ => Err(format!("unknown alignment '{}'", s)),
    }
}

fn load_fonts(args: &Args) -> fontdb::Database {
    let mut fontdb = fontdb::Database::new();

    for path in &args.font_files {
        if let Err(e) = fontdb.load_font_file(path) {
            log::warn!("Failed to load '{}' cause {}.", path.display(), e);
        }
    }

    if args.system_fonts || args.font_files.is_empty() {
        fontdb.load_system_fonts();
    }

    fontdb
}

fn print_glyphs(shaper: &mut Shaper) {
    for g in shaper.glyphs() {
        println!(
            "{} {} {} {} {} {:?}",
            g.x, g.y, g.advance, g.runes, g.flags, g.id.split()
        );
    }
}

fn print_paths(shaper: &mut Shaper) {
    let mut line: Vec<Glyph> = Vec::new();
    let glyphs: Vec<Glyph> = shaper.glyphs().collect();
    for g in glyphs {
        line.push(g);
        if !g.flags.contains(Flags::LINE_BREAK) {
            continue;
        }

        let path = shaper.shape(&line);
        println!("{} {} {}", line[0].x, line[0].y, path.to_bez_path().to_svg());
        line.clear();
    }
}

/// A simple stderr logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::LevelFilter::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            let line = record.line().unwrap_or(0);

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}:{}): {}", target, line, record.args()),
                log::Level::Warn  => eprintln!("Warning (in {}:{}): {}", target, line, record.args()),
                log::Level::Info  => eprintln!("Info (in {}:{}): {}", target, line, record.args()),
                log::Level::Debug => eprintln!("Debug (in {}:{}): {}", target, line, record.args()),
                log::Level::Trace => eprintln!("Trace (in {}:{}): {}", target, line, record.args()),
            }
        }
    }

    fn flush(&self) {}
}
