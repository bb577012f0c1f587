// astty: parse a script and browse its syntax tree in the terminal

use std::fs;
use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use astty::parser::lexer::LexerConfig;
use astty::parser::{parse_with, Goal};
use astty::ui::App;

struct Options {
    input: String,
    goal: Goal,
    config: LexerConfig,
    print: bool,
}

fn usage(program_name: &str) -> String {
    format!(
        "Usage: {program_name} <file|-> [--goal function|while|try|object] [--dotted] [--print]\n\
         \n\
         Examples:\n  \
         {program_name} add.js                  # Browse a function declaration\n  \
         {program_name} loop.js --goal while    # Parse the file as a while loop\n  \
         {program_name} obj.js --goal object --print"
    )
}

fn parse_args() -> Result<Options> {
    let mut args = std::env::args();
    let program_name = args.next().unwrap_or_else(|| "astty".to_string());

    let mut input = None;
    let mut goal = Goal::FunctionDeclaration;
    let mut config = LexerConfig::default();
    let mut print = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--goal" | "-g" => {
                let name = args
                    .next()
                    .with_context(|| format!("Missing goal name after {arg}"))?;
                goal = name.parse()?;
            }
            "--dotted" => config = config.with_dotted_identifiers(),
            "--print" | "-p" => print = true,
            "--help" | "-h" => {
                println!("{}", usage(&program_name));
                std::process::exit(0);
            }
            _ if input.is_none() => input = Some(arg),
            _ => bail!("Only one input file is supported\n\n{}", usage(&program_name)),
        }
    }

    let Some(input) = input else {
        bail!("{}", usage(&program_name));
    };

    Ok(Options {
        input,
        goal,
        config,
        print,
    })
}

fn read_source(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Reading stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(input).with_context(|| format!("Reading {input}"))
    }
}

fn main() -> Result<()> {
    let options = parse_args()?;
    let source = read_source(&options.input)?;

    let output = parse_with(&source, options.goal, options.config);

    if options.print {
        for diagnostic in &output.diagnostics {
            eprintln!("{}", diagnostic);
        }
        match &output.result {
            Ok(root) => println!("{}", root),
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(source, options.goal, options.config, output);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("Running terminal UI")
}
