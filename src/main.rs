use std::{env, fs, process};
use std::io;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use itmoscript_lang::{interpret, Interpreter};

fn main() {
    let args: Vec<String> = env::args().collect();

    match args.len() {
        n if n > 2 => {
            eprintln!("Usage: itmoscript [script.is]");
            process::exit(1);
        },
        2 => process::exit(run_file(&args[1])),
        _ => process::exit(run_prompt()),
    };
}

fn run_file(path: &str) -> i32 {
    if !path.ends_with(".is") {
        eprintln!("Error: expected a .is source file, got '{path}'");
        return 1;
    }

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error: cannot open '{path}': {error}");
            return 1;
        },
    };

    let mut out = io::stdout();
    match interpret(&source, &mut out) {
        true => 0,
        false => 1,
    }
}

/// Block-depth delta of one input line, judged textually: `if`/`for`/`while`
/// heads and assignments opening a `function` literal or an unterminated
/// list push, `end ...` and closing brackets pop. One-liners that close
/// their own block stay at depth zero.
fn block_delta(line: &str) -> i32 {
    let line = line.trim();
    let mut delta: i32 = 0;

    if line.starts_with("if ") || line.starts_with("for ") || line.starts_with("while ") {
        delta += 1;
    }

    if line.contains("= function") {
        delta += 1;
    }

    delta -= line.matches("end if").count() as i32;
    delta -= line.matches("end for").count() as i32;
    delta -= line.matches("end while").count() as i32;
    delta -= line.matches("end function").count() as i32;
    if line == "end" {
        delta -= 1;
    }

    delta += line.matches('[').count() as i32;
    delta -= line.matches(']').count() as i32;

    delta
}

fn run_prompt() -> i32 {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(error) => {
            eprintln!("Error: cannot start the prompt: {error}");
            return 1;
        },
    };

    let history = home::home_dir().map(|dir| dir.join(".itmoscript_history"));
    if let Some(history) = &history {
        let _ = editor.load_history(history);
    }

    let mut out = io::stdout();
    let mut interpreter = Interpreter::new(&mut out);

    let mut buffer = String::new();
    let mut depth: i32 = 0;

    loop {
        let prompt = if depth == 0 { "> " } else { ". " };

        match editor.readline(prompt) {
            Ok(line) => {
                let _ = editor.add_history_entry(&line);

                depth = (depth + block_delta(&line)).max(0);
                buffer.push_str(&line);
                buffer.push('\n');

                if depth == 0 {
                    let source = std::mem::take(&mut buffer);
                    if !source.trim().is_empty() {
                        interpreter.run(&source);
                    }
                }
            },
            Err(ReadlineError::Interrupted) => {
                buffer.clear();
                depth = 0;
            },
            Err(ReadlineError::Eof) => break,
            Err(error) => {
                eprintln!("Error: {error}");
                break;
            },
        }
    }

    if let Some(history) = &history {
        let _ = editor.save_history(history);
    }

    0
}
