use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Command input with the name diagnostics should show for it.
#[derive(Debug, PartialEq, Eq)]
pub struct Input {
    pub text: String,
    pub name: Option<String>,
}

/// Like [`read_input`], but drops one trailing LF from file and stdin input.
///
/// Editors and shells end files with a newline the message format has no
/// place for.
pub fn load_input(path: Option<&Path>, text: Option<&str>) -> Result<Input, String> {
    let mut input = read_input(path, text)?;
    if input.name.is_some() {
        input.text = strip_final_newline(input.text);
    }
    Ok(input)
}

/// Inline text wins over a path; `-` reads stdin. Content is returned as read.
pub fn read_input(path: Option<&Path>, text: Option<&str>) -> Result<Input, String> {
    if let Some(text) = text {
        return Ok(Input {
            text: text.to_string(),
            name: None,
        });
    }

    if let Some(path) = path {
        if path.as_os_str() == "-" {
            return read_stdin();
        }
        return read_file(path);
    }

    Err("input is required: use positional argument or -t/--text".to_string())
}

fn read_stdin() -> Result<Input, String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| format!("failed to read stdin: {}", e))?;
    Ok(Input {
        text: buf,
        name: Some("<stdin>".to_string()),
    })
}

fn read_file(path: &Path) -> Result<Input, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
    Ok(Input {
        text,
        name: Some(path.display().to_string()),
    })
}

pub(crate) fn strip_final_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
    }
    text
}

pub(crate) fn load_or_exit(path: Option<&Path>, text: Option<&str>) -> Input {
    or_exit(load_input(path, text))
}

pub(crate) fn read_or_exit(path: Option<&Path>, text: Option<&str>) -> Input {
    or_exit(read_input(path, text))
}

fn or_exit(input: Result<Input, String>) -> Input {
    match input {
        Ok(input) => input,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    }
}
