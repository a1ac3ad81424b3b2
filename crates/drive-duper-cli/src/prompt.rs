use std::io::{self, Write};

/// Print `prompt` and return the trimmed line the user enters.
pub fn prompt_line(prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

pub fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        if io::stdin().read_line(&mut input)? == 0 {
            // stdin closed; nothing more will arrive
            return Ok(default.unwrap_or(false));
        }

        match parse_answer(&input) {
            Some(answer) => return Ok(answer),
            None if input.trim().is_empty() => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            None => continue,
        }
    }
}

fn parse_answer(input: &str) -> Option<bool> {
    match input.trim().to_uppercase().as_str() {
        "Y" | "YES" => Some(true),
        "N" | "NO" => Some(false),
        _ => None,
    }
}
