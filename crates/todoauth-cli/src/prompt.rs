use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use todoauth_core::{CredentialStore, Field};

/// Ask for username and password and write them into the form.
///
/// An empty username answer falls back to `default_username` when one is known.
pub fn fill_form(form: &mut CredentialStore, default_username: Option<&str>) -> Result<()> {
    let username = read_username(&mut io::stdin().lock(), &mut io::stderr(), default_username)?;
    form.set(Field::Username, username);

    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;
    form.set(Field::Password, password);
    Ok(())
}

fn read_username<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    default_username: Option<&str>,
) -> Result<String> {
    match default_username {
        Some(name) => write!(output, "Username [{}]: ", name)?,
        None => write!(output, "Username: ")?,
    }
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read username")?;
    let answer = line.trim_end_matches(['\r', '\n']);

    Ok(match (answer.is_empty(), default_username) {
        (true, Some(name)) => name.to_string(),
        _ => answer.to_string(),
    })
}
