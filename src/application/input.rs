//! Interactive collection of the search request

#![allow(clippy::uninlined_format_args)]

use std::io::{self, BufRead, Write};
use std::time::Duration;
use thiserror::Error;

use super::presentation::type_out;
use crate::domain::{SearchMode, SearchRequest};

pub const WELCOME_BANNER: &str = "Hello There!!! Welcome to IMDB Scraper..";
pub const MENU: &str = "what you want to search: \nFor genre Press 1\nFor keyword Press 2";
pub const CHOICE_PROMPT: &str = "Enter Your Choice: ";
pub const WRONG_OPTION: &str = "You have choose wrong option please choose correct one";

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Input closed before a search was entered")]
    Closed,

    #[error("Failed to read input: {0}")]
    Io(#[from] io::Error),
}

fn read_trimmed_line<R: BufRead>(reader: &mut R) -> Result<String, InputError> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(InputError::Closed);
    }
    Ok(line.trim().to_string())
}

/// Types the banner and menu, then asks for the choice and the term.
///
/// An unknown choice asks again; end of input is an error.
pub fn prompt_search_request<R, W>(
    reader: &mut R,
    writer: &mut W,
    typing_delay: Duration,
) -> Result<SearchRequest, InputError>
where
    R: BufRead,
    W: Write,
{
    type_out(writer, WELCOME_BANNER, typing_delay)?;
    writeln!(writer)?;
    type_out(writer, MENU, typing_delay)?;
    writeln!(writer)?;

    let mode = loop {
        write!(writer, "{}", CHOICE_PROMPT)?;
        writer.flush()?;

        let choice = read_trimmed_line(reader)?;
        match SearchMode::from_menu_choice(&choice) {
            Some(mode) => break mode,
            None => writeln!(writer, "{}", WRONG_OPTION)?,
        }
    };

    write!(writer, "Please Enter Your {}: ", mode.label())?;
    writer.flush()?;
    let term = read_trimmed_line(reader)?;

    Ok(SearchRequest::new(term, mode))
}
