use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// Reads a single value from stdin after printing `msg`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Prompt<'a> {
    msg: &'a str,
}

impl<'a> Prompt<'a> {
    #[inline]
    pub fn new(msg: &'a str) -> Self {
        Self { msg }
    }

    /// Reads a line, without the trailing newline. Returns `None` once stdin is closed.
    pub fn read_line(&self) -> io::Result<Option<String>> {
        {
            let mut writer = io::stdout().lock();
            writer.write_all(self.msg.as_bytes())?;
            writer.write_all(b": ")?;
            writer.flush()?;
        }

        let mut string = String::new();
        if io::stdin().lock().read_line(&mut string)? == 0 {
            return Ok(None);
        }

        let len = string.trim_end_matches(&['\r', '\n'][..]).len();
        string.truncate(len);

        Ok(Some(string))
    }

    /// Read until a valid element is input.
    ///
    /// # Errors
    ///
    /// Returns an error if stdin fails or is closed before a valid value was read.
    pub fn read_valid<T>(&self) -> io::Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        loop {
            let line = self
                .read_line()?
                .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))?;

            match line.parse() {
                Ok(val) => return Ok(val),
                Err(err) => {
                    println!("Failed to parse input: {}", err)
                }
            }
        }
    }
}

/// A string that contains at least one non-whitespace character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NonBlank(pub String);

impl FromStr for NonBlank {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            Err("value must not be empty")
        } else {
            Ok(Self(s.trim().to_owned()))
        }
    }
}
