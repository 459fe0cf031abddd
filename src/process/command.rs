use thiserror::Error;

/// Reasons a command line cannot be split into an argument vector.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandLineError {
    #[error("Command line was empty (or contained only whitespace)")]
    Empty,

    #[error("Command line ended before matching quote was found for {0}")]
    UnmatchedQuote(char),

    #[error("Command line ended just after a '\\' character")]
    TrailingBackslash,
}

/// Splits a command line into an argument vector using POSIX shell word rules.
///
/// Supported syntax:
/// - unquoted whitespace (space, tab, newline) separates words
/// - `'...'` keeps everything literally
/// - `"..."` keeps everything literally except `\` before `"`, `\`, `$`, `` ` `` and newline
/// - `\` outside quotes escapes the next character, `\` + newline is removed
/// - `#` at the start of a word comments out the rest of the line
///
/// No expansion is performed: variables, globs and redirections stay literal.
///
/// # Errors
///
/// Returns [`CommandLineError`] when quotes are unbalanced, the line ends with a
/// lone backslash, or no words remain.
///
/// # Examples
///
/// ```rust
/// use tcrm_process::process::command::parse_command_line;
///
/// let argv = parse_command_line(r#"grep -n "hello world" 'src/*.rs'"#).unwrap();
/// assert_eq!(argv, ["grep", "-n", "hello world", "src/*.rs"]);
/// ```
pub fn parse_command_line(line: &str) -> Result<Vec<String>, CommandLineError> {
    let mut argv = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                if in_word {
                    argv.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            '#' if !in_word => {
                // Comment runs to the end of the line
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '\\' => match chars.next() {
                Some('\n') => {}
                Some(escaped) => {
                    word.push(escaped);
                    in_word = true;
                }
                None => return Err(CommandLineError::TrailingBackslash),
            },
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => word.push(c),
                        None => return Err(CommandLineError::UnmatchedQuote('\'')),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.peek() {
                            Some('"' | '\\' | '$' | '`') => {
                                if let Some(escaped) = chars.next() {
                                    word.push(escaped);
                                }
                            }
                            Some('\n') => {
                                chars.next();
                            }
                            Some(_) => word.push('\\'),
                            None => return Err(CommandLineError::UnmatchedQuote('"')),
                        },
                        Some(c) => word.push(c),
                        None => return Err(CommandLineError::UnmatchedQuote('"')),
                    }
                }
            }
            c => {
                word.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        argv.push(word);
    }

    if argv.is_empty() {
        return Err(CommandLineError::Empty);
    }
    Ok(argv)
}

/// Checks that double quotes are balanced in a command line handed verbatim to
/// the Windows command interpreter.
///
/// `cmd.exe` does its own splitting, so only the one error it cannot recover
/// from is reported here.
///
/// # Errors
///
/// Returns [`CommandLineError::Empty`] for a blank line and
/// [`CommandLineError::UnmatchedQuote`] when a `"` is left open.
pub fn check_command_line(line: &str) -> Result<(), CommandLineError> {
    if line.trim().is_empty() {
        return Err(CommandLineError::Empty);
    }
    if line.chars().filter(|c| *c == '"').count() % 2 != 0 {
        return Err(CommandLineError::UnmatchedQuote('"'));
    }
    Ok(())
}
