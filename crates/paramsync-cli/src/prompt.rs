use anyhow::Result;
use is_terminal::IsTerminal;
use paramsync_runtime::Error;
use std::io::{BufRead, BufReader, Write};

/// A value that may be supplied by flag, by prompt, or by default
#[derive(Debug, Clone, Copy)]
pub struct Question {
    pub flag: &'static str,
    pub message: &'static str,
    pub default: &'static str,
    /// Reject a blank answer
    pub required: bool,
}

pub const OUTFILE: Question = Question {
    flag: "outfile",
    message: "Output file",
    default: ".env",
    required: true,
};

pub const INFILE: Question = Question {
    flag: "infile",
    message: "Input file",
    default: ".env",
    required: true,
};

pub const ENV: Question = Question {
    flag: "env",
    message: "Environment",
    default: "dev",
    required: true,
};

pub const SERVICE: Question = Question {
    flag: "service",
    message: "Service",
    default: "",
    required: true,
};

pub const OLD_PREFIX: Question = Question {
    flag: "oldprefix",
    message: "Prefix to replace",
    default: "DEV_",
    required: false,
};

pub const NEW_PREFIX: Question = Question {
    flag: "newprefix",
    message: "Replacing prefix (can be blank)",
    default: "",
    required: false,
};

pub const FOLDER: Question = Question {
    flag: "folder",
    message: "Export folder",
    default: "params",
    required: true,
};

pub const NAME: Question = Question {
    flag: "name",
    message: "Parameter name",
    default: "",
    required: true,
};

pub const SHARED_OUTFILE: Question = Question {
    flag: "outfile",
    message: "Output file",
    default: "shared-config.json",
    required: true,
};

pub const SHARED_INFILE: Question = Question {
    flag: "infile",
    message: "Input file",
    default: "shared-config.json",
    required: true,
};

/// Fills in flags the user left out.
///
/// On a terminal each missing value is asked for, with the default shown
/// and used on an empty answer. Otherwise the default is taken silently.
pub struct Prompter {
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
    interactive: bool,
}

impl Prompter {
    pub fn new(input: Box<dyn BufRead>, output: Box<dyn Write>, interactive: bool) -> Self {
        Self {
            input,
            output,
            interactive,
        }
    }

    /// Prompt on stderr when stdin is a terminal
    pub fn detect() -> Self {
        let interactive = std::io::stdin().is_terminal();
        Self::new(
            Box::new(BufReader::new(std::io::stdin())),
            Box::new(std::io::stderr()),
            interactive,
        )
    }

    pub fn resolve(&mut self, value: Option<String>, question: &Question) -> Result<String> {
        let answer = match value {
            Some(value) => value,
            None if self.interactive => self.ask(question)?,
            None => question.default.to_string(),
        };

        if question.required && answer.trim().is_empty() {
            return Err(Error::Validation(format!("--{} is required", question.flag)).into());
        }
        Ok(answer)
    }

    fn ask(&mut self, question: &Question) -> Result<String> {
        if question.default.is_empty() {
            write!(self.output, "{}: ", question.message)?;
        } else {
            write!(self.output, "{} ({}): ", question.message, question.default)?;
        }
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        let answer = line.trim_end_matches(['\r', '\n']);
        if answer.trim().is_empty() {
            Ok(question.default.to_string())
        } else {
            Ok(answer.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scripted(answers: &str) -> Prompter {
        Prompter::new(
            Box::new(Cursor::new(answers.to_string().into_bytes())),
            Box::new(std::io::sink()),
            true,
        )
    }

    #[test]
    fn test_flag_value_skips_prompt() {
        let mut prompter = scripted("");
        let value = prompter.resolve(Some("prod".to_string()), &ENV).unwrap();
        assert_eq!(value, "prod");
    }

    #[test]
    fn test_empty_answer_takes_default() {
        let mut prompter = scripted("\napi\n");
        assert_eq!(prompter.resolve(None, &ENV).unwrap(), "dev");
        assert_eq!(prompter.resolve(None, &SERVICE).unwrap(), "api");
    }

    #[test]
    fn test_off_terminal_uses_defaults() {
        let mut prompter = Prompter::new(
            Box::new(Cursor::new(Vec::new())),
            Box::new(std::io::sink()),
            false,
        );
        assert_eq!(prompter.resolve(None, &OUTFILE).unwrap(), ".env");
        assert_eq!(prompter.resolve(None, &OLD_PREFIX).unwrap(), "DEV_");
        assert_eq!(prompter.resolve(None, &NEW_PREFIX).unwrap(), "");

        let err = prompter.resolve(None, &SERVICE).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: --service is required");
    }

    #[test]
    fn test_blank_flag_for_required_value_rejected() {
        let mut prompter = scripted("");
        assert!(prompter.resolve(Some("  ".to_string()), &ENV).is_err());
        assert_eq!(
            prompter.resolve(Some(String::new()), &NEW_PREFIX).unwrap(),
            ""
        );
    }
}
