use std::io::{self, BufRead, Write};

use anyhow::{Result, bail};

/// How the target table is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Clean a raw `.txt` list and run the fingerprint tool over it.
    CleanAndFingerprint,
    /// Read an existing `.xlsx` table.
    ExistingTable,
}

impl Mode {
    pub fn parse(choice: &str) -> Result<Self> {
        match choice.trim() {
            "1" => Ok(Self::CleanAndFingerprint),
            "2" => Ok(Self::ExistingTable),
            other => bail!("invalid mode '{other}', enter 1 or 2"),
        }
    }

    /// Extension of the file the user names in this mode.
    pub fn input_extension(self) -> &'static str {
        match self {
            Self::CleanAndFingerprint => "txt",
            Self::ExistingTable => "xlsx",
        }
    }
}

/// Print `question` and read one trimmed line.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<String> {
    write!(output, "{question}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

pub fn ask_mode<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Mode> {
    writeln!(output, "Select mode:")?;
    writeln!(output, "1. clean a .txt target list, fingerprint it, then scan")?;
    writeln!(output, "2. scan from an existing .xlsx table (skip fingerprinting)")?;
    let choice = ask(input, output, "mode: ")?;
    Mode::parse(&choice)
}

pub fn ask_name<R: BufRead, W: Write>(input: &mut R, output: &mut W, mode: Mode) -> Result<String> {
    let question = match mode {
        Mode::CleanAndFingerprint => "target list file name (without .txt): ",
        Mode::ExistingTable => "existing table file name (without .xlsx): ",
    };
    let name = ask(input, output, question)?;
    if name.is_empty() {
        bail!("no file name given");
    }
    Ok(name)
}

/// Drop `.{extension}` from a user-supplied name if they typed it anyway.
pub fn strip_extension<'a>(name: &'a str, extension: &str) -> &'a str {
    name.strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|stem| !stem.is_empty())
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn mode_choices() {
        assert_eq!(Mode::parse("1").unwrap(), Mode::CleanAndFingerprint);
        assert_eq!(Mode::parse(" 2\n").unwrap(), Mode::ExistingTable);
        assert!(Mode::parse("3").is_err());
        assert!(Mode::parse("").is_err());
    }

    #[test]
    fn ask_mode_reads_a_line() {
        let mut input = Cursor::new("2\n");
        let mut output = Vec::new();
        let mode = ask_mode(&mut input, &mut output).unwrap();
        assert_eq!(mode, Mode::ExistingTable);
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.ends_with("mode: "));
    }

    #[test]
    fn ask_name_trims_and_rejects_empty() {
        let mut output = Vec::new();
        let name = ask_name(&mut Cursor::new("  targets \n"), &mut output, Mode::CleanAndFingerprint).unwrap();
        assert_eq!(name, "targets");
        assert!(ask_name(&mut Cursor::new("\n"), &mut output, Mode::ExistingTable).is_err());
    }

    #[test]
    fn strips_typed_extension() {
        assert_eq!(strip_extension("targets.txt", "txt"), "targets");
        assert_eq!(strip_extension("targets", "txt"), "targets");
        assert_eq!(strip_extension("targetstxt", "txt"), "targetstxt");
        assert_eq!(strip_extension(".txt", "txt"), ".txt");
    }
}
