use std::{fmt, io};

use tracing::Level;

use crate::table::{FixedHashTable, Inserted};
pub mod reader;

use reader::Flow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellOptionType {
    Check,
}

impl fmt::Display for ShellOptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ShellOptionType::Check => "check",
            }
        )
    }
}

pub struct ShellOption {
    name: &'static str,
    ty: ShellOptionType,
    value: bool,
    // Only settable from the command line
    startup_only: bool,
}

impl fmt::Display for ShellOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "option name {} type {} value {}", self.name, self.ty, self.value)?;
        if self.startup_only {
            write!(f, " (startup only)")?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ShellOptions {
    // Log table decisions at DEBUG instead of WARN
    pub verbose: bool,
    // Repeat each command before its output
    pub echo: bool,
    // Follow every dump with the table statistics
    pub stats: bool,
}

impl ShellOptions {
    pub fn from_args<I>(args: I) -> Result<ShellOptions, String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut options = ShellOptions::default();
        for arg in args {
            match arg.as_ref() {
                "--verbose" | "-v" => options.verbose = true,
                "--echo" => options.echo = true,
                "--stats" => options.stats = true,
                other => return Err(format!("Unknown argument: {other}")),
            }
        }
        Ok(options)
    }

    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        }
    }

    pub fn report(&self) -> Vec<ShellOption> {
        vec![
            ShellOption {
                name: "Verbose",
                ty: ShellOptionType::Check,
                value: self.verbose,
                startup_only: true,
            },
            ShellOption {
                name: "Echo",
                ty: ShellOptionType::Check,
                value: self.echo,
                startup_only: false,
            },
            ShellOption {
                name: "Stats",
                ty: ShellOptionType::Check,
                value: self.stats,
                startup_only: false,
            },
        ]
    }

    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<String, String> {
        match name {
            "Echo" => {
                self.echo = parse_check(value).ok_or(format!("Bad argument for Echo"))?;
                Ok(String::from("Echo"))
            }
            "Stats" => {
                self.stats = parse_check(value).ok_or(format!("Bad argument for Stats"))?;
                Ok(String::from("Stats"))
            }
            "Verbose" => Err(format!("Verbose can only be set at startup with --verbose")),
            _ => Err(format!("No such Option: {name}")),
        }
    }
}

fn parse_check(value: Option<&str>) -> Option<bool> {
    match value? {
        "on" | "true" => Some(true),
        "off" | "false" => Some(false),
        _ => None,
    }
}

pub trait TableShell {
    // Insert a name, or overwrite the age already stored under it
    fn insert(&mut self, name: &str, age: i32) -> Result<(), String>;

    fn get(&mut self, name: &str) -> Result<(), String>;

    // Print every occupied slot
    fn dump(&mut self) -> Result<(), String>;

    fn stats(&mut self) -> Result<(), String>;

    fn len(&mut self) -> Result<(), String>;

    fn options(&mut self) -> Result<(), String>;

    fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), String>;

    // Three inserts, one update, a lookup and a full dump
    fn demo(&mut self) -> Result<(), String>;

    fn quit(&mut self) -> Result<(), String>;
}

/// Drives one table from text commands, writing results to `out`.
pub struct Shell<W: io::Write> {
    table: FixedHashTable,
    options: ShellOptions,
    out: W,
}

impl<W: io::Write> Shell<W> {
    pub fn new(out: W, options: ShellOptions) -> Shell<W> {
        Shell {
            table: FixedHashTable::new(),
            options,
            out,
        }
    }

    pub fn table(&self) -> &FixedHashTable {
        &self.table
    }

    pub fn shell_options(&self) -> &ShellOptions {
        &self.options
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn run_line(&mut self, line: &str) -> Result<Flow, String> {
        if self.options.echo && !line.trim().is_empty() {
            self.emit(format_args!("> {}", line.trim()))?;
        }
        reader::read_shell_line(line, self)
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) -> Result<(), String> {
        writeln!(self.out, "{args}").map_err(|e| format!("Failed to write output: {e}"))
    }
}

impl<W: io::Write> TableShell for Shell<W> {
    fn insert(&mut self, name: &str, age: i32) -> Result<(), String> {
        match self.table.insert(name, age) {
            Ok(Inserted::New { index }) => self.emit(format_args!("inserted {name} at [{index}]")),
            Ok(Inserted::Updated { index, previous }) => {
                self.emit(format_args!("updated {name} at [{index}] (was {previous})"))
            }
            Err(e) => Err(format!("Failed to insert {name}: {e}")),
        }
    }

    fn get(&mut self, name: &str) -> Result<(), String> {
        match self.table.get_value(name).copied() {
            Some(age) => self.emit(format_args!("found {name}, age = {age}")),
            None => self.emit(format_args!("{name} not found")),
        }
    }

    fn dump(&mut self) -> Result<(), String> {
        self.table
            .dump(&mut self.out)
            .map_err(|e| format!("Failed to write output: {e}"))?;
        if self.options.stats {
            self.stats()?;
        }
        Ok(())
    }

    fn stats(&mut self) -> Result<(), String> {
        let stats = self.table.stats();
        self.emit(format_args!("{stats}"))
    }

    fn len(&mut self) -> Result<(), String> {
        let (len, capacity) = (self.table.len(), self.table.capacity());
        self.emit(format_args!("{len} of {capacity} slots occupied"))
    }

    fn options(&mut self) -> Result<(), String> {
        for option in self.options.report() {
            self.emit(format_args!("{option}"))?;
        }
        Ok(())
    }

    fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), String> {
        let name = self.options.set_option(name, value)?;
        tracing::event!(Level::DEBUG, name = "Option set", option = %name);
        Ok(())
    }

    fn demo(&mut self) -> Result<(), String> {
        self.insert("Priyanshu", 25)?;
        self.insert("vergil", 30)?;
        self.insert("goku", 22)?;
        self.insert("Priyanshu", 40)?;
        self.get("Priyanshu")?;
        self.emit(format_args!("\nFull table contents:"))?;
        self.dump()
    }

    fn quit(&mut self) -> Result<(), String> {
        self.out
            .flush()
            .map_err(|e| format!("Failed to flush output: {e}"))
    }
}
