use crate::shell::TableShell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn read_shell_line(line: &str, dispatch: &mut dyn TableShell) -> Result<Flow, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(Flow::Continue);
    };
    match command {
        "insert" => {
            let Some(name) = words.next() else {
                return Err(format!("Missing name in: {line}"));
            };
            let age = words
                .next()
                .ok_or(format!("Missing age in: {}", line.trim()))?;
            let age: i32 = age
                .parse()
                .map_err(|e| format!("Invalid age value {age}: {e}"))?;
            no_more(&mut words, line)?;
            dispatch.insert(name, age)?;
        }
        "get" => {
            let Some(name) = words.next() else {
                return Err(format!("Missing name in: {line}"));
            };
            no_more(&mut words, line)?;
            dispatch.get(name)?;
        }
        "dump" => {
            no_more(&mut words, line)?;
            dispatch.dump()?;
        }
        "stats" => {
            no_more(&mut words, line)?;
            dispatch.stats()?;
        }
        "len" => {
            no_more(&mut words, line)?;
            dispatch.len()?;
        }
        "options" => {
            no_more(&mut words, line)?;
            dispatch.options()?;
        }
        "setoption" => {
            let Some(option_name) = keyword_pair(&mut words, "name", line)? else {
                return Err(format!("Missing 'name' parameter in: {}", line.trim()));
            };
            let value = keyword_pair(&mut words, "value", line)?;
            no_more(&mut words, line)?;
            dispatch.set_option(option_name, value)?;
        }
        "demo" => {
            no_more(&mut words, line)?;
            dispatch.demo()?;
        }
        "quit" => {
            dispatch.quit()?;
            return Ok(Flow::Quit);
        }
        _ => return Err(format!("Invalid command: {}", line.trim())),
    }
    Ok(Flow::Continue)
}

// `<keyword> <value>`, or nothing if the line has ended
fn keyword_pair<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    keyword: &str,
    line: &str,
) -> Result<Option<&'a str>, String> {
    let Some(literal) = words.next() else {
        return Ok(None);
    };
    if literal != keyword {
        return Err(format!("Expected '{keyword}' but found {literal} in: {}", line.trim()));
    }
    match words.next() {
        Some(value) => Ok(Some(value)),
        None => Err(format!("Missing '{keyword}' value in: {}", line.trim())),
    }
}

fn no_more<'a>(words: &mut impl Iterator<Item = &'a str>, line: &str) -> Result<(), String> {
    match words.next() {
        Some(extra) => Err(format!("Unexpected argument {extra} in: {}", line.trim())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use crate::shell::reader::*;

    // Records the calls it receives
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl TableShell for Recorder {
        fn insert(&mut self, name: &str, age: i32) -> Result<(), String> {
            self.calls.push(format!("insert {name} {age}"));
            Ok(())
        }
        fn get(&mut self, name: &str) -> Result<(), String> {
            self.calls.push(format!("get {name}"));
            Ok(())
        }
        fn dump(&mut self) -> Result<(), String> {
            self.calls.push(String::from("dump"));
            Ok(())
        }
        fn stats(&mut self) -> Result<(), String> {
            self.calls.push(String::from("stats"));
            Ok(())
        }
        fn len(&mut self) -> Result<(), String> {
            self.calls.push(String::from("len"));
            Ok(())
        }
        fn options(&mut self) -> Result<(), String> {
            self.calls.push(String::from("options"));
            Ok(())
        }
        fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), String> {
            self.calls.push(format!("setoption {name} {value:?}"));
            Ok(())
        }
        fn demo(&mut self) -> Result<(), String> {
            self.calls.push(String::from("demo"));
            Ok(())
        }
        fn quit(&mut self) -> Result<(), String> {
            self.calls.push(String::from("quit"));
            Ok(())
        }
    }

    #[test]
    fn dispatches_commands() {
        let mut recorder = Recorder::default();
        for line in [
            "insert goku 22\n",
            "  get   goku ",
            "dump",
            "stats",
            "len",
            "options",
            "setoption name Echo value on",
            "setoption name Stats",
            "demo",
        ] {
            assert_eq!(read_shell_line(line, &mut recorder), Ok(Flow::Continue));
        }
        assert_eq!(read_shell_line("quit\n", &mut recorder), Ok(Flow::Quit));
        assert_eq!(
            recorder.calls,
            vec![
                "insert goku 22",
                "get goku",
                "dump",
                "stats",
                "len",
                "options",
                "setoption Echo Some(\"on\")",
                "setoption Stats None",
                "demo",
                "quit",
            ]
        );
    }

    #[test]
    fn blank_lines_are_ignored() {
        let mut recorder = Recorder::default();
        assert_eq!(read_shell_line("   \n", &mut recorder), Ok(Flow::Continue));
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn malformed_lines_are_rejected() {
        let mut recorder = Recorder::default();
        for line in [
            "insert",
            "insert goku",
            "insert goku old",
            "insert goku 22 extra",
            "get",
            "dump now",
            "setoption Echo on",
            "setoption name Echo on",
            "setoption name Echo value",
            "setoption",
            "setoption name",
            "setoption value on",
            "setoption name Echo value on extra",
            "fly away",
        ] {
            assert!(read_shell_line(line, &mut recorder).is_err(), "{line}");
        }
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn keyword_pairs() {
        let mut words = "name Echo value on".split_whitespace();
        assert_eq!(keyword_pair(&mut words, "name", ""), Ok(Some("Echo")));
        assert_eq!(keyword_pair(&mut words, "value", ""), Ok(Some("on")));
        assert_eq!(keyword_pair(&mut words, "value", ""), Ok(None));

        let mut words = "value on".split_whitespace();
        assert!(keyword_pair(&mut words, "name", "").is_err());
        let mut words = "name".split_whitespace();
        assert!(keyword_pair(&mut words, "name", "").is_err());
    }

    #[test]
    fn negative_ages_parse() {
        let mut recorder = Recorder::default();
        assert!(read_shell_line("insert goku -5", &mut recorder).is_ok());
        assert_eq!(recorder.calls, vec!["insert goku -5"]);
    }
}
