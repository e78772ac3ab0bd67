// Copyright 2024 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

use crate::acid::AcidProperty;
use crate::app::{Command, Tab};
use crate::fsm::Action;
use fuzzy_matcher::FuzzyMatcher;
use smallvec::SmallVec;

/// Parses a whole session. All lines are checked, even after the first error.
pub fn parse_str(input: &str) -> Result<Vec<Command>, Errors> {
    Parser::default().parse(input)
}

/// Parses a single line as typed at the prompt. Blank lines and comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, Errors> {
    let mut parser = Parser::default();
    let res = parser.parse_line(line);
    if parser.errors.is_empty() {
        Ok(res.ok().flatten())
    } else {
        Err(parser.errors)
    }
}

/// Reads and parses a session file. Parse errors are printed to stderr and result in `None`.
pub fn parse_file(path: impl AsRef<std::path::Path>) -> std::io::Result<Option<Vec<Command>>> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    match parse_str(&source) {
        Ok(commands) => {
            tracing::debug!(target: "txnsim::session", path = %path.display(), commands = commands.len(), "parsed session");
            Ok(Some(commands))
        }
        Err(errors) => {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("session");
            report_errors(errors, name, &source);
            Ok(None)
        }
    }
}

#[derive(Default)]
struct Parser {
    commands: Vec<Command>,
    errors: Errors,
    /// offset of the current line inside the input
    offset: usize,
}

impl Parser {
    fn parse(mut self, input: &str) -> Result<Vec<Command>, Errors> {
        for line in input.split('\n') {
            if let Ok(Some(cmd)) = self.parse_line(line) {
                self.commands.push(cmd);
            }
            self.offset += line.len() + 1;
        }
        if self.errors.is_empty() {
            Ok(self.commands)
        } else {
            Err(self.errors)
        }
    }

    fn parse_line(&mut self, line: &str) -> ParseLineResult<Option<Command>> {
        let cont = tokenize_line(line);
        let tokens = &cont.tokens;
        let Some(keyword) = tokens.first().copied() else {
            // nothing but whitespace or a comment
            return Ok(None);
        };
        let args = &tokens[1..];
        let cmd = match keyword.to_ascii_lowercase().as_str() {
            "show" => {
                self.require_no_more(line, args)?;
                Command::Show
            }
            "tab" => {
                let name = self.require_single_arg(line, keyword, args)?;
                match name.parse::<Tab>() {
                    Ok(tab) => Command::SelectTab(tab),
                    Err(_) => return self.invalid_word_error(line, name, "tab", &TAB_NAMES),
                }
            }
            "fsm" => self.parse_fsm(line, keyword, args)?,
            "dirty" => {
                let sub = self.require_single_arg(line, keyword, args)?;
                match sub.to_ascii_lowercase().as_str() {
                    "next" => Command::DirtyNext,
                    "reset" => Command::DirtyReset,
                    _ => return self.invalid_word_error(line, sub, "dirty command", &DIRTY_OPS),
                }
            }
            "dcl" => {
                let sub = self.require_single_arg(line, keyword, args)?;
                match sub.to_ascii_lowercase().as_str() {
                    "grant" => Command::Grant,
                    "revoke" => Command::Revoke,
                    "select" => Command::Select,
                    _ => return self.invalid_word_error(line, sub, "dcl command", &DCL_OPS),
                }
            }
            "acid" => {
                let name = self.require_single_arg(line, keyword, args)?;
                match name.parse::<AcidProperty>() {
                    Ok(property) => Command::ToggleAcid(property),
                    Err(_) => {
                        return self.invalid_word_error(line, name, "ACID property", &ACID_NAMES)
                    }
                }
            }
            _ => return self.invalid_word_error(line, keyword, "command", &COMMANDS),
        };
        Ok(Some(cmd))
    }

    /// `fsm reset` or `fsm` followed by an action label which may span several tokens.
    fn parse_fsm(&mut self, line: &str, keyword: &str, args: &[&str]) -> ParseLineResult<Command> {
        let (Some(first), Some(last)) = (args.first(), args.last()) else {
            return self.add_error(
                line,
                keyword,
                format!("{keyword} requires an action"),
                "e.g. `fsm Begin Transaction`".to_owned(),
            );
        };
        if args.len() == 1 && first.eq_ignore_ascii_case("reset") {
            return Ok(Command::FsmReset);
        }
        let start = str_offset(first, line);
        let end = str_offset(last, line) + last.len();
        let label = &line[start..end];
        match label.parse::<Action>() {
            Ok(action) => Ok(Command::Fsm(action)),
            Err(_) => {
                let labels = Action::ALL.map(|a| a.label());
                self.invalid_word_error(line, label, "action", &labels)
            }
        }
    }

    fn require_single_arg<'l>(
        &mut self,
        line: &str,
        keyword: &str,
        args: &[&'l str],
    ) -> ParseLineResult<&'l str> {
        match args.first() {
            None => self.add_error(
                line,
                keyword,
                format!("{keyword} requires an argument"),
                String::new(),
            ),
            Some(arg) => {
                self.require_no_more(line, &args[1..])?;
                Ok(*arg)
            }
        }
    }

    fn require_no_more(&mut self, line: &str, extra: &[&str]) -> ParseLineResult {
        match (extra.first(), extra.last()) {
            (Some(first), Some(last)) => {
                let start = str_offset(first, line);
                let end = str_offset(last, line) + last.len();
                self.add_error(
                    line,
                    &line[start..end],
                    "Unexpected tokens".to_owned(),
                    "remove these".to_owned(),
                )
            }
            _ => Ok(()),
        }
    }

    fn add_error<T>(
        &mut self,
        line: &str,
        token: &str,
        msg: String,
        explain: String,
    ) -> ParseLineResult<T> {
        let start = str_offset(token, line);
        let end = start + token.len();
        tracing::debug!(target: "txnsim::session", %msg, start = start + self.offset, "parse error");
        self.errors.push(ParseError {
            msg,
            explain,
            start: start + self.offset,
            end: end + self.offset,
        });
        Err(())
    }

    fn invalid_word_error<T>(
        &mut self,
        line: &str,
        word: &str,
        kind: &str,
        choices: &[&str],
    ) -> ParseLineResult<T> {
        let suggestions = suggest(word, choices);
        let explain = if suggestions.is_empty() {
            format!("expected one of: {}", choices.join(", "))
        } else {
            format!("did you mean: {}?", suggestions.join(", "))
        };
        self.add_error(line, word, format!("Unknown {kind} \"{word}\""), explain)
    }
}

/// Up to five choices that fuzzy match `word`, best first.
fn suggest<'c>(word: &str, choices: &[&'c str]) -> Vec<&'c str> {
    let pattern = word.to_ascii_lowercase();
    let matcher = fuzzy_matcher::skim::SkimMatcherV2::default();
    let mut matches: Vec<(&'c str, i64)> = choices
        .iter()
        .flat_map(|other| matcher.fuzzy_match(other, &pattern).map(|s| (*other, s)))
        .collect();
    matches.sort_by_key(|(_, s)| -(*s));
    matches.into_iter().take(5).map(|(n, _)| n).collect()
}

// Line Tokenizer
#[derive(Default, Debug)]
struct LineTokens<'a> {
    tokens: SmallVec<[&'a str; 4]>,
    comment: Option<&'a str>,
}

const NO_TOKEN: usize = usize::MAX;
fn tokenize_line(line: &str) -> LineTokens<'_> {
    if line.is_empty() {
        return LineTokens::default();
    }
    let line_len = line.len();
    let mut out = LineTokens::default();
    let mut token_start: usize = NO_TOKEN;
    #[inline]
    fn finish_token<'a>(
        token_start: &mut usize,
        out: &mut LineTokens<'a>,
        line: &'a str,
        ii: usize,
    ) {
        if *token_start != NO_TOKEN {
            out.tokens.push(&line[*token_start..ii]);
            *token_start = NO_TOKEN;
        }
    }

    for (ii, cc) in line.char_indices() {
        match cc {
            ' ' | '\t' | '\r' => finish_token(&mut token_start, &mut out, line, ii),
            ';' | '#' => {
                finish_token(&mut token_start, &mut out, line, ii);
                out.comment = Some(&line[ii + 1..line_len]);
                return out;
            }
            _ => {
                if token_start == NO_TOKEN {
                    token_start = ii
                }
            }
        }
    }
    finish_token(&mut token_start, &mut out, line, line_len);
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub msg: String,
    /// displayed next to the offending tokens
    pub explain: String,
    pub start: usize,
    pub end: usize,
}

pub type Errors = Vec<ParseError>;

pub fn report_errors(errors: Errors, name: &str, source: &str) {
    let report_file = codespan_reporting::files::SimpleFile::new(name, source);
    for err in errors.into_iter() {
        report_error(err, &report_file);
    }
}

fn report_error(error: ParseError, file: &codespan_reporting::files::SimpleFile<&str, &str>) {
    let diagnostic = codespan_reporting::diagnostic::Diagnostic::error()
        .with_message(error.msg)
        .with_labels(vec![codespan_reporting::diagnostic::Label::primary(
            (),
            error.start..error.end,
        )
        .with_message(error.explain)]);
    let writer = codespan_reporting::term::termcolor::StandardStream::stderr(
        codespan_reporting::term::termcolor::ColorChoice::Auto,
    );
    let config = codespan_reporting::term::Config::default();
    let mut lock = writer.lock();
    if let Err(e) = codespan_reporting::term::emit(&mut lock, &config, file, &diagnostic) {
        tracing::warn!(target: "txnsim::session", error = %e, "failed to print diagnostic");
    }
}

fn str_offset(needle: &str, haystack: &str) -> usize {
    let offset = (needle.as_ptr() as usize) - (haystack.as_ptr() as usize);
    assert!(
        offset <= haystack.len(),
        "{} is not fully contained in {}",
        needle,
        haystack
    );
    offset
}

const COMMANDS: [&str; 6] = ["tab", "fsm", "dirty", "dcl", "acid", "show"];
const TAB_NAMES: [&str; 4] = ["states", "acid", "dirty", "dcl"];
const DIRTY_OPS: [&str; 2] = ["next", "reset"];
const DCL_OPS: [&str; 3] = ["grant", "revoke", "select"];
const ACID_NAMES: [&str; 8] = [
    "a",
    "c",
    "i",
    "d",
    "atomicity",
    "consistency",
    "isolation",
    "durability",
];

/// Indicated success or failure. Errors are not returned, but rather added to the parser.
type ParseLineResult<T = ()> = std::result::Result<T, ()>;
