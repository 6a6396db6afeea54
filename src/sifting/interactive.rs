//! Interactive selection of the file to keep.
//!
//! [`InteractiveSifter`] shows every member of a duplicate group with an
//! index, marks the choice of a wrapped sifter as the default, and asks the
//! user to pick. Input is read through the [`Prompter`] trait so the
//! terminal can be swapped for a script in tests.

use std::collections::{BTreeSet, VecDeque};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use super::{Selection, Sifter};
use crate::scanner::FileRecord;
use crate::signal::{install_handler, InterruptHandler};

/// Prompt shown when asking for a choice.
pub const PROMPT: &str = "Pick which file to keep (^C to skip): ";

/// How often a waiting prompt checks for Ctrl+C.
const INTERRUPT_POLL: Duration = Duration::from_millis(100);

/// What the user answered at a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptReply {
    /// A line of input, without its line terminator
    Line(String),
    /// The prompt was interrupted or input ended
    Cancelled,
}

/// Source of interactive answers.
pub trait Prompter {
    /// Display one line of the menu.
    fn show(&mut self, line: &str);

    /// Display `prompt` and wait for an answer.
    fn read_choice(&mut self, prompt: &str) -> PromptReply;
}

/// Asks the user which member of each group to keep.
pub struct InteractiveSifter<P> {
    default: Box<dyn Sifter>,
    prompter: P,
}

impl<P: Prompter> InteractiveSifter<P> {
    /// Wrap `default`, whose pick is offered as the default answer.
    pub fn new(default: Box<dyn Sifter>, prompter: P) -> Self {
        Self { default, prompter }
    }

    /// The prompter, for inspecting a scripted session.
    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    fn choose<'a>(&mut self, files: &'a [FileRecord]) -> Option<&'a FileRecord> {
        loop {
            let answer = match self.prompter.read_choice(PROMPT) {
                PromptReply::Cancelled => return None,
                PromptReply::Line(answer) => answer,
            };

            if answer.is_empty() {
                return files.first();
            }
            if answer.bytes().all(|b| b.is_ascii_digit()) {
                if let Some(file) = answer.parse::<usize>().ok().and_then(|i| files.get(i)) {
                    return Some(file);
                }
            }
            if let Some(file) = files.iter().find(|f| f.name == answer) {
                return Some(file);
            }
            log::debug!("Unrecognized choice {:?}, asking again", answer);
        }
    }
}

impl<P: Prompter> Sifter for InteractiveSifter<P> {
    fn sift(&mut self, members: &BTreeSet<FileRecord>) -> Option<Selection> {
        let default = self.default.sift(members)?.keep;

        let files: Vec<FileRecord> = std::iter::once(default.clone())
            .chain(members.iter().filter(|m| **m != default).cloned())
            .collect();
        for (num, file) in files.iter().enumerate() {
            if num == 0 {
                self.prompter.show(&format!("{}. {} (default)", num, file.name));
            } else {
                self.prompter.show(&format!("{}. {}", num, file.name));
            }
        }

        match self.choose(&files) {
            Some(best) => {
                if *best != default {
                    log::warn!("User picked {} over {}", best.name, default.name);
                }
                Some(Selection::keeping(best.clone(), members))
            }
            None => {
                self.prompter.show("Skipped");
                log::warn!("User skipped group of {} in interactive mode", default.name);
                Some(Selection {
                    keep: default,
                    discard: BTreeSet::new(),
                })
            }
        }
    }
}

/// Reads answers from stdin and shows the menu on stdout.
///
/// Stdin is read on a helper thread so that Ctrl+C can cancel a prompt
/// while a read is blocked. End of input counts as a cancellation.
#[derive(Default)]
pub struct TerminalPrompter {
    lines: Option<Receiver<Option<String>>>,
    interrupts: Option<InterruptHandler>,
}

impl TerminalPrompter {
    /// Create a prompter. Nothing is spawned until the first prompt.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lines(&mut self) -> &Receiver<Option<String>> {
        self.lines.get_or_insert_with(|| {
            let (tx, rx) = mpsc::channel();
            thread::spawn(move || {
                let stdin = io::stdin();
                let mut handle = stdin.lock();
                loop {
                    let mut line = String::new();
                    let reply = match handle.read_line(&mut line) {
                        Ok(0) | Err(_) => None,
                        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
                    };
                    let finished = reply.is_none();
                    if tx.send(reply).is_err() || finished {
                        break;
                    }
                }
            });
            rx
        })
    }

    fn interrupts(&mut self) -> Option<InterruptHandler> {
        if self.interrupts.is_none() {
            match install_handler() {
                Ok(handler) => self.interrupts = Some(handler),
                Err(e) => log::warn!("Ctrl+C will not skip prompts: {}", e),
            }
        }
        self.interrupts.clone()
    }
}

impl Prompter for TerminalPrompter {
    fn show(&mut self, line: &str) {
        println!("{}", line);
    }

    fn read_choice(&mut self, prompt: &str) -> PromptReply {
        print!("{}", prompt);
        let _ = io::stdout().flush();

        let interrupts = self.interrupts();
        if let Some(handler) = &interrupts {
            handler.arm();
        }

        let reply = loop {
            match self.lines().recv_timeout(INTERRUPT_POLL) {
                Ok(Some(line)) => break PromptReply::Line(line),
                Ok(None) | Err(RecvTimeoutError::Disconnected) => {
                    println!();
                    break PromptReply::Cancelled;
                }
                Err(RecvTimeoutError::Timeout) => {
                    if interrupts.as_ref().is_some_and(InterruptHandler::take_interrupt) {
                        println!();
                        break PromptReply::Cancelled;
                    }
                }
            }
        };

        if let Some(handler) = &interrupts {
            handler.disarm();
        }
        reply
    }
}

/// Answers prompts from a fixed script and records everything shown.
///
/// When the script runs out, further prompts are cancelled.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<PromptReply>,
    shown: Vec<String>,
    asked: usize,
}

impl ScriptedPrompter {
    /// Create a prompter answering with `answers` in order.
    pub fn new(answers: impl IntoIterator<Item = PromptReply>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Create a prompter answering with the given lines in order.
    pub fn lines<S: Into<String>>(answers: impl IntoIterator<Item = S>) -> Self {
        Self::new(answers.into_iter().map(|s| PromptReply::Line(s.into())))
    }

    /// Lines displayed so far.
    #[must_use]
    pub fn shown(&self) -> &[String] {
        &self.shown
    }

    /// Number of prompts answered so far.
    #[must_use]
    pub fn asked(&self) -> usize {
        self.asked
    }
}

impl Prompter for ScriptedPrompter {
    fn show(&mut self, line: &str) {
        self.shown.push(line.to_string());
    }

    fn read_choice(&mut self, _prompt: &str) -> PromptReply {
        self.asked += 1;
        self.answers.pop_front().unwrap_or(PromptReply::Cancelled)
    }
}
