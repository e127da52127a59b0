//! Headless line-driven front end.
//!
//! Reads one command per line from stdin, forwards it to the controller and
//! prints whatever changed. Identity and document events are drained on the
//! same task between commands.

use std::str::FromStr;

use echoverse_domain::{Archetype, GameMode, Screen, Speaker};
use futures_util::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::dto::{CharacterForm, Severity};
use crate::application::error::ClientError;
use crate::application::services::{ActionPanel, GameController};

const HELP: &str = "\
Commands:
  name <display name>                       choose a display name
  anon                                      play anonymously
  character <name>|<archetype>|<description>|<background>
  mode <mode>                               pick a game mode and start
  do <text>                                 free-text action
  choose <n>                                pick option n
  save                                      save the game
  new                                       start a new adventure
  key <code>                                send a key code
  dismiss                                   close the current notice
  quit                                      sign out
  exit                                      leave the program";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Name(String),
    Anonymous,
    Character(CharacterForm),
    Mode(String),
    Do(String),
    /// Zero-based option index.
    Choose(usize),
    Save,
    New,
    Key(String),
    Dismiss,
    Quit,
    Exit,
    Help,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "name" => Ok(Command::Name(rest.to_string())),
            "anon" => Ok(Command::Anonymous),
            "character" => {
                let fields: Vec<&str> = rest.split('|').map(str::trim).collect();
                match fields.as_slice() {
                    [name, archetype, description, background] => Ok(Command::Character(
                        CharacterForm::new(*name, *archetype, *description, *background),
                    )),
                    _ => Err(
                        "usage: character <name>|<archetype>|<description>|<background>".into(),
                    ),
                }
            }
            "mode" => Ok(Command::Mode(rest.to_string())),
            "do" => Ok(Command::Do(rest.to_string())),
            "choose" => match rest.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(Command::Choose(n - 1)),
                _ => Err("usage: choose <n>, counting from 1".into()),
            },
            "save" => Ok(Command::Save),
            "new" => Ok(Command::New),
            "key" if !rest.is_empty() => Ok(Command::Key(rest.to_string())),
            "key" => Err("usage: key <code>".into()),
            "dismiss" => Ok(Command::Dismiss),
            "quit" => Ok(Command::Quit),
            "exit" => Ok(Command::Exit),
            "help" | "?" => Ok(Command::Help),
            "" => Err(String::new()),
            other => Err(format!("unknown command: {other} (try `help`)")),
        }
    }
}

pub async fn execute(controller: &mut GameController, command: Command) -> Result<(), ClientError> {
    match command {
        Command::Name(name) => controller.create_user(&name).await,
        Command::Anonymous => controller.continue_anonymously().await,
        Command::Character(form) => controller.save_character(form).await,
        Command::Mode(mode) => controller.start_game(&mode).await,
        Command::Do(text) => controller.take_action(&text).await,
        Command::Choose(index) => controller.choose_option(index).await,
        Command::Save => controller.save_game().await,
        Command::New => {
            controller.new_adventure();
            Ok(())
        }
        Command::Key(code) => {
            controller.handle_key(&code);
            Ok(())
        }
        Command::Dismiss => {
            controller.dismiss_notice();
            Ok(())
        }
        Command::Quit => controller.quit().await,
        Command::Exit | Command::Help => Ok(()),
    }
}

/// Drive `controller` from stdin until `exit` or end of input.
pub async fn run(mut controller: GameController) -> anyhow::Result<()> {
    let mut events = controller.connect_events();
    if let Err(e) = controller.bootstrap().await {
        tracing::debug!(error = %e, "Bootstrap sign-in failed");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut view = View::default();
    println!("{HELP}");
    view.render(&controller);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.parse::<Command>() {
                    Ok(Command::Exit) => break,
                    Ok(Command::Help) => println!("{HELP}"),
                    Ok(command) => {
                        if let Err(e) = execute(&mut controller, command).await {
                            tracing::debug!(error = %e, "Command failed");
                        }
                    }
                    Err(message) if message.is_empty() => {}
                    Err(message) => println!("{message}"),
                }
            }
            Some(event) = events.next() => {
                if let Err(e) = controller.handle_event(event).await {
                    tracing::debug!(error = %e, "Event handling failed");
                }
            }
        }
        view.render(&controller);
    }

    tracing::info!("Leaving Echoverse");
    Ok(())
}

/// Tracks what was already printed so each render only shows changes.
#[derive(Debug, Default)]
struct View {
    revision: Option<u64>,
    screen: Option<Screen>,
    history_shown: usize,
}

impl View {
    fn render(&mut self, controller: &GameController) {
        if self.revision == Some(controller.revision()) {
            return;
        }
        self.revision = Some(controller.revision());

        let screen = controller.screen();
        if self.screen != Some(screen) {
            self.screen = Some(screen);
            self.history_shown = 0;
            println!();
            print_screen(controller, screen);
        }

        if let Some(notice) = controller.notice() {
            let tag = match notice.severity {
                Severity::Info => "info",
                Severity::Success => "ok",
                Severity::Error => "error",
            };
            println!("[{tag}] {} (dismiss to close)", notice.message);
        }

        if screen != Screen::Game {
            return;
        }

        let history = &controller.state().history;
        if history.len() < self.history_shown {
            self.history_shown = 0;
        }
        for entry in &history[self.history_shown..] {
            match entry.speaker {
                Speaker::Player => println!("> {}", entry.text),
                Speaker::Narrator => println!("{}", entry.text),
            }
        }
        self.history_shown = history.len();

        if controller.is_loading() {
            println!("(the narrator is thinking...)");
        } else {
            match controller.panel() {
                ActionPanel::Choices(options) => {
                    for (i, option) in options.iter().enumerate() {
                        println!("  {}. {option}", i + 1);
                    }
                }
                ActionPanel::FreeText => println!("  (do <text>)"),
            }
        }
    }
}

fn print_screen(controller: &GameController, screen: Screen) {
    match screen {
        Screen::Login => println!("== Login == (name <display name> | anon)"),
        Screen::CharacterCreation => {
            let field = controller.character_name_field();
            println!("== Character creation ==");
            if field.locked {
                println!("name: {} (fixed)", field.value);
            }
            let archetypes: Vec<&str> = Archetype::ALL.iter().map(|a| a.as_str()).collect();
            println!("archetypes: {}", archetypes.join(", "));
        }
        Screen::ModeSelection => {
            let modes: Vec<&str> = GameMode::ALL.iter().map(|m| m.as_str()).collect();
            println!("== Mode selection == ({})", modes.join(", "));
        }
        Screen::Game => {
            let state = controller.state();
            println!("== Game ==");
            if let Some(character) = &state.character {
                println!("{} the {}", character.name(), character.archetype());
            }
            let attributes: Vec<String> = state
                .attributes
                .iter()
                .map(|(name, value)| format!("{name} {value}"))
                .collect();
            println!("attributes: {}", attributes.join(", "));
            for item in &state.inventory {
                println!("item: {} - {}", item.name, item.description);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_commands() {
        assert_eq!("anon".parse(), Ok(Command::Anonymous));
        assert_eq!("  SAVE ".parse(), Ok(Command::Save));
        assert_eq!(
            "name  Lyra ".parse(),
            Ok(Command::Name("Lyra".to_string()))
        );
        assert_eq!(
            "do open the door".parse(),
            Ok(Command::Do("open the door".to_string()))
        );
    }

    #[test]
    fn parses_character_fields() {
        let command: Command = "character Lyra | explorer | Tall | From the coast"
            .parse()
            .unwrap();
        assert_eq!(
            command,
            Command::Character(CharacterForm::new("Lyra", "explorer", "Tall", "From the coast"))
        );
        assert!("character Lyra|explorer".parse::<Command>().is_err());
    }

    #[test]
    fn choose_counts_from_one() {
        assert_eq!("choose 2".parse(), Ok(Command::Choose(1)));
        assert!("choose 0".parse::<Command>().is_err());
        assert!("choose x".parse::<Command>().is_err());
    }

    #[test]
    fn unknown_and_empty_lines() {
        assert!("dance".parse::<Command>().unwrap_err().contains("dance"));
        assert_eq!("   ".parse::<Command>(), Err(String::new()));
        assert!("key".parse::<Command>().is_err());
    }
}
