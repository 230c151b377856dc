//! Terminal presentation: views to text, stdin lines to actions.

use client::render::{Screen, View};
use client::{AdminAction, PlayerAction};

pub const START_CONFIRMATION: &str = "Are you sure you want to start the game? [y/N]";

/// What a line of input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<A> {
    Act(A),
    /// Print this and wait for more input.
    Say(String),
    Quit,
    Ignore,
}

/// Parses stdin lines for one role.
pub trait LineParser {
    type Action;

    fn parse(&mut self, line: &str) -> Command<Self::Action>;
}

/// Player input: any non-empty line is a name submission.
#[derive(Debug, Default)]
pub struct PlayerCommands;

impl LineParser for PlayerCommands {
    type Action = PlayerAction;

    fn parse(&mut self, line: &str) -> Command<PlayerAction> {
        match line.trim() {
            "" => Command::Ignore,
            "quit" | "exit" => Command::Quit,
            _ => Command::Act(PlayerAction::SubmitName(line.to_owned())),
        }
    }
}

/// Admin input, with a confirmation step in front of `start`.
#[derive(Debug, Default)]
pub struct AdminCommands {
    confirming: bool,
}

pub const ADMIN_HELP: &str = "commands: login <password> | play <name> | noplay | start | quit";

impl LineParser for AdminCommands {
    type Action = AdminAction;

    fn parse(&mut self, line: &str) -> Command<AdminAction> {
        let line = line.trim();
        if std::mem::take(&mut self.confirming) {
            return if matches!(line.to_ascii_lowercase().as_str(), "y" | "yes") {
                Command::Act(AdminAction::StartGame)
            } else {
                Command::Say("start cancelled".to_owned())
            };
        }

        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        match verb {
            "" => Command::Ignore,
            "quit" | "exit" => Command::Quit,
            "login" if !rest.is_empty() => Command::Act(AdminAction::Login {
                password: rest.to_owned(),
            }),
            "play" if !rest.is_empty() => Command::Act(AdminAction::PlayAs(rest.to_owned())),
            "play" => Command::Act(AdminAction::SetParticipation(true)),
            "noplay" => Command::Act(AdminAction::SetParticipation(false)),
            "start" => {
                self.confirming = true;
                Command::Say(START_CONFIRMATION.to_owned())
            }
            _ => Command::Say(ADMIN_HELP.to_owned()),
        }
    }
}

/// Render a view as plain text.
#[must_use]
pub fn render(view: &View) -> String {
    let mut lines = vec![format!("[{}]", view.status.text)];
    if let Some(banner) = &view.banner {
        lines.push(format!("*** {banner} ***"));
    }
    if let Some(notice) = &view.notice {
        lines.push(format!("! {notice}"));
    }

    match &view.screen {
        Screen::JoinForm { name } if name.is_empty() => lines.push("Enter your name:".to_owned()),
        Screen::JoinForm { name } => lines.push(format!("Enter your name (last used: {name}):")),
        Screen::Queue { heading, players } => {
            lines.push(heading.clone());
            lines.extend(players.iter().map(|p| format!("  - {p}")));
        }
        Screen::Card(card) => lines.push(format!("{}: {} ({})", card.alt, card.card, card.image)),
        Screen::LoginForm { will_play, play_name, pending } => {
            if *pending {
                lines.push("Logging in...".to_owned());
            } else {
                lines.push("Admin login: login <password>".to_owned());
            }
            match (*will_play, play_name.is_empty()) {
                (false, _) => lines.push("Participating: no (play <name> to join in)".to_owned()),
                (true, true) => {
                    lines.push("Participating: yes, name required (play <name>)".to_owned());
                }
                (true, false) => lines.push(format!("Participating: yes, as {play_name}")),
            }
        }
        Screen::Dashboard { players, game_started, can_start, card } => {
            lines.push(format!("Players ({}):", players.len()));
            lines.extend(players.iter().map(|p| format!("  - {p}")));
            let progress = if *game_started {
                "Game started"
            } else {
                "Game not started"
            };
            lines.push(progress.to_owned());
            if let Some(card) = card {
                lines.push(format!("{}: {} ({})", card.alt, card.card, card.image));
            }
            if !*can_start {
                lines.push("Start unavailable while offline".to_owned());
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
#[path = "terminal_test.rs"]
mod tests;
