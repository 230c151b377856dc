//! Event loop hosting one controller.
//!
//! Channel messages, stdin lines, the self-check tick and banner timers are
//! all funnelled into `Controller::handle` one at a time. Effects are
//! executed right after each call and the view is reprinted when it
//! changes.

use std::time::Duration;

use client::controller::{Controller, Effect, Input};
use client::render::View;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::CliError;
use crate::channel::{Channel, ChannelHandle, ChannelMessage};
use crate::terminal::{self, Command, LineParser};

/// Run until stdin closes, `quit` is entered, or the channel task ends.
///
/// `initial` actions are applied right after boot (command-line flags).
///
/// # Errors
///
/// Returns [`CliError::Io`] when stdin cannot be read.
pub async fn run<C, P>(
    mut controller: C,
    mut parser: P,
    mut channel: Channel,
    initial: Vec<C::Action>,
    self_check: Duration,
) -> Result<(), CliError>
where
    C: Controller,
    P: LineParser<Action = C::Action>,
{
    let (banner_tx, mut banner_rx) = mpsc::unbounded_channel::<u64>();
    let mut screen = Screen::default();

    let boot = Input::Boot {
        channel_open: channel.handle.is_connected(),
    };
    execute(controller.handle(boot), &channel.handle, &banner_tx);
    for action in initial {
        execute(controller.handle(Input::Action(action)), &channel.handle, &banner_tx);
    }
    screen.redraw(&controller.view());

    let mut ticker = tokio::time::interval(self_check);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker.tick().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let input = tokio::select! {
            message = channel.events.recv() => match message {
                Some(ChannelMessage::Lifecycle(event)) => Input::Channel(event),
                Some(ChannelMessage::Server(event)) => Input::Server(event),
                None => {
                    tracing::info!("channel task ended");
                    break;
                }
            },
            line = lines.next_line() => match line? {
                Some(line) => match parser.parse(&line) {
                    Command::Act(action) => Input::Action(action),
                    Command::Say(text) => {
                        println!("{text}");
                        continue;
                    }
                    Command::Quit => break,
                    Command::Ignore => continue,
                },
                None => break,
            },
            _ = ticker.tick() => Input::SelfCheck {
                connected: channel.handle.is_connected(),
            },
            Some(seq) = banner_rx.recv() => Input::BannerExpired(seq),
        };

        execute(controller.handle(input), &channel.handle, &banner_tx);
        screen.redraw(&controller.view());
    }

    channel.shutdown();
    Ok(())
}

fn execute(
    effects: Vec<Effect>,
    handle: &ChannelHandle,
    banner_tx: &mpsc::UnboundedSender<u64>,
) {
    for effect in effects {
        match effect {
            Effect::Emit(event) => {
                if !handle.send(&event) {
                    tracing::debug!(event = event.name(), "dropped while offline");
                }
            }
            Effect::DismissBanner { seq, after } => {
                let tx = banner_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = tx.send(seq);
                });
            }
        }
    }
}

/// Last printed view.
#[derive(Default)]
struct Screen {
    last: Option<View>,
}

impl Screen {
    fn redraw(&mut self, view: &View) {
        if self.last.as_ref() == Some(view) {
            return;
        }
        println!("\n{}", terminal::render(view));
        self.last = Some(view.clone());
    }
}
