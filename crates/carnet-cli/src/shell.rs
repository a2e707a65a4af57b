//! Interactive session: one store, many commands.
//!
//! Notices are expired and redrawn before every prompt, so a success or error
//! message stays visible until its deadline passes or it is dismissed.

use std::{
  future::Future,
  io::{self, Write},
  time::Duration,
};

use anyhow::Context as _;
use carnet_core::ContactApi;
use carnet_store::{ActionError, ContactStore};
use clap::{Parser, Subcommand};
use tokio::{
  io::{AsyncBufReadExt, BufReader},
  sync::watch,
  time::Instant,
};

use crate::{
  commands::{self, Command},
  display,
};

#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct Line {
  #[command(subcommand)]
  command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
  #[command(flatten)]
  Contact(Command),
  /// Fetch the contact list again.
  Reload,
  /// Hide the current notices.
  Dismiss,
  /// Leave the shell.
  #[command(alias = "exit")]
  Quit,
}

/// Split a line into words. Single or double quotes group words with spaces.
pub fn split_words(line: &str) -> Result<Vec<String>, String> {
  let mut words = Vec::new();
  let mut word = String::new();
  let mut in_word = false;
  let mut quote: Option<char> = None;

  for ch in line.chars() {
    match (quote, ch) {
      (Some(q), c) if c == q => quote = None,
      (Some(_), c) => word.push(c),
      (None, '"' | '\'') => {
        quote = Some(ch);
        in_word = true;
      }
      (None, c) if c.is_whitespace() => {
        if in_word {
          words.push(std::mem::take(&mut word));
          in_word = false;
        }
      }
      (None, c) => {
        word.push(c);
        in_word = true;
      }
    }
  }

  if let Some(q) = quote {
    return Err(format!("unterminated {q} quote"));
  }
  if in_word {
    words.push(word);
  }
  Ok(words)
}

/// How long an action may be pending before the shell says so.
const LOADING_DELAY: Duration = Duration::from_millis(300);

/// Whether `err` is a failure the store already put in its error notice.
fn recorded_by_store(err: &anyhow::Error) -> bool {
  matches!(
    err.downcast_ref::<ActionError>(),
    Some(ActionError::Api(_) | ActionError::Invalid(_))
  )
}

/// Await `action`, printing a loading line once `loading` has been up for
/// [`LOADING_DELAY`].
async fn with_indicator<T>(
  mut loading: watch::Receiver<bool>,
  action: impl Future<Output = T>,
) -> T {
  tokio::pin!(action);
  let slow = async {
    let _ = loading.wait_for(|busy| *busy).await;
    tokio::time::sleep(LOADING_DELAY).await;
  };
  tokio::select! {
    out = &mut action => return out,
    () = slow => eprintln!("Loading…"),
  }
  action.await
}

pub async fn run<A: ContactApi>(store: &mut ContactStore<A>) -> anyhow::Result<()> {
  with_indicator(store.watch_loading(), store.load_contacts()).await;

  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  let mut stdout = io::stdout();
  let mut stderr = io::stderr();

  loop {
    store.expire_notices(Instant::now());
    display::notices(&mut stdout, &mut stderr, store)?;
    write!(stdout, "carnet> ")?;
    stdout.flush()?;

    let Some(line) = lines.next_line().await.context("reading stdin")? else {
      break;
    };

    let words = match split_words(&line) {
      Ok(words) if words.is_empty() => continue,
      Ok(words) => words,
      Err(e) => {
        writeln!(stderr, "{e}")?;
        continue;
      }
    };

    let parsed = match Line::try_parse_from(words) {
      Ok(parsed) => parsed,
      Err(e) => {
        e.print()?;
        continue;
      }
    };

    match parsed.command {
      ShellCommand::Quit => break,
      ShellCommand::Reload => {
        with_indicator(store.watch_loading(), store.load_contacts()).await;
      }
      ShellCommand::Dismiss => {
        store.dismiss_error();
        store.clear_success_message();
      }
      ShellCommand::Contact(command) => {
        let loading = store.watch_loading();
        if let Err(e) = with_indicator(loading, commands::run(store, command, &mut stdout)).await {
          tracing::debug!(error = ?e, "command failed");
          if !recorded_by_store(&e) {
            writeln!(stderr, "✗ {e:#}")?;
          }
        }
      }
    }
  }
  Ok(())
}
