//! Main application logic.
//!
//! This module wires the global key hook to the dispatcher and handles the
//! Ctrl-C shutdown. All key events are handled on a single task, so the
//! dispatcher never sees two events at once.

use anyhow::{Context, Result};
use log::{debug, error, info};
use rdev::listen;
use std::io;
use std::path::PathBuf;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::sync::oneshot;

use crate::audio::{Player, Sample, SoundBank};
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::error::Error;
use crate::keyboard::{KeyEvent, translate};

/// Main application struct.
///
/// Owns the sound bank (through the dispatcher) for the lifetime of the process.
pub struct App {
    dispatcher: Dispatcher<SoundBank>,
}

impl App {
    /// Creates a new App instance.
    ///
    /// This function initializes the application by:
    /// 1. Loading configuration from config.toml or using defaults
    /// 2. Loading every sample and opening the output device
    /// 3. Playing the startup sound when enabled
    pub fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let config = if let Some(path) = config_path {
            Config::from_file(&path).context(format!("Reading config {}", path.display()))?
        } else {
            Config::load_or_write_default(None)?
        };
        config.validate()?;
        debug!("Using config: {config:?}");

        let bank = SoundBank::load(&config.samples, &config.audio)
            .context("Failed to load the sound bank")?;
        if config.startup_sound {
            bank.play(Sample::Enter);
        }

        Ok(Self {
            dispatcher: Dispatcher::new(bank, config.bell),
        })
    }

    /// Runs the main application loop.
    ///
    /// Returns `Ok` on Ctrl-C. Returns an error if the key hook cannot be
    /// installed or stops delivering events.
    pub async fn run(&mut self) -> Result<()> {
        let (schan, mut rchan) = unbounded_channel();
        let (tx_failure, rx_failure) = oneshot::channel();

        // rdev offers no way to stop `listen`, so it gets a plain thread that
        // dies with the process instead of a blocking task the runtime would wait on.
        std::thread::Builder::new()
            .name("key-hook".to_string())
            .spawn(move || {
                let result = listen(move |event| {
                    if let Some(key_event) = translate(&event) {
                        if let Err(e) = schan.send(key_event) {
                            error!("Could not send event {key_event:?}: {e}");
                        }
                    }
                });
                let failure = match result {
                    Ok(()) => Error::EventSource("key hook returned".to_string()),
                    Err(e) => Error::EventSource(format!("{e:?}")),
                };
                tx_failure.send(failure).ok();
            })
            .context("Cannot spawn the key hook thread")?;

        info!("Listening for key presses, press Ctrl-C to quit");
        event_loop(
            &mut self.dispatcher,
            &mut rchan,
            rx_failure,
            tokio::signal::ctrl_c(),
        )
        .await
    }
}

/// Feeds key events to the dispatcher until `shutdown` resolves or the hook fails.
///
/// The hook closes the event channel before it reports its failure, so a closed
/// channel waits for that report instead of returning a generic error.
async fn event_loop<P, S>(
    dispatcher: &mut Dispatcher<P>,
    events: &mut UnboundedReceiver<KeyEvent>,
    mut failure: oneshot::Receiver<Error>,
    shutdown: S,
) -> Result<()>
where
    P: Player,
    S: Future<Output = io::Result<()>>,
{
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    dispatcher.handle(event);
                }
                None => {
                    debug!("Key event channel closed, waiting for the hook result");
                    return Err(hook_failure((&mut failure).await))
                        .context("Could not listen for keyboard events");
                }
            },
            reported = &mut failure => {
                return Err(hook_failure(reported)).context("Could not listen for keyboard events");
            }
            signal = &mut shutdown => {
                signal.context("Cannot wait for Ctrl-C")?;
                info!("Interrupted, exiting");
                println!("\nbye!");
                return Ok(());
            }
        }
    }
}

fn hook_failure(reported: Result<Error, oneshot::error::RecvError>) -> Error {
    reported.unwrap_or_else(|_| Error::EventSource("key hook thread exited".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BellConfig;
    use crate::keyboard::KeyIdentity;
    use std::cell::RefCell;
    use std::future::pending;
    use tokio::sync::mpsc::unbounded_channel;

    #[derive(Default)]
    struct Recorder {
        played: RefCell<Vec<Sample>>,
    }

    impl Player for &Recorder {
        fn play(&self, sample: Sample) {
            self.played.borrow_mut().push(sample);
        }
    }

    #[tokio::test]
    async fn test_closed_channel_returns_reported_failure() {
        let recorder = Recorder::default();
        let mut dispatcher = Dispatcher::new(&recorder, BellConfig::default());
        let (tx, mut rx) = unbounded_channel();
        let (tx_failure, rx_failure) = oneshot::channel();

        tx.send(KeyEvent::press(KeyIdentity::Char('a'))).unwrap();
        drop(tx);
        let hook = tokio::spawn(async move {
            tokio::task::yield_now().await;
            tx_failure
                .send(Error::EventSource("XOpenDisplay failed".to_string()))
                .ok();
        });

        let err = event_loop(&mut dispatcher, &mut rx, rx_failure, pending())
            .await
            .unwrap_err();
        hook.await.unwrap();
        let message = format!("{err:#}");
        assert!(message.contains("XOpenDisplay failed"), "{message}");
        assert_eq!(*recorder.played.borrow(), vec![Sample::Key]);
    }

    #[tokio::test]
    async fn test_hook_thread_gone_without_report() {
        let recorder = Recorder::default();
        let mut dispatcher = Dispatcher::new(&recorder, BellConfig::default());
        let (tx, mut rx) = unbounded_channel::<KeyEvent>();
        let (tx_failure, rx_failure) = oneshot::channel::<Error>();
        drop(tx);
        drop(tx_failure);

        let err = event_loop(&mut dispatcher, &mut rx, rx_failure, pending())
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("key hook thread exited"));
    }

    #[tokio::test]
    async fn test_failure_while_channel_open() {
        let recorder = Recorder::default();
        let mut dispatcher = Dispatcher::new(&recorder, BellConfig::default());
        let (_tx, mut rx) = unbounded_channel::<KeyEvent>();
        let (tx_failure, rx_failure) = oneshot::channel();
        tx_failure
            .send(Error::EventSource("permission denied".to_string()))
            .ok();

        let err = event_loop(&mut dispatcher, &mut rx, rx_failure, pending())
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("permission denied"));
    }

    #[tokio::test]
    async fn test_shutdown_returns_ok() {
        let recorder = Recorder::default();
        let mut dispatcher = Dispatcher::new(&recorder, BellConfig::default());
        let (_tx, mut rx) = unbounded_channel::<KeyEvent>();
        let (_tx_failure, rx_failure) = oneshot::channel::<Error>();

        let shutdown = async { Ok::<_, io::Error>(()) };
        let result = event_loop(&mut dispatcher, &mut rx, rx_failure, shutdown).await;
        assert!(result.is_ok());
        assert_eq!(dispatcher.consecutive_count(), 0);
    }
}
