use std::sync::mpsc::{self, Receiver};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEvent};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum PollEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
}

/// Source of terminal events (keyboard, mouse, resize)
pub trait PollEventSource: Send + 'static {
    /// Block until the next event. `None` once the source is exhausted.
    fn recv(&self) -> Option<PollEvent>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<PollEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                // windows reports releases too
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => PollEvent::Key(key),
                Ok(CtEvent::Mouse(mouse)) => PollEvent::Mouse(mouse),
                Ok(CtEvent::Resize(_, _)) => PollEvent::Resize,
                Ok(_) => continue,
                Err(_) => break,
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PollEventSource for CrosstermEventSource {
    fn recv(&self) -> Option<PollEvent> {
        self.rx.recv().ok()
    }
}

/// Test event source fed from a channel
pub struct TestEventSource {
    rx: Receiver<PollEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<PollEvent>) -> Self {
        Self { rx }
    }
}

impl PollEventSource for TestEventSource {
    fn recv(&self) -> Option<PollEvent> {
        self.rx.recv().ok()
    }
}

/// Runner that hands the application one event at a time
pub struct Runner<E: PollEventSource> {
    event_source: E,
}

impl<E: PollEventSource> Runner<E> {
    pub fn new(event_source: E) -> Self {
        Self { event_source }
    }

    /// Blocks for the next event; `None` means the source is gone and the app should stop
    pub fn step(&self) -> Option<PollEvent> {
        self.event_source.recv()
    }

    /// Feeds events to `app` until it asks to quit or the source runs dry.
    /// `redraw` is called once up front and after every event.
    pub fn run<F>(&self, app: &mut crate::app::App, mut redraw: F) -> std::io::Result<()>
    where
        F: FnMut(&mut crate::app::App) -> std::io::Result<()>,
    {
        redraw(app)?;
        while !app.should_quit {
            match self.step() {
                Some(PollEvent::Key(key)) => app.on_key(key),
                Some(PollEvent::Mouse(mouse)) => app.on_mouse(mouse),
                Some(PollEvent::Resize) => {}
                None => break,
            }
            redraw(app)?;
        }
        Ok(())
    }
}
