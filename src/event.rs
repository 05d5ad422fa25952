use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};

pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
}

/// Input thread: forwards terminal events and emits a tick every `tick_rate`,
/// even while input keeps arriving. A failed poll or read ends the thread, so
/// `next` returns an error and the event loop shuts down.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_rate = Duration::from_millis(tick_rate_ms);

        thread::spawn(move || pump(&tx, tick_rate, event::poll, event::read));

        Self { rx }
    }

    pub fn next(&self) -> io::Result<Event> {
        self.rx
            .recv()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

fn pump<P, R>(tx: &mpsc::Sender<Event>, tick_rate: Duration, mut poll: P, mut read: R)
where
    P: FnMut(Duration) -> io::Result<bool>,
    R: FnMut() -> io::Result<event::Event>,
{
    let mut last_tick = Instant::now();
    loop {
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        let ready = match poll(timeout) {
            Ok(ready) => ready,
            Err(e) => {
                log::error!("terminal poll failed, stopping input: {}", e);
                return;
            }
        };
        if ready {
            let forwarded = match read() {
                Ok(event::Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    Some(Event::Key(key))
                }
                Ok(event::Event::Mouse(mouse)) if forwards(&mouse) => Some(Event::Mouse(mouse)),
                Ok(event::Event::Resize(w, h)) => Some(Event::Resize(w, h)),
                Ok(_) => None,
                Err(e) => {
                    log::error!("terminal read failed, stopping input: {}", e);
                    return;
                }
            };
            if let Some(ev) = forwarded {
                if tx.send(ev).is_err() {
                    return;
                }
            }
        }
        if last_tick.elapsed() >= tick_rate {
            if tx.send(Event::Tick).is_err() {
                return;
            }
            last_tick = Instant::now();
        }
    }
}

fn forwards(mouse: &MouseEvent) -> bool {
    matches!(
        mouse.kind,
        MouseEventKind::Down(_) | MouseEventKind::Moved | MouseEventKind::Drag(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn failing() -> io::Error {
        io::Error::new(io::ErrorKind::Other, "tty gone")
    }

    #[test]
    fn test_poll_error_stops_input() {
        let (tx, rx) = mpsc::channel();
        let mut polls = 0;
        pump(
            &tx,
            Duration::from_secs(60),
            |_| {
                polls += 1;
                Err(failing())
            },
            || panic!("read after a failed poll"),
        );
        drop(tx);
        assert_eq!(polls, 1);
        let handler = EventHandler { rx };
        assert!(handler.next().is_err());
    }

    #[test]
    fn test_read_error_stops_input_after_forwarding() {
        let (tx, rx) = mpsc::channel();
        let mut reads = 0;
        pump(
            &tx,
            Duration::from_secs(60),
            |_| Ok(true),
            || {
                reads += 1;
                if reads == 1 {
                    Ok(event::Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)))
                } else {
                    Err(failing())
                }
            },
        );
        drop(tx);
        assert_eq!(reads, 2);
        let handler = EventHandler { rx };
        assert!(matches!(handler.next(), Ok(Event::Key(k)) if k.code == KeyCode::Char('q')));
        assert!(handler.next().is_err());
    }

    #[test]
    fn test_ticks_keep_coming_while_idle() {
        let (tx, rx) = mpsc::channel();
        let mut polls = 0;
        pump(
            &tx,
            Duration::ZERO,
            |_| {
                polls += 1;
                if polls > 3 {
                    Err(failing())
                } else {
                    Ok(false)
                }
            },
            || panic!("nothing to read"),
        );
        drop(tx);
        assert_eq!(rx.iter().filter(|e| matches!(e, Event::Tick)).count(), 3);
    }
}
