use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, info};

use crate::service::{self, Transport};
use crate::session::{Effect, Event, Request, SolveSession};

/// Whatever shows the input, the formula and the result to the user.
pub trait Presenter {
    fn show_formula(&mut self, text: &str);
    fn show_result(&mut self, text: &str);
    fn set_input(&mut self, text: &str);
}

#[derive(Debug)]
pub enum Message {
    Session(Event),
    /// a new clause line typed at the end of the input
    Append(String),
    /// ask the presenter to show the current input again
    Show,
    Quit,
}

pub type SharedTransport = Arc<dyn Transport + Send + Sync>;

/// Event loop around a `SolveSession`.
///
/// Session transitions only ever run on the thread calling `run`/`dispatch`;
/// requests go out on worker threads whose replies come back through the
/// same channel as user input.
pub struct Driver<P: Presenter> {
    session   : SolveSession,
    transport : SharedTransport,
    presenter : P,
    tx        : Sender<Message>,
    rx        : Receiver<Message>,
}

impl<P: Presenter> Driver<P> {
    pub fn new(transport: SharedTransport, presenter: P) -> Driver<P> {
        let (tx, rx) = channel::<Message>();
        Driver {
            session: SolveSession::new(),
            transport,
            presenter,
            tx,
            rx,
        }
    }

    pub fn sender(&self) -> Sender<Message> {
        self.tx.clone()
    }

    pub fn session(&self) -> &SolveSession {
        &self.session
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Fires the liveness probe and renders `initial` if there is any.
    pub fn startup(&mut self, greeting: &str, initial: Option<String>) -> JoinHandle<()> {
        let transport = Arc::clone(&self.transport);
        let greeting = greeting.to_string();
        let probe = thread::spawn(move || service::hello(&*transport, &greeting));

        match initial {
            Some(text) => self.dispatch(Event::InputChanged(text)),
            None => self.presenter.show_formula(""),
        }
        probe
    }

    pub fn dispatch(&mut self, event: Event) {
        for effect in self.session.handle(event) {
            self.perform(effect);
        }
    }

    fn perform(&mut self, effect: Effect) {
        match effect {
            Effect::ShowFormula(text) => self.presenter.show_formula(&text),
            Effect::ShowResult(text) => self.presenter.show_result(&text),
            Effect::SetInput(text) => self.presenter.set_input(&text),
            Effect::Send(request) => self.send(request),
        }
    }

    fn send(&self, request: Request) {
        let transport = Arc::clone(&self.transport);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let reply = transport.post(request.endpoint, &request.arg);
            // the loop may already be gone
            let _ = tx.send(Message::Session(Event::Response { seq: request.seq, reply }));
        });
    }

    /// Handles one message, `false` once asked to quit.
    pub fn step(&mut self, message: Message) -> bool {
        debug!("message: {message:?}");
        match message {
            Message::Session(event) => self.dispatch(event),
            Message::Append(line) => {
                let text = match self.session.input().is_empty() {
                    true => line,
                    false => format!("{}\n{}", self.session.input(), line),
                };
                self.dispatch(Event::InputChanged(text));
            },
            Message::Show => {
                let input = self.session.input().to_string();
                self.presenter.set_input(&input);
            },
            Message::Quit => return false,
        }
        true
    }

    pub fn run(&mut self) {
        while let Ok(message) = self.rx.recv() {
            if !self.step(message) {
                info!("quitting");
                break;
            }
        }
    }

    /// Blocks until no request is outstanding. Messages other than replies
    /// received meanwhile are handled too, except `Quit`, which is dropped.
    pub fn settle(&mut self) {
        while self.session.awaiting_solution() || self.session.awaiting_random() {
            match self.rx.recv() {
                Ok(Message::Quit) => continue,
                Ok(message) => { self.step(message); },
                Err(_) => break,
            }
        }
    }
}
