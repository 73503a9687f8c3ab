//! Console: a stdin/stdout host that opens one modal at a time and feeds
//! parsed commands into it.

pub mod command;

use std::sync::Arc;

use futures::{StreamExt, stream};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::auth::{AuthFields, AuthFlow, AuthMode};
use crate::chat::{ChatEvent, Conversation, Sender};
use crate::clock::Clock;
use crate::config::AppConfig;
use crate::directory::{DataSource, fixtures, initials};
use crate::error::{DataSourceError, Error, ValidationError};
use crate::reviews::{MAX_REVIEW_IMAGES, MAX_STARS, ReviewForm};
use crate::submission::SubmissionSink;
use crate::wizard::{FormField, PROFESSIONS, RegistrationStep, WorkerRegistration};

pub use command::{Command, CommandParser, HELP};

/// The modal currently open, if any.
pub enum Modal {
    Auth(AuthFlow),
    Registration(WorkerRegistration),
    Chat(Conversation),
    Review(ReviewForm),
}

impl Modal {
    fn name(&self) -> &'static str {
        match self {
            Self::Auth(_) => "auth",
            Self::Registration(_) => "registration",
            Self::Chat(_) => "chat",
            Self::Review(_) => "review",
        }
    }
}

/// What the REPL should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

pub struct Console {
    config: AppConfig,
    sink: Arc<dyn SubmissionSink>,
    source: Arc<dyn DataSource>,
    clock: Arc<dyn Clock>,
    modal: Option<Modal>,
    /// Print chat events to stdout as they arrive.
    echo_events: bool,
    printer: Option<JoinHandle<()>>,
}

impl Console {
    pub fn new(
        config: AppConfig,
        sink: Arc<dyn SubmissionSink>,
        source: Arc<dyn DataSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            sink,
            source,
            clock,
            modal: None,
            echo_events: false,
            printer: None,
        }
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    /// Run the interactive loop until `/quit` or EOF.
    pub async fn run(mut self) -> anyhow::Result<()> {
        self.echo_events = true;
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

        tokio::spawn(async move {
            let stdin = tokio::io::stdin();
            let mut lines = BufReader::new(stdin).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!("Error reading stdin: {}", e);
                        break;
                    }
                }
            }
        });

        let mut input = Box::pin(stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|line| (line, rx))
        }));

        eprint!("> ");
        while let Some(line) = input.next().await {
            if line.trim().is_empty() {
                eprint!("> ");
                continue;
            }
            match self.handle(CommandParser::parse(&line)).await {
                Flow::Continue(output) => {
                    if !output.is_empty() {
                        println!("{}", output);
                    }
                    eprint!("> ");
                }
                Flow::Quit => break,
            }
        }

        self.close_modal().await;
        info!("Console closed");
        Ok(())
    }

    /// Apply one command. Errors are rendered as output, like a toast.
    pub async fn handle(&mut self, command: Command) -> Flow {
        if command == Command::Quit {
            return Flow::Quit;
        }
        match self.dispatch(command).await {
            Ok(output) => Flow::Continue(output),
            Err(e) => Flow::Continue(format!("Error: {}", e)),
        }
    }

    async fn dispatch(&mut self, command: Command) -> Result<String, Error> {
        match command {
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
            Command::Invalid { message } => Ok(message),
            Command::Close => match self.modal.as_ref().map(Modal::name) {
                Some(name) => {
                    self.close_modal().await;
                    Ok(format!("Closed {}.", name))
                }
                None => Ok("Nothing to close.".to_string()),
            },
            Command::Show => Ok(self.show().await),

            Command::Workers => {
                let workers = self.source.featured_workers().await?;
                Ok(workers
                    .iter()
                    .map(|w| {
                        format!(
                            "[{}] {} - {} ({:.1}, {} reviews) {} {}/hr\n    {}",
                            w.id,
                            w.name,
                            w.profession,
                            w.rating,
                            w.reviews,
                            w.location,
                            w.hourly_rate,
                            w.skills.join(", ")
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            Command::Profile { id } => {
                let p = self.source.worker_profile(&id).await?;
                Ok(format!(
                    "{} ({})\n{} - {} years - {}\n{} / {}\nRating {:.1} ({} reviews), {} jobs, responds in {}\n{}\nSkills: {}\nPortfolio: {} images",
                    p.display_name(),
                    p.availability,
                    p.profession,
                    p.experience_years,
                    p.location,
                    p.email,
                    p.phone,
                    p.rating,
                    p.total_reviews,
                    p.completed_jobs,
                    p.response_time,
                    p.bio,
                    p.skills.join(", "),
                    p.work_images
                ))
            }
            Command::Categories => {
                let categories = self.source.service_categories().await?;
                Ok(categories
                    .iter()
                    .map(|c| format!("{} - {} ({})", c.title, c.description, c.worker_count))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            Command::Bookings { filter } => {
                let bookings = self.source.bookings(filter).await?;
                if bookings.is_empty() {
                    return Ok("No bookings.".to_string());
                }
                Ok(bookings
                    .iter()
                    .map(|b| {
                        let mut line = format!(
                            "#{} {} ({}) [{}] {} {} {} {}",
                            b.id, b.worker_name, b.profession, b.status, b.date, b.time,
                            b.location, b.price
                        );
                        if let Some(rating) = b.rating {
                            line.push_str(&format!(" rated {}/{}", rating, MAX_STARS));
                        } else if b.needs_review() {
                            line.push_str(&format!(" - /review {} to rate", b.worker_id));
                        }
                        line
                    })
                    .collect::<Vec<_>>()
                    .join("\n"))
            }

            Command::OpenAuth => {
                self.open(Modal::Auth(AuthFlow::new())).await;
                Ok("Join Worker Connect: /role customer or /role worker".to_string())
            }
            Command::SelectRole { role } => {
                let flow = self.auth()?;
                flow.select_role(role);
                Ok(flow.title())
            }
            Command::SwitchMode => {
                let flow = self.auth()?;
                if flow.switch_mode() {
                    Ok(flow.title())
                } else {
                    Ok("Pick a role first.".to_string())
                }
            }
            Command::Back => {
                let flow = self.auth()?;
                flow.back();
                Ok(flow.title())
            }
            Command::Auth { parts } => self.submit_auth(parts).await,

            Command::OpenRegistration => {
                let wizard = WorkerRegistration::new(self.config.reset_policy);
                let title = wizard.title();
                self.open(Modal::Registration(wizard)).await;
                Ok(title)
            }
            Command::SetField { field, value } => {
                self.registration()?.set_field(field, &value)?;
                let mut out = format!("Set {}.", field.label());
                if field == FormField::Profession && !PROFESSIONS.contains(&value.as_str()) {
                    out.push_str(&format!(" Usual choices: {}.", PROFESSIONS.join(", ")));
                }
                Ok(out)
            }
            Command::AddSkill { text } => {
                if self.registration()?.add_skill(&text) {
                    Ok(format!("Added skill {}.", text.trim()))
                } else {
                    Ok(String::new())
                }
            }
            Command::RemoveSkill { text } => {
                self.registration()?.remove_skill(&text);
                Ok(String::new())
            }
            Command::SelectFiles { slot, files } => {
                let count = files.len();
                self.registration()?.select_files(slot, files);
                Ok(format!("Selected {} file(s).", count))
            }
            Command::Next => {
                let wizard = self.registration()?;
                let left = wizard.step();
                wizard.advance();
                let mut out = format!("{} ({:.0}%)", wizard.title(), wizard.progress_percent());
                if let Err(e) = wizard.validate_step(left) {
                    out.push_str(&format!("\nNote: {}", e));
                }
                Ok(out)
            }
            Command::Prev => {
                let wizard = self.registration()?;
                wizard.retreat();
                Ok(format!("{} ({:.0}%)", wizard.title(), wizard.progress_percent()))
            }
            Command::Summary => Ok(self.registration()?.form().summary()),
            Command::Submit => self.submit_modal().await,

            Command::OpenChat { worker_id } => {
                let name = self.worker_name(&worker_id).await?;
                let conversation =
                    Conversation::new(&worker_id, &name, &self.config, Arc::clone(&self.clock));
                for (sender, text, at) in fixtures::chat_history(self.clock.now()) {
                    conversation.seed(sender, text, at).await;
                }
                let transcript = render_transcript(&conversation).await;
                self.open(Modal::Chat(conversation)).await;
                Ok(transcript)
            }
            Command::Say { text } => {
                let echo = self.echo_events;
                let conversation = self.chat()?;
                conversation.set_draft(text);
                match conversation.send_draft().await {
                    Some(_) if echo => Ok(String::new()),
                    Some(message) => Ok(format!("You [{}]: {}", message.time_label(), message.content)),
                    None => Ok(String::new()),
                }
            }
            Command::AttachImage { image } => {
                let name = image.name.clone();
                self.chat()?.attach_image(image);
                Ok(format!("Attached {}.", name))
            }
            Command::RemoveImage => {
                self.chat()?.remove_image();
                Ok(String::new())
            }

            Command::OpenReview { worker_id } => {
                let name = self.worker_name(&worker_id).await?;
                let review = ReviewForm::new(&worker_id, &name, &self.config);
                self.open(Modal::Review(review)).await;
                Ok(format!("Rate & Review {}", name))
            }
            Command::Rate { stars } => {
                let review = self.review()?;
                if review.commit(stars) {
                    Ok(stars_line(review.display_rating()))
                } else {
                    Err(ValidationError::InvalidRating(stars).into())
                }
            }
            Command::Hover { stars } => {
                let review = self.review()?;
                if stars == 0 {
                    review.clear_hover();
                } else {
                    review.set_hover(stars);
                }
                Ok(stars_line(review.display_rating()))
            }
            Command::ReviewText { text } => {
                self.review()?.set_text(text);
                Ok(String::new())
            }
            Command::ToggleAnonymous => {
                let review = self.review()?;
                let anonymous = !review.anonymous();
                review.set_anonymous(anonymous);
                Ok(format!("Anonymous: {}", if anonymous { "on" } else { "off" }))
            }
            Command::AddPhotos { images } => {
                let review = self.review()?;
                let offered = images.len();
                let kept = review.add_images(images);
                let mut out = format!("{} of {} photos", review.images().len(), MAX_REVIEW_IMAGES);
                if kept < offered {
                    out.push_str(&format!(" ({} dropped)", offered - kept));
                }
                Ok(out)
            }
            Command::RemovePhoto { index } => {
                let review = self.review()?;
                match review.remove_image(index) {
                    Some(image) => Ok(format!("Removed {}.", image.name)),
                    None => Ok(String::new()),
                }
            }
        }
    }

    async fn submit_auth(&mut self, parts: Vec<String>) -> Result<String, Error> {
        let sink = Arc::clone(&self.sink);
        let flow = self.auth()?;
        let part = |i: usize| parts.get(i).cloned().unwrap_or_default();
        let fields = match flow.mode() {
            AuthMode::Login => AuthFields::login(part(0), part(1)),
            AuthMode::Signup => AuthFields::signup(part(0), part(1), part(2), part(3), part(4)),
        };
        let missing = fields.missing_required(flow.mode());
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields {
                step: flow.mode().to_string(),
                fields: missing,
            }
            .into());
        }

        let heading = flow.title();
        let ack = flow.submit(fields, sink.as_ref()).await?;
        self.close_modal().await;
        Ok(format!("{}: submitted ({}).", heading, ack.id))
    }

    async fn submit_modal(&mut self) -> Result<String, Error> {
        let sink = Arc::clone(&self.sink);
        let ack = match self.modal.as_mut() {
            Some(Modal::Registration(wizard)) => wizard.submit(sink.as_ref()).await?,
            Some(Modal::Review(review)) => review.submit(sink.as_ref()).await?,
            _ => return Ok("Nothing to submit here.".to_string()),
        };
        self.close_modal().await;
        Ok(format!("Submitted ({}).", ack.id))
    }

    /// Open `modal`, closing whatever was open first.
    async fn open(&mut self, modal: Modal) {
        self.close_modal().await;
        debug!(modal = modal.name(), "Modal opened");
        if self.echo_events {
            if let Modal::Chat(conversation) = &modal {
                self.printer = Some(spawn_printer(conversation));
            }
        }
        self.modal = Some(modal);
    }

    async fn close_modal(&mut self) {
        let Some(modal) = self.modal.take() else {
            return;
        };
        match modal {
            Modal::Auth(mut flow) => flow.reset(),
            Modal::Registration(mut wizard) => wizard.close(),
            Modal::Chat(mut conversation) => conversation.close().await,
            Modal::Review(mut review) => review.close(),
        }
        if let Some(printer) = self.printer.take() {
            printer.abort();
        }
        debug!("Modal closed");
    }

    async fn show(&self) -> String {
        match &self.modal {
            None => "No modal open. /help for commands.".to_string(),
            Some(Modal::Auth(flow)) => flow.title(),
            Some(Modal::Registration(wizard)) => {
                let step = wizard.step();
                let mut out = format!(
                    "{}: {} ({:.0}%)",
                    wizard.title(),
                    step.title(),
                    wizard.progress_percent()
                );
                if step == RegistrationStep::Review {
                    out.push('\n');
                    out.push_str(&wizard.form().summary());
                }
                out
            }
            Some(Modal::Chat(conversation)) => {
                let mut out = render_transcript(conversation).await;
                if conversation.is_typing().await {
                    out.push_str(&format!("\n{} is typing...", conversation.worker_name()));
                }
                out
            }
            Some(Modal::Review(review)) => {
                let mut out = format!(
                    "Rate & Review {}\n{}",
                    review.worker_name(),
                    stars_line(review.display_rating())
                );
                if !review.text().is_empty() {
                    out.push_str(&format!("\n\"{}\"", review.text()));
                }
                out.push_str(&format!(
                    "\nPhotos: {}\nAnonymous: {}",
                    review.images().len(),
                    review.anonymous()
                ));
                out
            }
        }
    }

    async fn worker_name(&self, id: &str) -> Result<String, Error> {
        match self.source.worker_profile(id).await {
            Ok(profile) => return Ok(profile.display_name()),
            Err(DataSourceError::NotFound { .. }) => {}
            Err(e) => return Err(e.into()),
        }
        self.source
            .featured_workers()
            .await?
            .into_iter()
            .find(|w| w.id == id)
            .map(|w| w.name)
            .ok_or_else(|| {
                Error::from(DataSourceError::NotFound {
                    entity: "worker".to_string(),
                    id: id.to_string(),
                })
            })
    }

    fn auth(&mut self) -> Result<&mut AuthFlow, Error> {
        match self.modal.as_mut() {
            Some(Modal::Auth(flow)) => Ok(flow),
            _ => Err(not_open("auth", "/login")),
        }
    }

    fn registration(&mut self) -> Result<&mut WorkerRegistration, Error> {
        match self.modal.as_mut() {
            Some(Modal::Registration(wizard)) => Ok(wizard),
            _ => Err(not_open("registration", "/register")),
        }
    }

    fn chat(&mut self) -> Result<&mut Conversation, Error> {
        match self.modal.as_mut() {
            Some(Modal::Chat(conversation)) => Ok(conversation),
            _ => Err(not_open("chat", "/chat <worker-id>")),
        }
    }

    fn review(&mut self) -> Result<&mut ReviewForm, Error> {
        match self.modal.as_mut() {
            Some(Modal::Review(review)) => Ok(review),
            _ => Err(not_open("review", "/review <worker-id>")),
        }
    }
}

fn not_open(modal: &'static str, hint: &'static str) -> Error {
    Error::NotOpen { modal, hint }
}

fn stars_line(stars: u8) -> String {
    (1..=MAX_STARS)
        .map(|i| if i <= stars { '★' } else { '☆' })
        .collect()
}

async fn render_transcript(conversation: &Conversation) -> String {
    let avatar = initials(conversation.worker_name());
    let mut lines = vec![format!("Chat with {}", conversation.worker_name())];
    for message in conversation.messages().await {
        let who = match message.sender {
            Sender::Customer => "You".to_string(),
            Sender::Worker => avatar.clone(),
        };
        let image = message
            .image
            .as_ref()
            .map(|i| format!(" [{}]", i.name))
            .unwrap_or_default();
        lines.push(format!(
            "{} [{}]: {}{}",
            who,
            message.time_label(),
            message.content,
            image
        ));
    }
    lines.join("\n")
}

/// Print chat events as they arrive.
fn spawn_printer(conversation: &Conversation) -> JoinHandle<()> {
    let mut rx = conversation.subscribe();
    let name = conversation.worker_name().to_string();
    let avatar = initials(&name);

    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ChatEvent::MessageAppended { message }) => {
                    let who = match message.sender {
                        Sender::Customer => "You",
                        Sender::Worker => avatar.as_str(),
                    };
                    println!("{} [{}]: {}", who, message.time_label(), message.content);
                    if message.sender == Sender::Worker {
                        eprint!("> ");
                    }
                }
                Ok(ChatEvent::Typing { active: true }) => eprintln!("   {} is typing...", name),
                Ok(ChatEvent::Typing { active: false }) => {}
                Ok(ChatEvent::Closed) | Err(RecvError::Closed) => break,
                Err(RecvError::Lagged(n)) => debug!(skipped = n, "Chat printer lagged"),
            }
        }
    })
}
