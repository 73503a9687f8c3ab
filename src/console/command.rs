//! Console commands and their parser.
//!
//! Every line typed at the prompt becomes a [`Command`]. Lines that do not
//! start with `/` are chat text.

use crate::attachment::Attachment;
use crate::auth::Role;
use crate::directory::BookingFilter;
use crate::wizard::{FileSlot, FormField};

/// Parses console input into commands.
pub struct CommandParser;

impl CommandParser {
    /// Parse one line of input.
    pub fn parse(content: &str) -> Command {
        let trimmed = content.trim();
        let lower = trimmed.to_lowercase();

        match lower.as_str() {
            "/help" | "/?" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            "/close" => Command::Close,
            "/show" | "/status" => Command::Show,

            // Directory
            "/workers" => Command::Workers,
            "/categories" => Command::Categories,
            "/bookings" => Command::Bookings {
                filter: BookingFilter::All,
            },

            // Auth
            "/login" | "/join" => Command::OpenAuth,
            "/mode" | "/switch" => Command::SwitchMode,
            "/back" => Command::Back,

            // Registration
            "/register" => Command::OpenRegistration,
            "/next" => Command::Next,
            "/prev" | "/previous" => Command::Prev,
            "/summary" => Command::Summary,
            "/submit" => Command::Submit,

            // Chat
            "/unimage" => Command::RemoveImage,

            // Review
            "/anon" | "/anonymous" => Command::ToggleAnonymous,

            _ => parse_complex(trimmed, &lower),
        }
    }
}

/// Commands with arguments, falling back to chat text.
fn parse_complex(trimmed: &str, lower: &str) -> Command {
    if !trimmed.starts_with('/') {
        return Command::Say {
            text: trimmed.to_string(),
        };
    }

    let (head, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head.to_lowercase(), rest.trim()),
        None => (lower.to_string(), ""),
    };

    match head.as_str() {
        "/profile" => required(rest, "/profile <worker-id>", |id| Command::Profile {
            id: id.to_string(),
        }),
        "/bookings" => parse_bookings(rest),
        "/role" => parse_role(rest),
        "/auth" => parse_auth(rest),
        "/set" => parse_set(rest),
        "/skill" => parse_skill(rest),
        "/file" => parse_file(rest),
        "/chat" => required(rest, "/chat <worker-id>", |id| Command::OpenChat {
            worker_id: id.to_string(),
        }),
        "/image" => match Attachment::from_token(rest) {
            Some(image) => Command::AttachImage { image },
            None => invalid("Usage: /image <file>[:bytes]"),
        },
        "/review" => required(rest, "/review <worker-id>", |id| Command::OpenReview {
            worker_id: id.to_string(),
        }),
        "/rate" => parse_stars(rest, "/rate <1-5>", |stars| Command::Rate { stars }),
        "/hover" => parse_stars(rest, "/hover <0-5>", |stars| Command::Hover { stars }),
        "/text" => Command::ReviewText {
            text: rest.to_string(),
        },
        "/photos" => {
            let images = attachments(rest);
            if images.is_empty() {
                invalid("Usage: /photos <file>[:bytes] ...")
            } else {
                Command::AddPhotos { images }
            }
        }
        "/unphoto" => match rest.parse::<usize>() {
            Ok(n) if n >= 1 => Command::RemovePhoto { index: n - 1 },
            _ => invalid("Usage: /unphoto <number>"),
        },
        _ => invalid(&format!("Unknown command: {}. Type /help.", head)),
    }
}

fn invalid(message: &str) -> Command {
    Command::Invalid {
        message: message.to_string(),
    }
}

fn required(rest: &str, usage: &str, build: impl FnOnce(&str) -> Command) -> Command {
    match rest.split_whitespace().next() {
        Some(arg) => build(arg),
        None => invalid(&format!("Usage: {}", usage)),
    }
}

fn attachments(rest: &str) -> Vec<Attachment> {
    rest.split_whitespace()
        .filter_map(Attachment::from_token)
        .collect()
}

/// `/bookings [all|pending|approved|completed]`
fn parse_bookings(rest: &str) -> Command {
    match rest.parse::<BookingFilter>() {
        Ok(filter) => Command::Bookings { filter },
        Err(e) => invalid(&e.to_string()),
    }
}

/// `/role customer|worker`
fn parse_role(rest: &str) -> Command {
    match rest.parse::<Role>() {
        Ok(role) => Command::SelectRole { role },
        Err(e) => invalid(&e),
    }
}

/// `/auth a | b | ...`. Fields are `|`-separated so they may hold spaces:
/// `email | password` to log in, `name | email | phone | location | password`
/// to sign up.
fn parse_auth(rest: &str) -> Command {
    let parts: Vec<String> = rest.split('|').map(|p| p.trim().to_string()).collect();
    if rest.trim().is_empty() {
        return invalid("Usage: /auth <email> | <password>");
    }
    Command::Auth { parts }
}

/// `/set <field> <value...>`
fn parse_set(rest: &str) -> Command {
    let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    if field.is_empty() {
        return invalid("Usage: /set <field> <value>");
    }
    match field.parse::<FormField>() {
        Ok(field) => Command::SetField {
            field,
            value: value.trim().to_string(),
        },
        Err(e) => invalid(&e),
    }
}

/// `/skill add <text>` or `/skill rm <text>`
fn parse_skill(rest: &str) -> Command {
    let (action, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let text = text.to_string();
    match action.to_lowercase().as_str() {
        "add" => Command::AddSkill { text },
        "rm" | "remove" => Command::RemoveSkill { text },
        _ => invalid("Usage: /skill add|rm <skill>"),
    }
}

/// `/file <slot> <file>[:bytes] ...`
fn parse_file(rest: &str) -> Command {
    let (slot, files) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    if slot.is_empty() {
        return invalid("Usage: /file <slot> <file>[:bytes] ...");
    }
    match slot.parse::<FileSlot>() {
        Ok(slot) => Command::SelectFiles {
            slot,
            files: attachments(files),
        },
        Err(e) => invalid(&e),
    }
}

fn parse_stars(rest: &str, usage: &str, build: impl FnOnce(u8) -> Command) -> Command {
    match rest.parse::<u8>() {
        Ok(stars) => build(stars),
        Err(_) => invalid(&format!("Usage: {}", usage)),
    }
}

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    /// Close whichever modal is open.
    Close,
    /// Print the open modal's state.
    Show,

    Workers,
    Profile { id: String },
    Categories,
    Bookings { filter: BookingFilter },

    OpenAuth,
    SelectRole { role: Role },
    SwitchMode,
    Back,
    Auth { parts: Vec<String> },

    OpenRegistration,
    SetField { field: FormField, value: String },
    AddSkill { text: String },
    RemoveSkill { text: String },
    SelectFiles { slot: FileSlot, files: Vec<Attachment> },
    Next,
    Prev,
    Summary,
    /// Submit the open registration or review.
    Submit,

    OpenChat { worker_id: String },
    /// Plain text: sent as a chat message.
    Say { text: String },
    AttachImage { image: Attachment },
    RemoveImage,

    OpenReview { worker_id: String },
    Rate { stars: u8 },
    Hover { stars: u8 },
    ReviewText { text: String },
    ToggleAnonymous,
    AddPhotos { images: Vec<Attachment> },
    /// Zero-based index into the review images.
    RemovePhoto { index: usize },

    /// Unparseable input, with a message for the user.
    Invalid { message: String },
}

pub const HELP: &str = "\
Directory:
  /workers                      featured workers
  /profile <id>                 worker profile
  /categories                   service categories
  /bookings [status]            booking history (all|pending|approved|completed)
Auth:
  /login                        open the auth modal
  /role customer|worker         pick a role
  /mode                         toggle login / sign up
  /back                         back to role selection
  /auth email | password        log in
  /auth name | email | phone | location | password   sign up
Registration:
  /register                     open the worker registration wizard
  /set <field> <value>          first_name, last_name, profession, experience,
                                location, email, phone, bio, aadhar
  /skill add|rm <skill>
  /file <slot> <file>...        aadhar_card, profile_photo, work_images, intro_video
  /next, /prev, /summary, /submit
Chat:
  /chat <id>                    open a chat with a worker
  <text>                        send a message
  /image <file>, /unimage       attach or drop an image for the next message
Review:
  /review <id>                  open the review modal
  /rate <1-5>, /hover <0-5>, /text <review>, /anon
  /photos <file>..., /unphoto <n>, /submit
General:
  /show, /close, /help, /quit";
