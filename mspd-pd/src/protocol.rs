//! Station control protocol
//!
//! Line based: the client sends one command per line, the server answers with
//! an optional body followed by a status line, either `OK <n>` or
//! `ERROR <code> <message>`. A connection opens with `OK MSPD <version>`.

use crate::stations::{Station, StationTable};
use crate::Result;
use std::fmt;
use std::future::Future;

/// Protocol version announced on connect
pub const PROTOCOL_VERSION: &str = "1.1.0";

/// Status code of a successful request
pub const OK_CODE: u16 = 100;

/// Commands and the number of arguments each takes, in `help` order
pub const COMMANDS: &[(&str, usize)] = &[
    ("version", 0),
    ("current", 0),
    ("play", 1),
    ("next", 0),
    ("prev", 0),
    ("stop", 0),
    ("volume", 2),
    ("help", 0),
    ("stations", 0),
    ("status", 0),
];

/// Greeting sent when a client connects
pub fn hello() -> String {
    format!("OK MSPD {}", PROTOCOL_VERSION)
}

// ============================================================================
// Replies
// ============================================================================

/// Error status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    General,
    UnknownCommand,
    InvalidArgument,
    Syntax,
    Internal,
    NotAvailable,
    OutOfRange,
}

impl ErrorCode {
    pub fn code(self) -> u16 {
        match self {
            ErrorCode::General => 200,
            ErrorCode::UnknownCommand => 201,
            ErrorCode::InvalidArgument => 202,
            ErrorCode::Syntax => 203,
            ErrorCode::Internal => 300,
            ErrorCode::NotAvailable => 301,
            ErrorCode::OutOfRange => 302,
        }
    }

    /// Message used when a reply carries none of its own
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorCode::General => "error",
            ErrorCode::UnknownCommand => "unknown command",
            ErrorCode::InvalidArgument => "invalid argument",
            ErrorCode::Syntax => "incorrect syntax",
            ErrorCode::Internal => "internal server error",
            ErrorCode::NotAvailable => "requested property not available",
            ErrorCode::OutOfRange => "number out of range",
        }
    }
}

/// Final status line of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `OK <n>`; `n` is [`OK_CODE`] except for `current`, which reports the
    /// playing station id
    Ok(u16),

    /// `ERROR <code> <message>`
    Error {
        code: ErrorCode,
        message: Option<String>,
    },
}

impl Reply {
    pub fn ok() -> Self {
        Reply::Ok(OK_CODE)
    }

    pub fn error(code: ErrorCode) -> Self {
        Reply::Error {
            code,
            message: None,
        }
    }

    pub fn error_with(code: ErrorCode, message: impl Into<String>) -> Self {
        Reply::Error {
            code,
            message: Some(message.into()),
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok(code) => write!(f, "OK {}", code),
            Reply::Error { code, message } => {
                let message = message.as_deref().unwrap_or(code.default_message());
                write!(f, "ERROR {} {}", code.code(), message)
            }
        }
    }
}

/// Body and status line answering one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub body: Option<String>,
    pub reply: Reply,
}

impl Response {
    pub fn new(body: Option<String>, reply: Reply) -> Self {
        // An empty body sends no line at all
        let body = body.filter(|b| !b.is_empty());
        Self { body, reply }
    }

    pub fn reply(reply: Reply) -> Self {
        Self { body: None, reply }
    }

    /// Text sent to the client, newline terminated
    pub fn to_wire(&self) -> String {
        match &self.body {
            Some(body) => format!("{}\n{}\n", body, self.reply),
            None => format!("{}\n", self.reply),
        }
    }
}

impl From<Reply> for Response {
    fn from(reply: Reply) -> Self {
        Response::reply(reply)
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Volume adjustment requested by a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeChange {
    Set(i32),
    Increase(i32),
    Decrease(i32),
}

impl VolumeChange {
    /// Arguments passed to the volume command
    pub fn command_args(self) -> [String; 2] {
        match self {
            VolumeChange::Set(v) => ["set".to_string(), v.to_string()],
            VolumeChange::Increase(v) => ["inc".to_string(), v.to_string()],
            VolumeChange::Decrease(v) => ["dec".to_string(), v.to_string()],
        }
    }
}

/// A parsed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Version,
    Current,
    Play(i64),
    Next,
    Prev,
    Stop,
    Volume(VolumeChange),
    Help,
    Stations,
    Status,
}

impl Command {
    /// Parse a request line
    ///
    /// Errors come back as the [`Reply`] to send.
    pub fn parse(line: &str) -> std::result::Result<Self, Reply> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let name = tokens.first().copied().unwrap_or_default();
        let args = tokens.get(1..).unwrap_or_default();

        let Some(&(_, arity)) = COMMANDS.iter().find(|(command, _)| *command == name) else {
            return Err(Reply::error_with(
                ErrorCode::UnknownCommand,
                format!("Unknown command '{}'.", name),
            ));
        };

        if args.len() != arity {
            return Err(Reply::error_with(
                ErrorCode::Syntax,
                format!(
                    "Wrong number of arguments. '{}' takes {} arguments.",
                    name, arity
                ),
            ));
        }

        let command = match name {
            "version" => Command::Version,
            "current" => Command::Current,
            "play" => Command::Play(parse_number(args[0])?),
            "next" => Command::Next,
            "prev" => Command::Prev,
            "stop" => Command::Stop,
            "volume" => {
                let value = parse_number(args[1])?;
                let value = i32::try_from(value).map_err(|_| Reply::error(ErrorCode::OutOfRange))?;
                match args[0] {
                    "set" => Command::Volume(VolumeChange::Set(value)),
                    "inc" => Command::Volume(VolumeChange::Increase(value)),
                    "dec" => Command::Volume(VolumeChange::Decrease(value)),
                    _ => return Err(Reply::error(ErrorCode::InvalidArgument)),
                }
            }
            "help" => Command::Help,
            "stations" => Command::Stations,
            "status" => Command::Status,
            _ => return Err(Reply::error_with(ErrorCode::Internal, "Internal Server Error")),
        };

        Ok(command)
    }
}

fn parse_number(token: &str) -> std::result::Result<i64, Reply> {
    token
        .parse()
        .map_err(|_| Reply::error(ErrorCode::InvalidArgument))
}

// ============================================================================
// Execution
// ============================================================================

/// Snapshot of what the daemon is doing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    /// Playing station id, 0 when idle
    pub station_id: usize,

    /// Playing station
    pub station: Option<Station>,

    /// Current track title
    pub tag: String,

    /// Output volume, if it could be read
    pub volume: Option<i32>,
}

impl Status {
    pub fn idle() -> Self {
        Self::default()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, url) = match &self.station {
            Some(station) => (station.name.as_str(), station.url.as_str()),
            None => ("", ""),
        };
        writeln!(f, "station: {}", name)?;
        writeln!(f, "url: {}", url)?;
        writeln!(f, "id: {}", self.station_id)?;
        writeln!(f, "tag: {}", self.tag)?;
        write!(f, "volume: {}", self.volume.unwrap_or(-1))
    }
}

/// Operations the protocol needs from the daemon
pub trait StationControl {
    /// Configured stations
    fn stations(&self) -> &StationTable;

    /// Current status; `with_volume` also queries the output volume
    fn status(&mut self, with_volume: bool) -> impl Future<Output = Result<Status>> + Send;

    /// Stop whatever plays and start station `id`
    fn play(&mut self, id: usize) -> impl Future<Output = Result<()>> + Send;

    /// Stop playback
    fn stop(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Change the output volume
    fn change_volume(&mut self, change: VolumeChange) -> impl Future<Output = Result<()>> + Send;
}

/// Execute a command against `control`
pub async fn dispatch<C>(command: Command, control: &mut C) -> Response
where
    C: StationControl + Send,
{
    match command {
        Command::Version => Response::new(Some(PROTOCOL_VERSION.to_string()), Reply::ok()),
        Command::Current => match control.status(false).await {
            Ok(status) => {
                let station_id = u16::try_from(status.station_id).unwrap_or(u16::MAX);
                Response::new(Some(status.tag), Reply::Ok(station_id))
            }
            Err(e) => Reply::error_with(ErrorCode::General, e.to_string()).into(),
        },
        Command::Play(id) => play(control, id).await,
        Command::Next => step(control, 1).await,
        Command::Prev => step(control, -1).await,
        Command::Stop => match control.stop().await {
            Ok(()) => Reply::ok().into(),
            Err(e) => Reply::error_with(ErrorCode::General, e.to_string()).into(),
        },
        Command::Volume(change) => match control.change_volume(change).await {
            Ok(()) => Reply::ok().into(),
            Err(e) => Reply::error_with(ErrorCode::General, e.to_string()).into(),
        },
        Command::Help => {
            let names: Vec<&str> = COMMANDS.iter().map(|(name, _)| *name).collect();
            Response::new(Some(names.join("\n")), Reply::ok())
        }
        Command::Stations => {
            let lines: Vec<String> = control
                .stations()
                .iter()
                .map(|(id, station)| format!("{} {}", id, station.name))
                .collect();
            Response::new(Some(lines.join("\n")), Reply::ok())
        }
        Command::Status => match control.status(true).await {
            Ok(status) => Response::new(Some(status.to_string()), Reply::ok()),
            Err(e) => Reply::error_with(ErrorCode::General, e.to_string()).into(),
        },
    }
}

async fn play<C>(control: &mut C, id: i64) -> Response
where
    C: StationControl + Send,
{
    let id = match usize::try_from(id) {
        Ok(id) if control.stations().get(id).is_some() => id,
        _ => return Reply::error(ErrorCode::OutOfRange).into(),
    };

    match control.play(id).await {
        Ok(()) => Reply::ok().into(),
        Err(e) => Reply::error_with(ErrorCode::General, format!("Could not start player: {}", e)).into(),
    }
}

async fn step<C>(control: &mut C, delta: i64) -> Response
where
    C: StationControl + Send,
{
    let current = match control.status(false).await {
        Ok(status) => status.station_id,
        Err(e) => {
            return Reply::error_with(ErrorCode::General, format!("Could not get status: {}", e))
                .into()
        }
    };

    match control.stations().step(current, delta) {
        Some(id) => {
            tracing::info!("Station change by {} from {} to {}", delta, current, id);
            play(control, id as i64).await
        }
        None => Reply::error(ErrorCode::NotAvailable).into(),
    }
}
