use crossterm::{QueueableCommand, cursor, terminal};
use owo_colors::OwoColorize;
use std::io::{self, IsTerminal, Write};
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
    Debug,
}

impl LogLevel {
    fn paint(self, message: &str) -> String {
        match self {
            Self::Info => format!(
                "{} {}",
                "pkgrestore".bright_cyan().bold(),
                message.white()
            ),
            Self::Success => format!("{} {}", "✓".bright_green().bold(), message.bright_green()),
            Self::Warning => format!("{} {}", "⚠".bright_yellow().bold(), message.bright_yellow()),
            Self::Error => format!("{} {}", "✗".bright_red().bold(), message.bright_red()),
            Self::Debug => format!("{} {}", "•".bright_black().bold(), message.bright_black()),
        }
    }

    const fn survives_quiet(self) -> bool {
        matches!(self, Self::Error)
    }
}

/// Terminal logger with one transient status line.
///
/// Status text is rewritten in place while a restore is running; any regular
/// log record first erases it. When stdout is not a terminal, status updates
/// are printed as plain lines instead.
pub struct Logger {
    started: Instant,
    quiet: bool,
    interactive: bool,
    // Text of the transient line currently drawn, if any.
    transient: Mutex<Option<String>>,
}

impl Logger {
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            started: Instant::now(),
            quiet,
            interactive: io::stdout().is_terminal(),
            transient: Mutex::new(None),
        }
    }

    fn erase_transient(&self, stdout: &mut impl Write) {
        let mut transient = self
            .transient
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if transient.take().is_some() && self.interactive {
            let _ = stdout.queue(cursor::MoveToColumn(0));
            let _ = stdout.queue(terminal::Clear(terminal::ClearType::CurrentLine));
        }
    }

    pub fn update_line(&self, message: &str) {
        if self.quiet {
            return;
        }

        let mut stdout = io::stdout().lock();
        self.erase_transient(&mut stdout);
        if self.interactive {
            let _ = write!(stdout, "{message}");
            *self
                .transient
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(message.to_string());
        } else {
            let _ = writeln!(stdout, "{message}");
        }
        let _ = stdout.flush();
    }

    pub fn finish_line(&self, message: &str) {
        if self.quiet {
            return;
        }

        let mut stdout = io::stdout().lock();
        self.erase_transient(&mut stdout);
        let _ = writeln!(stdout, "{message}");
        let _ = stdout.flush();
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        if self.quiet && !level.survives_quiet() {
            return;
        }

        let line = level.paint(message);
        let mut stdout = io::stdout().lock();
        self.erase_transient(&mut stdout);
        if level == LogLevel::Error {
            let _ = stdout.flush();
            eprintln!("{line}");
        } else {
            let _ = writeln!(stdout, "{line}");
            let _ = stdout.flush();
        }
    }

    pub fn finish(&self, message: &str) {
        let line = format!(
            "{} {} {}",
            "✓".bright_green().bold(),
            message.bright_green(),
            format!("[{}]", elapsed_label(self.started.elapsed())).bright_black()
        );
        self.finish_line(&line);
    }

    pub fn status(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.update_line(&format!("{} {}", "◦".bright_cyan(), message.bright_white()));
    }

    pub fn debug(&self, message: &str, enabled: bool) {
        if enabled {
            self.log(LogLevel::Debug, message);
        }
    }
}

/// `850ms` below one second, `1.25s` above.
#[must_use]
pub fn elapsed_label(elapsed: Duration) -> String {
    if elapsed < Duration::from_secs(1) {
        format!("{}ms", elapsed.as_millis())
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// First call wins; later calls are ignored.
pub fn init_logger(quiet: bool) {
    let _ = LOGGER.set(Logger::new(quiet));
}

// Library code may log before the binary initializes anything.
fn logger() -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(false))
}

pub fn update_line(message: &str) {
    logger().update_line(message);
}

pub fn status(message: &str) {
    logger().status(message);
}

pub fn info(message: &str) {
    logger().log(LogLevel::Info, message);
}

pub fn success(message: &str) {
    logger().log(LogLevel::Success, message);
}

pub fn warn(message: &str) {
    logger().log(LogLevel::Warning, message);
}

pub fn error(message: &str) {
    logger().log(LogLevel::Error, message);
}

pub fn debug(message: &str, enabled: bool) {
    logger().debug(message, enabled);
}

pub fn finish(message: &str) {
    logger().finish(message);
}

pub fn finish_line(message: &str) {
    logger().finish_line(message);
}
