//! Interactive collection of the configuration record.

use airflow_setup_config::{SetupConfig, SetupSettings};
use std::io::{BufRead, Write};
use tracing::warn;

/// Prompt texts, in the order they are asked.
pub const PROMPTS: [&str; 10] = [
    "Enter Supervisor socket path (e.g., /var/run/supervisor.sock): ",
    "Enter Supervisor log path (e.g., /var/log/supervisor/supervisord.log): ",
    "Enter Supervisor conf directory (e.g., /etc/supervisor/conf.d): ",
    "Enter Airflow home path (e.g., /opt/airflow): ",
    "Enter Airflow user (e.g., root): ",
    "Enter Airflow API server port (e.g., 8080): ",
    "Enter Airflow logs directory (e.g., /opt/airflow/logs): ",
    "Choose backend DB (mysql/postgresql): ",
    "Enter DB user: ",
    "Enter DB password: ",
];

/// Strip trailing CR/LF characters and nothing else.
pub fn trim_newline(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

/// Line-oriented question/answer session over any reader/writer pair.
pub struct PromptSession<R: BufRead, W: Write> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> PromptSession<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Print `prompt` and read one answer.
    ///
    /// Never fails: a read error or EOF gives an empty answer. Bytes that are
    /// not valid UTF-8 are replaced with U+FFFD rather than dropping the line.
    pub fn ask(&mut self, prompt: &str) -> String {
        if let Err(e) = write!(self.writer, "{}", prompt).and_then(|_| self.writer.flush()) {
            warn!("Failed to write prompt: {}", e);
        }

        let mut bytes = Vec::new();
        match self.reader.read_until(b'\n', &mut bytes) {
            Ok(_) => {
                let line = String::from_utf8(bytes).unwrap_or_else(|err| {
                    warn!("Answer to {:?} is not valid UTF-8; invalid bytes replaced", prompt.trim_end());
                    String::from_utf8_lossy(err.as_bytes()).into_owned()
                });
                trim_newline(&line).to_string()
            }
            Err(e) => {
                warn!("Failed to read answer, using empty value: {}", e);
                String::new()
            }
        }
    }

    /// Give back the writer, e.g. to keep printing progress on it.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

/// Ask the ten questions and build the configuration record.
pub fn collect<R: BufRead, W: Write>(
    session: &mut PromptSession<R, W>,
    settings: &SetupSettings,
) -> SetupConfig {
    let [sock, log, conf_dir, home, user, port, log_dir, db_type, db_user, db_password] =
        PROMPTS.map(|prompt| session.ask(prompt));

    let airflow_env = SetupConfig::env_path(&home, &settings.env_dir_name);

    SetupConfig {
        supervisor_sock_path: sock,
        supervisor_log_path: log,
        supervisor_dir: conf_dir,
        airflow_home: home,
        airflow_env,
        airflow_user: user,
        airflow_port: port,
        log_dir,
        db_type,
        db_user,
        db_password,
        airflow_version: settings.airflow_version.clone(),
        python_version: settings.python_version.clone(),
    }
}
